//! Verbosity-gated structured logging.
//!
//! Events go through `tracing`; [`Verbosity`] decides which of them a
//! component emits at all, so a silent run does no formatting work.

use serde::{Deserialize, Serialize};

/// Verbosity level for reduct computation output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Errors and warnings only.
    Warning,
    /// Progress and important information.
    Info,
    /// Detailed debugging information.
    Debug,
}

/// Logger for the reduct search and the stream driver.
///
/// `iteration` is the caller's per-window counter and is attached to every
/// event.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReductLogger {
    verbosity: Verbosity,
}

impl ReductLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub fn warn(&self, iteration: usize, message: &str) {
        if self.enabled(Verbosity::Warning) {
            tracing::warn!(iteration, "{message}");
        }
    }

    pub fn info(&self, iteration: usize, message: &str) {
        if self.enabled(Verbosity::Info) {
            tracing::info!(iteration, "{message}");
        }
    }

    /// Debug event. `message` is only built when debug output is enabled.
    pub fn debug(&self, iteration: usize, message: impl FnOnce() -> String) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!(iteration, "{}", message());
        }
    }
}
