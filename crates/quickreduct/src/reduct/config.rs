//! Quick-reduct configuration with builder pattern.
//!
//! # Example
//!
//! ```
//! use quickreduct::distance::DistanceKind;
//! use quickreduct::reduct::QuickReductConfig;
//!
//! // All defaults
//! let config = QuickReductConfig::builder().build().unwrap();
//! assert_eq!(config.similarity_threshold, 0.0);
//!
//! // Approximate matching on numeric attributes
//! let config = QuickReductConfig::builder()
//!     .similarity_threshold(0.5)
//!     .distance(DistanceKind::Manhattan)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! ```

use std::num::NonZeroUsize;

use bon::Builder;

use crate::distance::DistanceKind;
use crate::logger::Verbosity;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Similarity threshold must be finite and non-negative.
    #[error("similarity_threshold must be finite and >= 0, got {0}")]
    InvalidSimilarityThreshold(f64),

    /// At least one stalled growth round must be tolerated.
    #[error("max_stalled_rounds must be at least 1")]
    InvalidStallRounds,
}

// =============================================================================
// QuickReductConfig
// =============================================================================

/// Configuration of the per-window reduct search.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct QuickReductConfig {
    /// Largest numeric distance at which an instance still joins a granule.
    /// Default: 0.0 (exact matching).
    #[builder(default = 0.0)]
    pub similarity_threshold: f64,

    /// Distance on the numeric attributes. Default: Euclidean.
    #[builder(default)]
    pub distance: DistanceKind,

    /// Seed of the zero-score tie-break generator. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    /// Number of threads. `None` uses all available cores.
    ///
    /// Applied by [`ReductStream`](crate::stream::ReductStream), which runs the
    /// search inside [`run_with_threads`](crate::utils::run_with_threads). A
    /// direct [`QuickReduct::compute_reduct`](crate::reduct::QuickReduct::compute_reduct)
    /// call only takes the sequential/parallel switch from it and runs on the
    /// caller's rayon pool; wrap it in `run_with_threads(config.thread_count(), ..)`
    /// to bound the pool.
    pub n_threads: Option<NonZeroUsize>,

    /// Consecutive growth rounds without improvement before growth stops.
    /// Default: 1.
    #[builder(default = 1)]
    pub max_stalled_rounds: usize,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: quick_reduct_config_builder::IsComplete> QuickReductConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `similarity_threshold` is negative or not finite
    /// - `max_stalled_rounds == 0`
    pub fn build(self) -> Result<QuickReductConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl QuickReductConfig {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.similarity_threshold.is_finite() && self.similarity_threshold >= 0.0) {
            return Err(ConfigError::InvalidSimilarityThreshold(self.similarity_threshold));
        }
        if self.max_stalled_rounds == 0 {
            return Err(ConfigError::InvalidStallRounds);
        }
        Ok(())
    }

    /// Thread count for [`run_with_threads`](crate::utils::run_with_threads):
    /// 0 means all cores.
    pub fn thread_count(&self) -> usize {
        self.n_threads.map_or(0, NonZeroUsize::get)
    }
}

impl Default for QuickReductConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.0,
            distance: DistanceKind::default(),
            seed: 42,
            n_threads: None,
            max_stalled_rounds: 1,
            verbosity: Verbosity::default(),
        }
    }
}
