//! Stream driver: runs the reduct search over every window of a stream.
//!
//! Windows are processed strictly in order. Each window's reduct is the warm
//! start of the next one, so the loop is sequential; parallelism only happens
//! inside a single window's candidate scoring.
//!
//! # Example
//!
//! ```
//! use quickreduct::reduct::QuickReductConfig;
//! use quickreduct::stream::ReductStream;
//! use quickreduct::testing::{numeric_metadata, separable_stream};
//! use quickreduct::window::SlidingWindow;
//!
//! let meta = numeric_metadata(2, 2);
//! let stream = separable_stream(100);
//! let config = QuickReductConfig::builder().build().unwrap();
//!
//! let mut window = SlidingWindow::new(stream.len(), 20, 10).unwrap();
//! let history = ReductStream::new(&meta, config).run(&stream, &mut window, |_| {});
//! assert_eq!(history.len(), 9);
//! assert_eq!(history.selection_frequency(2), vec![1.0, 0.0]);
//! ```

use std::ops::Range;

use ndarray::{Array2, ArrayView1, ArrayView2};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;

use crate::data::{DatasetError, DatasetMetadata, InstanceSnapshot};
use crate::logger::{ReductLogger, Verbosity};
use crate::reduct::{ConfigError, QuickReduct, QuickReductConfig, Reduct, RngTieBreaker, TieBreaker};
use crate::utils::run_with_threads;
use crate::window::{WindowConfig, WindowError, WindowStrategy};

// =============================================================================
// Errors
// =============================================================================

/// Errors from setting up a stream run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

// =============================================================================
// Results
// =============================================================================

/// Progress report passed to the run callback after each window.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// 1-based number of the window just processed.
    pub iteration: usize,
    /// The window engine's current estimate of the total; advisory only.
    pub total_iterations: usize,
    /// Stream bounds of the window just processed.
    pub window: Range<usize>,
}

/// Reduct of one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReduct {
    /// 0-based window ordinal.
    pub ordinal: usize,
    /// First stream index of the window.
    pub start: usize,
    /// One past the last stream index of the window.
    pub end: usize,
    pub reduct: Reduct,
}

impl WindowReduct {
    #[inline]
    pub fn window_size(&self) -> usize {
        self.end - self.start
    }
}

/// Reducts of all windows of a run, in window order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReductHistory {
    windows: Vec<WindowReduct>,
}

impl ReductHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the reduct of the next window.
    pub fn push(&mut self, bounds: Range<usize>, reduct: Reduct) {
        self.windows.push(WindowReduct {
            ordinal: self.windows.len(),
            start: bounds.start,
            end: bounds.end,
            reduct,
        });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn windows(&self) -> &[WindowReduct] {
        &self.windows
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowReduct> {
        self.windows.iter()
    }

    /// Reduct of the last processed window.
    pub fn last(&self) -> Option<&Reduct> {
        self.windows.last().map(|w| &w.reduct)
    }

    /// Attribute importance over time.
    ///
    /// Rows are windows and columns attributes. A cell holds the window's
    /// reduct score if the attribute is in the reduct, else 0. Attributes at
    /// or beyond `n_attributes` are ignored.
    pub fn importance_matrix(&self, n_attributes: usize) -> Array2<f64> {
        self.fill_matrix(n_attributes, |reduct| reduct.score())
    }

    /// Attribute selection over time: 1 where the attribute is in the
    /// window's reduct, else 0.
    pub fn selection_matrix(&self, n_attributes: usize) -> Array2<f64> {
        self.fill_matrix(n_attributes, |_| 1.0)
    }

    /// Fraction of windows whose reduct contains each attribute.
    ///
    /// All zeros for an empty history.
    pub fn selection_frequency(&self, n_attributes: usize) -> Vec<f64> {
        if self.is_empty() {
            return vec![0.0; n_attributes];
        }
        let n_windows = self.len() as f64;
        self.selection_matrix(n_attributes)
            .sum_axis(ndarray::Axis(0))
            .iter()
            .map(|&count| count / n_windows)
            .collect()
    }

    fn fill_matrix(&self, n_attributes: usize, cell: impl Fn(&Reduct) -> f64) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.len(), n_attributes));
        for (row, window) in self.windows.iter().enumerate() {
            let value = cell(&window.reduct);
            for attribute in window.reduct.iter().filter(|&a| a < n_attributes) {
                matrix[[row, attribute]] = value;
            }
        }
        matrix
    }
}

// =============================================================================
// ReductStream
// =============================================================================

/// Drives a [`QuickReduct`] search across the windows of a stream.
pub struct ReductStream<'a, T = RngTieBreaker<Xoshiro256PlusPlus>> {
    search: QuickReduct<'a, T>,
    logger: ReductLogger,
}

impl<'a> ReductStream<'a> {
    pub fn new(metadata: &'a DatasetMetadata, config: QuickReductConfig) -> Self {
        Self::with_search(QuickReduct::new(metadata, config))
    }
}

impl<'a, T: TieBreaker> ReductStream<'a, T> {
    /// Drive an existing search, e.g. one with a custom tie breaker.
    pub fn with_search(search: QuickReduct<'a, T>) -> Self {
        let logger = ReductLogger::new(search.config().verbosity);
        Self { search, logger }
    }

    pub fn search(&self) -> &QuickReduct<'a, T> {
        &self.search
    }

    /// Compute the reduct of every window `window` yields over `stream`.
    ///
    /// Stops at the first empty window. `progress` is called after each
    /// window. Runs inside a thread pool sized by the search's `n_threads`.
    pub fn run<W, F>(&mut self, stream: &[InstanceSnapshot], window: &mut W, mut progress: F) -> ReductHistory
    where
        W: WindowStrategy + ?Sized,
        F: FnMut(Progress) + Send,
    {
        let logger = self.logger;
        let n_threads = self.search.config().thread_count();
        let dataset = self.search.metadata().name().to_string();
        let search = &mut self.search;

        run_with_threads(n_threads, move |parallelism| {
            search.set_parallelism(parallelism);
            if logger.enabled(Verbosity::Info) {
                logger.info(
                    0,
                    &format!("{dataset}: {} instances, {:?}", stream.len(), parallelism),
                );
            }

            let mut history = ReductHistory::new();
            let mut previous = Reduct::empty();
            loop {
                let current = window.next_window(stream);
                if current.is_empty() {
                    break;
                }

                let reduct = search.compute_reduct(&current, &previous);
                let iteration = history.len() + 1;
                if logger.enabled(Verbosity::Info) {
                    logger.info(
                        iteration,
                        &format!(
                            "window {:?}: {}",
                            current.bounds(),
                            reduct.describe(search.metadata())
                        ),
                    );
                }

                history.push(current.bounds(), reduct.clone());
                progress(Progress {
                    iteration,
                    total_iterations: window.total_iterations(),
                    window: current.bounds(),
                });
                previous = reduct;
            }

            logger.info(history.len(), "stream exhausted");
            history
        })
    }

    /// Build the window engine from `config` and [`run`](Self::run) it.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Window`] if the window parameters are invalid.
    pub fn run_with_config<F>(
        &mut self,
        stream: &[InstanceSnapshot],
        config: &WindowConfig,
        progress: F,
    ) -> Result<ReductHistory, StreamError>
    where
        F: FnMut(Progress) + Send,
    {
        let mut window = config.build(stream.len())?;
        Ok(self.run(stream, &mut window, progress))
    }

    /// Ingest a coded sample-major matrix and [`run_with_config`](Self::run_with_config)
    /// over it.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Dataset`] if the records do not fit the search's
    /// metadata, or [`StreamError::Window`] if the window parameters are invalid.
    pub fn run_dense<F>(
        &mut self,
        features: ArrayView2<f64>,
        classes: ArrayView1<f64>,
        config: &WindowConfig,
        progress: F,
    ) -> Result<ReductHistory, StreamError>
    where
        F: FnMut(Progress) + Send,
    {
        let stream = self.search.metadata().stream_from_dense(features, classes)?;
        self.run_with_config(&stream, config, progress)
    }
}

impl<T> std::fmt::Debug for ReductStream<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReductStream")
            .field("search", &self.search)
            .finish()
    }
}
