//! Common utilities used across the crate.
//!
//! This module provides parallelism configuration and the small statistical
//! helpers shared by the window engines and the reduct search.

use ndarray::{ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

// =============================================================================
// Statistical Utilities
// =============================================================================

/// Population standard deviation (`ddof = 0`) of a slice of values.
///
/// Returns `0.0` for empty or single-value input, so degenerate windows never
/// produce `NaN`.
#[inline]
pub fn population_std(values: ArrayView1<f64>) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.std(0.0)
}

/// Mean of the per-column population standard deviations of a matrix.
///
/// Rows are samples and columns are attributes. Returns `0.0` when the matrix
/// has no rows or no columns.
pub fn mean_column_std(matrix: ArrayView2<f64>) -> f64 {
    let (n_rows, n_cols) = matrix.dim();
    if n_rows == 0 || n_cols == 0 {
        return 0.0;
    }
    let total: f64 = matrix.axis_iter(Axis(1)).map(population_std).sum();
    total / n_cols as f64
}

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// This is a simple flag passed through the reduct search. When `Parallel`,
/// candidate scoring may use `rayon` parallel iterators. When `Sequential`,
/// everything runs on the calling thread.
///
/// The actual thread pool is set up by [`run_with_threads`]. Components don't
/// manage thread pools, they just respect this flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Parallelism {
    Sequential,
    #[default]
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if rayon pool has multiple threads, sequential otherwise)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Map every item, in parallel when allowed. Output order always matches
    /// input order.
    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use the global rayon pool)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
///
/// If a dedicated pool cannot be created the closure runs sequentially.
#[inline]
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    match Parallelism::from_threads(n_threads) {
        Parallelism::Sequential => f(Parallelism::Sequential),
        Parallelism::Parallel if n_threads == 0 => f(Parallelism::Parallel),
        Parallelism::Parallel => {
            match rayon::ThreadPoolBuilder::new().num_threads(n_threads).build() {
                Ok(pool) => pool.install(|| f(Parallelism::Parallel)),
                Err(err) => {
                    tracing::warn!(%err, n_threads, "failed to build thread pool, running sequentially");
                    f(Parallelism::Sequential)
                }
            }
        }
    }
}
