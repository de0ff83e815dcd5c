//! Dispersion-driven adaptive windows.
//!
//! Before each advance the engine compares the average attribute dispersion of
//! the current window with the one measured at the previous advance. A ratio
//! inside `[1 - ratio_step, 1 + ratio_step]` keeps the size; anything else
//! walks [`WINDOW_SIZE_LADDER`] up (dispersion grew) or down (it shrank) by a
//! number of steps proportional to `|1 - ratio|`.
//!
//! This is a heuristic drift signal, not a statistical test.

use std::ops::Range;

use super::dispersion::average_dispersion;
use super::{iteration_estimate, Cursor, Window, WindowError, WindowStrategy};
use crate::data::InstanceSnapshot;

/// Window sizes the adaptive engine moves between, ascending.
pub const WINDOW_SIZE_LADDER: [usize; 10] = [100, 200, 300, 400, 500, 600, 700, 800, 900, 1000];

/// Adaptive window: sliding mechanics with a size that follows drift.
#[derive(Debug, Clone)]
pub struct AdaptiveWindow {
    n_instances: usize,
    size: usize,
    overlap: usize,
    overlap_fraction: f64,
    ratio_step: f64,
    previous_dispersion: Option<f64>,
    total_iterations: usize,
    cursor: Cursor,
}

impl AdaptiveWindow {
    /// Create an adaptive window over a stream of `n_instances` records.
    ///
    /// `overlap_fraction` is the share of each window carried into the next;
    /// `ratio_step` is the half-width of the no-resize band.
    ///
    /// # Errors
    ///
    /// Fails when `initial_size` is 0, `overlap_fraction` is outside (0, 1] or
    /// `ratio_step` is outside (0, 1).
    pub fn new(
        n_instances: usize,
        initial_size: usize,
        overlap_fraction: f64,
        ratio_step: f64,
    ) -> Result<Self, WindowError> {
        if initial_size == 0 {
            return Err(WindowError::InvalidSize);
        }
        if !(overlap_fraction > 0.0 && overlap_fraction <= 1.0) {
            return Err(WindowError::InvalidOverlapFraction(overlap_fraction));
        }
        if !(ratio_step > 0.0 && ratio_step < 1.0) {
            return Err(WindowError::InvalidRatioStep(ratio_step));
        }

        let overlap = overlap_for(initial_size, overlap_fraction);
        Ok(Self {
            n_instances,
            size: initial_size,
            overlap,
            overlap_fraction,
            ratio_step,
            previous_dispersion: None,
            total_iterations: iteration_estimate(n_instances, initial_size, overlap),
            cursor: Cursor::default(),
        })
    }

    pub fn overlap_fraction(&self) -> f64 {
        self.overlap_fraction
    }

    pub fn ratio_step(&self) -> f64 {
        self.ratio_step
    }

    /// Dispersion recorded at the last advance.
    pub fn previous_dispersion(&self) -> Option<f64> {
        self.previous_dispersion
    }

    /// Bounds the dispersion is measured on: the last returned window, or the
    /// first window before any advance.
    fn measured_bounds(&self) -> Range<usize> {
        self.cursor.last().unwrap_or(0..self.size)
    }

    /// Measure dispersion on the current window and resize if it drifted.
    fn adapt(&mut self, stream: &[InstanceSnapshot]) {
        let current = average_dispersion(Window::new(stream, self.measured_bounds()).instances());
        let iteration = self.cursor.yielded();

        // a zero or negative reference is treated like the first window
        if let Some(previous) = self.previous_dispersion.filter(|&p| p > 0.0) {
            let ratio = current / previous;
            let size = resized(self.size, ratio, self.ratio_step);
            tracing::debug!(iteration, previous, current, ratio, "window dispersion");

            if size != self.size {
                self.size = size;
                self.overlap = overlap_for(size, self.overlap_fraction);
                let remaining = self.n_instances.saturating_sub(self.cursor.start());
                self.total_iterations =
                    self.cursor.yielded() + iteration_estimate(remaining, self.size, self.overlap);
                tracing::debug!(
                    iteration,
                    size = self.size,
                    overlap = self.overlap,
                    "window resized"
                );
            }
        }

        self.previous_dispersion = Some(current);
    }
}

impl WindowStrategy for AdaptiveWindow {
    fn next_window<'a>(&mut self, stream: &'a [InstanceSnapshot]) -> Window<'a> {
        if self.cursor.is_exhausted() {
            return Window::empty();
        }
        self.adapt(stream);
        let stream_len = stream.len().min(self.n_instances);
        match self.cursor.advance(stream_len, self.size, self.overlap) {
            Some(bounds) => Window::new(stream, bounds),
            None => Window::empty(),
        }
    }

    fn current_window<'a>(&self, stream: &'a [InstanceSnapshot]) -> Window<'a> {
        self.cursor.window(stream)
    }

    fn total_iterations(&self) -> usize {
        self.total_iterations
    }

    fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }

    fn window_size(&self) -> usize {
        self.size
    }

    fn overlap(&self) -> usize {
        self.overlap
    }
}

/// Overlap for a window of `size`: `floor(size * fraction)`, kept below `size`
/// so every advance makes progress.
fn overlap_for(size: usize, fraction: f64) -> usize {
    ((size as f64 * fraction).floor() as usize).min(size - 1)
}

/// Ladder position of `size`; sizes off the ladder snap to the nearest entry,
/// ties going to the smaller one.
fn ladder_position(size: usize) -> usize {
    WINDOW_SIZE_LADDER
        .iter()
        .enumerate()
        .min_by_key(|&(_, &s)| s.abs_diff(size))
        .map_or(0, |(i, _)| i)
}

/// Window size after observing dispersion `ratio`.
fn resized(size: usize, ratio: f64, ratio_step: f64) -> usize {
    if !ratio.is_finite() || (1.0 - ratio_step..=1.0 + ratio_step).contains(&ratio) {
        return size;
    }

    let last = WINDOW_SIZE_LADDER.len() - 1;
    let position = ladder_position(size);
    let shift = (1.0 - ratio).abs();
    let target = if ratio > 1.0 {
        let steps = (((last - position) as f64 * shift).floor() as usize).max(1);
        (position + steps).min(last)
    } else {
        let steps = ((position as f64 * shift).floor() as usize).max(1);
        position.saturating_sub(steps)
    };
    WINDOW_SIZE_LADDER[target]
}
