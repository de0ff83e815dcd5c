//! Windowing engines that slice a stream into overlapping views.
//!
//! A [`WindowStrategy`] is a two-state machine: it yields consecutive windows
//! while data remains, then becomes exhausted and yields only empty windows.
//!
//! - [`SlidingWindow`]: fixed size and overlap
//! - [`AdaptiveWindow`]: resizes along a fixed ladder when the average
//!   attribute dispersion drifts between consecutive windows
//!
//! Windows are processed strictly in order; the engines hold sequential cursor
//! state and must not be shared across concurrent consumers.

mod adaptive;
mod dispersion;
mod sliding;

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::data::InstanceSnapshot;

pub use adaptive::{AdaptiveWindow, WINDOW_SIZE_LADDER};
pub use dispersion::average_dispersion;
pub use sliding::SlidingWindow;

pub(crate) use sliding::Cursor;

/// Default window size.
pub const DEFAULT_WINDOW_SIZE: usize = 500;
/// Default overlap between consecutive sliding windows.
pub const DEFAULT_OVERLAP: usize = 250;
/// Default overlap fraction of the adaptive window.
pub const DEFAULT_OVERLAP_FRACTION: f64 = 0.5;
/// Default half-width of the adaptive window's no-resize band.
pub const DEFAULT_RATIO_STEP: f64 = 0.2;

// =============================================================================
// Errors
// =============================================================================

/// Window engine construction errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WindowError {
    /// Window size must be at least 1.
    #[error("window size must be > 0")]
    InvalidSize,

    /// Overlap must be strictly smaller than the window size.
    #[error("overlap {overlap} must be smaller than window size {size}")]
    OverlapTooLarge { overlap: usize, size: usize },

    /// Overlap fraction must be in (0, 1].
    #[error("overlap fraction must be in (0, 1], got {0}")]
    InvalidOverlapFraction(f64),

    /// Ratio step must be in (0, 1).
    #[error("ratio step must be in (0, 1), got {0}")]
    InvalidRatioStep(f64),
}

// =============================================================================
// Window
// =============================================================================

/// A contiguous view of the stream.
///
/// Borrows the stream; yields `(stream_index, instance)` pairs in stream order.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    start: usize,
    instances: &'a [InstanceSnapshot],
}

impl<'a> Window<'a> {
    /// View `stream[bounds]`. Bounds are clamped to the stream length.
    pub fn new(stream: &'a [InstanceSnapshot], bounds: Range<usize>) -> Self {
        let end = bounds.end.min(stream.len());
        let start = bounds.start.min(end);
        Self {
            start,
            instances: &stream[start..end],
        }
    }

    /// An empty window.
    pub fn empty() -> Self {
        Self {
            start: 0,
            instances: &[],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// First stream index covered.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last stream index covered.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.instances.len()
    }

    #[inline]
    pub fn bounds(&self) -> Range<usize> {
        self.start..self.end()
    }

    #[inline]
    pub fn instances(&self) -> &'a [InstanceSnapshot] {
        self.instances
    }

    /// Iterate `(stream_index, instance)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a InstanceSnapshot)> + 'a {
        let start = self.start;
        self.instances
            .iter()
            .enumerate()
            .map(move |(offset, inst)| (start + offset, inst))
    }

    /// Instances of this window restricted to `attributes`, for consumers that
    /// re-evaluate a window on a reduct.
    pub fn project(&self, attributes: &[usize]) -> Vec<InstanceSnapshot> {
        self.instances.iter().map(|i| i.project(attributes)).collect()
    }
}

// =============================================================================
// WindowStrategy
// =============================================================================

/// Produces consecutive, overlapping windows of a stream.
pub trait WindowStrategy: Send {
    /// Advance and return the next window.
    ///
    /// Once the stream is exhausted every call returns an empty window.
    fn next_window<'a>(&mut self, stream: &'a [InstanceSnapshot]) -> Window<'a>;

    /// Re-materialize the last returned window without advancing.
    ///
    /// Empty before the first call to [`next_window`](Self::next_window).
    fn current_window<'a>(&self, stream: &'a [InstanceSnapshot]) -> Window<'a>;

    /// Advisory estimate of the total number of `next_window` calls.
    ///
    /// Only meant for progress reporting; may change as the engine adapts.
    fn total_iterations(&self) -> usize;

    /// Returns true once the engine has yielded its final window.
    fn is_exhausted(&self) -> bool;

    /// Size used for the next window.
    fn window_size(&self) -> usize;

    /// Overlap used for the next window.
    fn overlap(&self) -> usize;
}

impl<W: WindowStrategy + ?Sized> WindowStrategy for Box<W> {
    fn next_window<'a>(&mut self, stream: &'a [InstanceSnapshot]) -> Window<'a> {
        (**self).next_window(stream)
    }

    fn current_window<'a>(&self, stream: &'a [InstanceSnapshot]) -> Window<'a> {
        (**self).current_window(stream)
    }

    fn total_iterations(&self) -> usize {
        (**self).total_iterations()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }

    fn window_size(&self) -> usize {
        (**self).window_size()
    }

    fn overlap(&self) -> usize {
        (**self).overlap()
    }
}

// =============================================================================
// WindowConfig
// =============================================================================

/// Serializable description of a window engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowConfig {
    Sliding {
        size: usize,
        overlap: usize,
    },
    Adaptive {
        initial_size: usize,
        overlap_fraction: f64,
        ratio_step: f64,
    },
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig::Sliding {
            size: DEFAULT_WINDOW_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl WindowConfig {
    /// Adaptive engine with the default overlap fraction and ratio step.
    pub fn adaptive(initial_size: usize) -> Self {
        WindowConfig::Adaptive {
            initial_size,
            overlap_fraction: DEFAULT_OVERLAP_FRACTION,
            ratio_step: DEFAULT_RATIO_STEP,
        }
    }

    /// Build the engine for a stream of `n_instances` records.
    pub fn build(&self, n_instances: usize) -> Result<Box<dyn WindowStrategy>, WindowError> {
        Ok(match *self {
            WindowConfig::Sliding { size, overlap } => {
                Box::new(SlidingWindow::new(n_instances, size, overlap)?)
            }
            WindowConfig::Adaptive {
                initial_size,
                overlap_fraction,
                ratio_step,
            } => Box::new(AdaptiveWindow::new(
                n_instances,
                initial_size,
                overlap_fraction,
                ratio_step,
            )?),
        })
    }
}

/// Advisory count of windows left: `2 + floor((remaining - size) / (size - overlap))`,
/// never below 1.
pub(crate) fn iteration_estimate(remaining: usize, size: usize, overlap: usize) -> usize {
    let step = (size - overlap) as i64;
    let estimate = 2 + (remaining as i64 - size as i64).div_euclid(step);
    estimate.max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::numeric_stream;

    #[test]
    fn window_view_indices() {
        let stream = numeric_stream(&[&[1.0], &[2.0], &[3.0], &[4.0]], &[0, 1, 0, 1]);
        let w = Window::new(&stream, 1..3);
        assert_eq!(w.len(), 2);
        assert_eq!(w.bounds(), 1..3);
        let indices: Vec<usize> = w.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(w.iter().map(|(_, inst)| inst.index()).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn window_view_clamps() {
        let stream = numeric_stream(&[&[1.0], &[2.0]], &[0, 1]);
        let w = Window::new(&stream, 1..10);
        assert_eq!(w.bounds(), 1..2);
        let w = Window::new(&stream, 5..10);
        assert!(w.is_empty());
        assert!(Window::empty().is_empty());
    }

    #[test]
    fn window_projection() {
        let stream = numeric_stream(&[&[1.0, 10.0], &[2.0, 20.0]], &[0, 1]);
        let projected = Window::new(&stream, 0..2).project(&[1]);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[1].n_attributes(), 1);
        assert_eq!(projected[1].numeric(0), Some(20.0));
        assert_eq!(projected[1].index(), 1);
    }

    #[test]
    fn iteration_estimate_floor_division() {
        assert_eq!(iteration_estimate(1000, 500, 250), 4);
        assert_eq!(iteration_estimate(50, 100, 50), 1);
        assert_eq!(iteration_estimate(0, 100, 99), 1);
        assert_eq!(iteration_estimate(1050, 100, 0), 11);
    }

    #[test]
    fn config_builds_engines() {
        let sliding = WindowConfig::Sliding { size: 10, overlap: 5 }.build(100).unwrap();
        assert_eq!(sliding.window_size(), 10);
        assert_eq!(sliding.overlap(), 5);

        let adaptive = WindowConfig::adaptive(200).build(100).unwrap();
        assert_eq!(adaptive.window_size(), 200);
        assert_eq!(adaptive.overlap(), 100);

        let bad = WindowConfig::Sliding { size: 5, overlap: 5 }.build(100);
        assert!(matches!(bad, Err(WindowError::OverlapTooLarge { overlap: 5, size: 5 })));
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = WindowConfig::adaptive(300);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"kind\":\"adaptive\""));
        let restored: WindowConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
