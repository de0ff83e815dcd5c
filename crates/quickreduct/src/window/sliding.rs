//! Fixed-size overlapping windows.

use std::ops::Range;

use super::{iteration_estimate, Window, WindowError, WindowStrategy};
use crate::data::InstanceSnapshot;

/// Cursor shared by the window engines.
///
/// Tracks where the next window starts, the bounds of the last returned
/// window and whether the final window has been yielded.
#[derive(Debug, Clone, Default)]
pub(crate) struct Cursor {
    start: usize,
    last: Option<Range<usize>>,
    exhausted: bool,
    yielded: usize,
}

impl Cursor {
    /// Bounds of the next window of `size`, then step so the following window
    /// shares `overlap` instances with it.
    ///
    /// Returns `None` once exhausted. The window whose right edge reaches the
    /// end of the stream is still returned and exhausts the cursor.
    pub(crate) fn advance(&mut self, stream_len: usize, size: usize, overlap: usize) -> Option<Range<usize>> {
        if self.exhausted {
            return None;
        }
        let start = self.start.min(stream_len);
        let end = start.saturating_add(size).min(stream_len);
        if start.saturating_add(size) >= stream_len {
            self.exhausted = true;
        } else {
            self.start = end - overlap;
        }
        self.yielded += 1;
        self.last = Some(start..end);
        Some(start..end)
    }

    /// Bounds of the last returned window.
    pub(crate) fn last(&self) -> Option<Range<usize>> {
        self.last.clone()
    }

    /// Start of the next window.
    pub(crate) fn start(&self) -> usize {
        self.start
    }

    /// Number of windows returned so far.
    pub(crate) fn yielded(&self) -> usize {
        self.yielded
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub(crate) fn window<'a>(&self, stream: &'a [InstanceSnapshot]) -> Window<'a> {
        match self.last() {
            Some(bounds) => Window::new(stream, bounds),
            None => Window::empty(),
        }
    }
}

/// Sliding window with fixed size and overlap.
///
/// Each window covers `[start, min(start + size, n))`; the next one starts
/// `overlap` instances before the previous end.
///
/// # Example
///
/// ```
/// use quickreduct::testing::numeric_stream;
/// use quickreduct::window::{SlidingWindow, WindowStrategy};
///
/// let rows: Vec<[f64; 1]> = (0..10).map(|i| [i as f64]).collect();
/// let rows: Vec<&[f64]> = rows.iter().map(|r| &r[..]).collect();
/// let stream = numeric_stream(&rows, &[0; 10]);
///
/// let mut window = SlidingWindow::new(stream.len(), 4, 2).unwrap();
/// assert_eq!(window.next_window(&stream).bounds(), 0..4);
/// assert_eq!(window.next_window(&stream).bounds(), 2..6);
/// ```
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    n_instances: usize,
    size: usize,
    overlap: usize,
    cursor: Cursor,
}

impl SlidingWindow {
    /// Create a sliding window over a stream of `n_instances` records.
    ///
    /// # Errors
    ///
    /// Fails when `size` is 0 or `overlap >= size`.
    pub fn new(n_instances: usize, size: usize, overlap: usize) -> Result<Self, WindowError> {
        if size == 0 {
            return Err(WindowError::InvalidSize);
        }
        if overlap >= size {
            return Err(WindowError::OverlapTooLarge { overlap, size });
        }
        Ok(Self {
            n_instances,
            size,
            overlap,
            cursor: Cursor::default(),
        })
    }

    pub fn n_instances(&self) -> usize {
        self.n_instances
    }
}

impl WindowStrategy for SlidingWindow {
    fn next_window<'a>(&mut self, stream: &'a [InstanceSnapshot]) -> Window<'a> {
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
        iteration_estimate(self.n_instances, self.size, self.overlap)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::numeric_stream;

    fn stream(n: usize) -> Vec<InstanceSnapshot> {
        let rows: Vec<[f64; 1]> = (0..n).map(|i| [i as f64]).collect();
        let rows: Vec<&[f64]> = rows.iter().map(|r| &r[..]).collect();
        numeric_stream(&rows, &vec![0; n])
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert_eq!(SlidingWindow::new(10, 0, 0).unwrap_err(), WindowError::InvalidSize);
        assert_eq!(
            SlidingWindow::new(10, 4, 4).unwrap_err(),
            WindowError::OverlapTooLarge { overlap: 4, size: 4 }
        );
    }

    #[test]
    fn sliding_sequence() {
        let data = stream(10);
        let mut w = SlidingWindow::new(10, 4, 2).unwrap();
        assert!(w.current_window(&data).is_empty());

        let mut bounds = Vec::new();
        while !w.is_exhausted() {
            bounds.push(w.next_window(&data).bounds());
        }
        assert_eq!(bounds, vec![0..4, 2..6, 4..8, 6..10]);

        // exhausted: only empty windows, current window unchanged
        assert!(w.next_window(&data).is_empty());
        assert_eq!(w.current_window(&data).bounds(), 6..10);
    }

    #[test]
    fn last_window_may_be_partial() {
        let data = stream(10);
        let mut w = SlidingWindow::new(10, 4, 1).unwrap();
        let mut bounds = Vec::new();
        while !w.is_exhausted() {
            bounds.push(w.next_window(&data).bounds());
        }
        assert_eq!(bounds, vec![0..4, 3..7, 6..10]);

        let mut w = SlidingWindow::new(10, 6, 0).unwrap();
        assert_eq!(w.next_window(&data).bounds(), 0..6);
        assert!(!w.is_exhausted());
        assert_eq!(w.next_window(&data).bounds(), 6..10);
        assert!(w.is_exhausted());
    }

    #[test]
    fn window_larger_than_stream() {
        let data = stream(5);
        let mut w = SlidingWindow::new(5, 100, 50).unwrap();
        assert_eq!(w.next_window(&data).bounds(), 0..5);
        assert!(w.is_exhausted());
        assert_eq!(w.total_iterations(), 1);
    }

    #[test]
    fn empty_stream_exhausts_immediately() {
        let data = stream(0);
        let mut w = SlidingWindow::new(0, 3, 1).unwrap();
        assert!(w.next_window(&data).is_empty());
        assert!(w.is_exhausted());
    }

    #[test]
    fn current_window_matches_last() {
        let data = stream(10);
        let mut w = SlidingWindow::new(10, 4, 2).unwrap();
        let first = w.next_window(&data);
        let current = w.current_window(&data);
        assert_eq!(first.bounds(), current.bounds());
        assert_eq!(first.instances(), current.instances());
    }

    #[test]
    fn iteration_estimate_uses_floor_division() {
        let w = SlidingWindow::new(1000, 500, 250).unwrap();
        assert_eq!(w.total_iterations(), 4);
        let w = SlidingWindow::new(50, 100, 50).unwrap();
        assert_eq!(w.total_iterations(), 1);
    }
}
