//! Property-based tests for the window engines.
//!
//! Every engine must eventually exhaust, cover the whole stream without gaps,
//! and make progress on every call.

use std::ops::Range;

use proptest::prelude::*;

use quickreduct::testing::random_stream;
use quickreduct::window::{AdaptiveWindow, SlidingWindow, WindowStrategy, WINDOW_SIZE_LADDER};
use quickreduct::InstanceSnapshot;

/// Drain `engine`, returning the bounds of every non-empty window.
///
/// Fails the test if the engine does not exhaust within `limit` calls.
fn drain<W: WindowStrategy>(
    engine: &mut W,
    stream: &[InstanceSnapshot],
    limit: usize,
) -> Vec<Range<usize>> {
    let mut bounds = Vec::new();
    for _ in 0..limit {
        let window = engine.next_window(stream);
        if window.is_empty() {
            assert!(engine.is_exhausted());
            return bounds;
        }
        assert_eq!(
            window.iter().map(|(i, inst)| (i, inst.index())).collect::<Vec<_>>(),
            window.bounds().map(|i| (i, i)).collect::<Vec<_>>()
        );
        bounds.push(window.bounds());
    }
    panic!("window engine did not exhaust within {limit} calls");
}

/// Windows start at 0, end at `n`, leave no gap and always move forward.
fn assert_covers(bounds: &[Range<usize>], n: usize) {
    if n == 0 {
        assert!(bounds.is_empty());
        return;
    }
    assert_eq!(bounds.first().map(|b| b.start), Some(0));
    assert_eq!(bounds.last().map(|b| b.end), Some(n));
    let mut covered = 0;
    for pair in bounds.windows(2) {
        covered = covered.max(pair[0].end);
        assert!(pair[1].start <= covered, "gap before {:?}", pair[1]);
        assert!(pair[1].start > pair[0].start, "no progress after {:?}", pair[0]);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sliding_windows_cover_stream(
        (size, overlap) in (1usize..60).prop_flat_map(|size| (Just(size), 0..size)),
        n in 0usize..400,
    ) {
        let stream = random_stream(n, 1, 2, 0);
        let mut engine = SlidingWindow::new(n, size, overlap).unwrap();
        let bounds = drain(&mut engine, &stream, n + 2);

        assert_covers(&bounds, n);
        for pair in bounds.windows(2) {
            prop_assert_eq!(pair[1].start, pair[0].end - overlap);
            prop_assert_eq!(pair[0].len(), size);
        }
        prop_assert!(bounds.iter().all(|b| !b.is_empty() && b.len() <= size));

        // exhausted engines keep returning empty windows
        prop_assert!(engine.next_window(&stream).is_empty());
        prop_assert!(engine.is_exhausted());
    }

    #[test]
    fn adaptive_windows_cover_stream(
        size_index in 0usize..WINDOW_SIZE_LADDER.len(),
        overlap_fraction in 0.05f64..=1.0,
        ratio_step in 0.05f64..0.95,
        n in 0usize..1500,
        seed in any::<u64>(),
    ) {
        let stream = random_stream(n, 2, 2, seed);
        let size = WINDOW_SIZE_LADDER[size_index];
        let mut engine = AdaptiveWindow::new(n, size, overlap_fraction, ratio_step).unwrap();
        let bounds = drain(&mut engine, &stream, n + 2);

        assert_covers(&bounds, n);
        prop_assert!(bounds.iter().all(|b| b.len() <= WINDOW_SIZE_LADDER[WINDOW_SIZE_LADDER.len() - 1]));
        prop_assert!(engine.window_size() >= WINDOW_SIZE_LADDER[0]);
        prop_assert!(engine.overlap() < engine.window_size());
        prop_assert!(engine.total_iterations() >= 1);
    }
}

#[test]
fn identical_dispersion_keeps_adaptive_size() {
    // every window of this periodic stream has the same dispersion
    let rows: Vec<[f64; 2]> = (0..2000).map(|i| [(i % 4) as f64, (i % 2) as f64]).collect();
    let refs: Vec<&[f64]> = rows.iter().map(|r| &r[..]).collect();
    let stream = quickreduct::testing::numeric_stream(&refs, &vec![0; refs.len()]);

    let mut engine = AdaptiveWindow::new(stream.len(), 400, 0.5, 0.2).unwrap();
    let bounds = drain(&mut engine, &stream, stream.len());
    assert_eq!(engine.window_size(), 400);
    assert!(bounds.iter().all(|b| b.len() == 400));
    assert_eq!(engine.previous_dispersion().map(|d| d > 0.0), Some(true));
}

#[test]
fn sliding_current_window_is_stable() {
    let stream = random_stream(50, 1, 2, 9);
    let mut engine = SlidingWindow::new(stream.len(), 20, 5).unwrap();
    let next = engine.next_window(&stream);
    let current = engine.current_window(&stream);
    assert_eq!(next.bounds(), current.bounds());
    assert_eq!(engine.current_window(&stream).bounds(), 0..20);
}
