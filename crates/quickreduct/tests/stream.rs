//! Whole-stream runs through the driver.

use std::num::NonZeroUsize;

use quickreduct::testing::{drift_stream, numeric_metadata, random_stream, separable_stream};
use quickreduct::{
    AdaptiveWindow, QuickReduct, QuickReductConfig, ReductStream, SlidingWindow, StreamError,
    Verbosity, WindowConfig, WindowError, WindowStrategy,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[test]
fn sliding_run_tracks_drift() {
    let meta = numeric_metadata(2, 2);
    let stream = drift_stream(1000, 500, 42);
    let config = QuickReductConfig::builder().build().unwrap();
    let mut window = SlidingWindow::new(stream.len(), 100, 50).unwrap();

    let history = ReductStream::new(&meta, config).run(&stream, &mut window, |_| {});

    assert_eq!(history.len(), 19);
    let first = &history.windows()[0];
    assert_eq!((first.start, first.end), (0, 100));
    assert_eq!(first.reduct.to_vec(), vec![0]);
    assert_eq!(history.last().map(|r| r.to_vec()), Some(vec![1]));
    assert!(history.iter().all(|w| w.reduct.has_max_score()));

    let importance = history.importance_matrix(2);
    assert_eq!(importance.dim(), (19, 2));
    assert_eq!(importance[[0, 0]], 1.0);
    assert_eq!(importance[[0, 1]], 0.0);
    assert_eq!(importance[[18, 1]], 1.0);

    let frequency = history.selection_frequency(2);
    assert!(frequency[0] > 0.4 && frequency[0] < 0.7);
    assert!(frequency[1] > 0.4 && frequency[1] < 0.7);
}

#[test]
fn adaptive_run_grows_window_at_drift() {
    let meta = numeric_metadata(2, 2);
    let stream = drift_stream(3000, 1000, 5);
    let config = QuickReductConfig::builder().build().unwrap();
    let mut window = AdaptiveWindow::new(stream.len(), 100, 0.5, 0.2).unwrap();

    let mut totals = Vec::new();
    let history = ReductStream::new(&meta, config).run(&stream, &mut window, |p| {
        totals.push(p.total_iterations)
    });

    // dispersion jumps tenfold at the change point and the window grows
    assert!(window.window_size() > 100);
    assert!(history.iter().any(|w| w.window_size() > 100));
    assert_eq!(history.windows()[0].window_size(), 100);
    assert_eq!(history.last().map(|r| r.to_vec()), Some(vec![1]));
    assert_eq!(history.iter().last().map(|w| w.end), Some(3000));
    assert_eq!(totals.len(), history.len());
    assert!(window.is_exhausted());
}

#[test]
fn verbose_run_with_threads() {
    init_tracing();
    let meta = numeric_metadata(6, 3);
    let stream = random_stream(300, 6, 3, 17);
    let config = QuickReductConfig::builder()
        .n_threads(NonZeroUsize::new(2).unwrap())
        .verbosity(Verbosity::Debug)
        .build()
        .unwrap();

    let history = ReductStream::new(&meta, config)
        .run_with_config(&stream, &WindowConfig::adaptive(100), |_| {})
        .unwrap();
    assert!(!history.is_empty());
    assert!(history.iter().all(|w| (0.0..=1.0).contains(&w.reduct.score())));
}

#[test]
fn single_threaded_matches_default() {
    let meta = numeric_metadata(2, 2);
    let stream = drift_stream(600, 300, 8);
    let window = WindowConfig::Sliding { size: 80, overlap: 40 };

    let sequential = QuickReductConfig::builder()
        .n_threads(NonZeroUsize::new(1).unwrap())
        .build()
        .unwrap();
    let parallel = QuickReductConfig::builder().build().unwrap();

    let a = ReductStream::new(&meta, sequential)
        .run_with_config(&stream, &window, |_| {})
        .unwrap();
    let b = ReductStream::new(&meta, parallel)
        .run_with_config(&stream, &window, |_| {})
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn custom_search_is_driven() {
    let meta = numeric_metadata(2, 2);
    let stream = separable_stream(60);
    let config = QuickReductConfig::builder().build().unwrap();
    let search = QuickReduct::with_tie_breaker(&meta, config, quickreduct::reduct::FirstCandidate);

    let mut driver = ReductStream::with_search(search);
    let history = driver
        .run_with_config(&stream, &WindowConfig::Sliding { size: 20, overlap: 0 }, |_| {})
        .unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(driver.search().iteration(), 3);
}

#[test]
fn invalid_window_config_is_reported() {
    let meta = numeric_metadata(2, 2);
    let stream = separable_stream(10);
    let config = QuickReductConfig::builder().build().unwrap();

    let err = ReductStream::new(&meta, config)
        .run_with_config(
            &stream,
            &WindowConfig::Adaptive {
                initial_size: 100,
                overlap_fraction: 0.5,
                ratio_step: 1.5,
            },
            |_| {},
        )
        .unwrap_err();
    assert_eq!(err, StreamError::Window(WindowError::InvalidRatioStep(1.5)));
    assert_eq!(err.to_string(), "ratio step must be in (0, 1), got 1.5");
}

#[test]
fn config_errors_convert() {
    fn build() -> Result<QuickReductConfig, StreamError> {
        Ok(QuickReductConfig::builder().similarity_threshold(-1.0).build()?)
    }
    assert!(matches!(build(), Err(StreamError::Config(_))));
}
