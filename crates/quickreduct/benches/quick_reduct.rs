//! Benchmarks: per-window reduct search and whole-stream runs.
//!
//! Run with: cargo bench --bench quick_reduct

use std::num::NonZeroUsize;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use quickreduct::testing::{discrete_stream, numeric_metadata, random_stream};
use quickreduct::{QuickReduct, QuickReductConfig, Reduct, ReductStream, Window, WindowConfig};

// =============================================================================
// Single Window
// =============================================================================

fn bench_compute_reduct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduct/compute");
    let n_attributes = 10;
    let meta = numeric_metadata(n_attributes, 3);

    for window_size in [100usize, 300, 1000] {
        let stream = discrete_stream(window_size, n_attributes, 4, 3, 42);
        let window = Window::new(&stream, 0..window_size);
        group.throughput(Throughput::Elements(window_size as u64));

        for (label, n_threads) in [("sequential", 1usize), ("parallel", 4)] {
            let config = QuickReductConfig::builder()
                .n_threads(NonZeroUsize::new(n_threads).unwrap_or(NonZeroUsize::MIN))
                .build()
                .unwrap();
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n_threads)
                .build()
                .unwrap();
            group.bench_with_input(BenchmarkId::new(label, window_size), &window, |b, window| {
                b.iter(|| {
                    pool.install(|| {
                        let mut search = QuickReduct::new(&meta, config.clone());
                        black_box(search.compute_reduct(black_box(window), &Reduct::empty()))
                    })
                })
            });
        }
    }

    group.finish();
}

fn bench_similarity_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduct/threshold");
    let meta = numeric_metadata(8, 2);
    let stream = random_stream(500, 8, 2, 7);
    let window = Window::new(&stream, 0..500);

    for threshold in [0.0, 0.5, 1.0] {
        let config = QuickReductConfig::builder()
            .similarity_threshold(threshold)
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(threshold), &window, |b, window| {
            b.iter(|| {
                let mut search = QuickReduct::new(&meta, config.clone());
                black_box(search.compute_reduct(black_box(window), &Reduct::empty()))
            })
        });
    }

    group.finish();
}

// =============================================================================
// Whole Stream
// =============================================================================

fn bench_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream/run");
    group.sample_size(10);

    let meta = numeric_metadata(6, 3);
    let stream = discrete_stream(5_000, 6, 4, 3, 3);
    group.throughput(Throughput::Elements(stream.len() as u64));

    let configs = [
        ("sliding", WindowConfig::Sliding { size: 500, overlap: 250 }),
        ("adaptive", WindowConfig::adaptive(500)),
    ];
    for (label, window) in configs {
        group.bench_function(label, |b| {
            b.iter(|| {
                let config = QuickReductConfig::builder().build().unwrap();
                ReductStream::new(&meta, config)
                    .run_with_config(black_box(&stream), &window, |_| {})
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_reduct, bench_similarity_threshold, bench_stream);
criterion_main!(benches);
