//! Deterministic synthetic streams for tests and benchmarks.
//!
//! All generated attributes are numeric and named `a0, a1, ...`; classes are
//! labelled `c0, c1, ...`, matching [`numeric_metadata`].

use rand::prelude::*;

use crate::data::{AttributeMeta, AttributeValue, DatasetMetadata, InstanceSnapshot};

fn attribute_name(index: usize) -> String {
    format!("a{index}")
}

fn class_name(index: usize) -> String {
    format!("c{index}")
}

/// Metadata for `n_attributes` numeric attributes and `n_classes` classes.
pub fn numeric_metadata(n_attributes: usize, n_classes: usize) -> DatasetMetadata {
    assert!(n_classes > 0, "at least one class is required");
    DatasetMetadata::new(
        "synthetic",
        0,
        (0..n_attributes)
            .map(|i| AttributeMeta::numeric(attribute_name(i)))
            .collect(),
        (0..n_classes).map(class_name),
    )
    .expect("generated names are unique")
}

/// Build a stream from numeric rows and class indices.
///
/// Stream indices follow row order.
pub fn numeric_stream(rows: &[&[f64]], classes: &[usize]) -> Vec<InstanceSnapshot> {
    assert_eq!(rows.len(), classes.len(), "one class per row");
    rows.iter()
        .zip(classes)
        .enumerate()
        .map(|(index, (row, &class))| {
            let attributes = row
                .iter()
                .enumerate()
                .map(|(i, &v)| AttributeValue::numeric(i, attribute_name(i), v))
                .collect();
            InstanceSnapshot::new(index, class, class_name(class), attributes)
        })
        .collect()
}

/// Two classes, two attributes: `a0` equals the class, `a1` alternates 0/1
/// independently of it.
///
/// `a0` alone separates the classes; `a1` alone explains nothing.
pub fn separable_stream(n: usize) -> Vec<InstanceSnapshot> {
    let classes: Vec<usize> = (0..n).map(|i| (i / 2) % 2).collect();
    let rows: Vec<[f64; 2]> = (0..n)
        .map(|i| [classes[i] as f64, (i % 2) as f64])
        .collect();
    let refs: Vec<&[f64]> = rows.iter().map(|r| &r[..]).collect();
    numeric_stream(&refs, &classes)
}

/// Uniform random values in `[0, 1)` with uniformly random classes.
pub fn random_stream(
    n: usize,
    n_attributes: usize,
    n_classes: usize,
    seed: u64,
) -> Vec<InstanceSnapshot> {
    assert!(n_classes > 0, "at least one class is required");
    let mut rng = StdRng::seed_from_u64(seed);
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..n_attributes).map(|_| rng.r#gen::<f64>()).collect())
        .collect();
    let classes: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n_classes)).collect();
    let refs: Vec<&[f64]> = rows.iter().map(Vec::as_slice).collect();
    numeric_stream(&refs, &classes)
}

/// Random discrete values in `0..levels` with uniformly random classes.
///
/// With few levels no attribute subset separates the classes.
pub fn discrete_stream(
    n: usize,
    n_attributes: usize,
    levels: usize,
    n_classes: usize,
    seed: u64,
) -> Vec<InstanceSnapshot> {
    assert!(levels > 0 && n_classes > 0);
    let mut rng = StdRng::seed_from_u64(seed);
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|_| {
            (0..n_attributes)
                .map(|_| rng.gen_range(0..levels) as f64)
                .collect()
        })
        .collect();
    let classes: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n_classes)).collect();
    let refs: Vec<&[f64]> = rows.iter().map(Vec::as_slice).collect();
    numeric_stream(&refs, &classes)
}

/// Two classes, two discrete attributes, with concept drift at `change_point`.
///
/// Before the change `a0` determines the class and `a1` is noise; after it the
/// roles swap and values move to a wider range `{10, 20, 30, 40}`, raising the
/// dispersion.
pub fn drift_stream(n: usize, change_point: usize, seed: u64) -> Vec<InstanceSnapshot> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(n);
    let mut classes = Vec::with_capacity(n);

    for i in 0..n {
        let class = rng.gen_range(0..2usize);
        // two levels per class for the informative attribute, four for the noise
        let informative = (class * 2 + rng.gen_range(0..2usize)) as f64;
        let noise = rng.gen_range(0..4usize) as f64;
        let row = if i < change_point {
            [informative, noise]
        } else {
            [10.0 + 10.0 * noise, 10.0 + 10.0 * informative]
        };
        rows.push(row);
        classes.push(class);
    }

    let refs: Vec<&[f64]> = rows.iter().map(|r| &r[..]).collect();
    numeric_stream(&refs, &classes)
}
