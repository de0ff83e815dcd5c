//! Distance calculators between instance snapshots.
//!
//! Controls how "close" two instances are on the numeric attributes of a
//! candidate attribute set during information-granule construction.
//!
//! # Available Calculators
//!
//! | Calculator | Formula |
//! |------------|---------|
//! | [`Euclidean`] | `sqrt(Σ (a_i - b_i)²)` |
//! | [`Manhattan`] | `Σ |a_i - b_i|` |
//!
//! Both only look at numeric attributes of the subset; nominal attributes are
//! handled by exact matching in the granule builder. With an empty subset they
//! return [`NO_DISTANCE`], which every non-negative threshold accepts.

use serde::{Deserialize, Serialize};

use crate::data::InstanceSnapshot;

/// Sentinel returned for an empty attribute subset.
pub const NO_DISTANCE: f64 = -1.0;

/// Trait for numeric distances between two instances.
pub trait DistanceFn: Send + Sync {
    /// Distance between `a` and `b` on the attributes in `subset`.
    ///
    /// Returns [`NO_DISTANCE`] when `subset` is empty.
    fn distance(&self, a: &InstanceSnapshot, b: &InstanceSnapshot, subset: &[usize]) -> f64;

    /// Short identifier.
    fn name(&self) -> &'static str;
}

/// Iterate the per-attribute numeric differences of two instances.
///
/// Attributes that are not numeric on both sides are skipped.
#[inline]
fn numeric_deltas<'a>(
    a: &'a InstanceSnapshot,
    b: &'a InstanceSnapshot,
    subset: &'a [usize],
) -> impl Iterator<Item = f64> + 'a {
    subset
        .iter()
        .filter_map(move |&i| Some(a.numeric(i)? - b.numeric(i)?))
}

/// Euclidean distance between instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl DistanceFn for Euclidean {
    fn distance(&self, a: &InstanceSnapshot, b: &InstanceSnapshot, subset: &[usize]) -> f64 {
        if subset.is_empty() {
            return NO_DISTANCE;
        }
        numeric_deltas(a, b, subset)
            .map(|d| d * d)
            .sum::<f64>()
            .sqrt()
    }

    fn name(&self) -> &'static str {
        "euclidean"
    }
}

/// Manhattan distance between instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl DistanceFn for Manhattan {
    fn distance(&self, a: &InstanceSnapshot, b: &InstanceSnapshot, subset: &[usize]) -> f64 {
        if subset.is_empty() {
            return NO_DISTANCE;
        }
        numeric_deltas(a, b, subset).map(f64::abs).sum()
    }

    fn name(&self) -> &'static str {
        "manhattan"
    }
}

/// Selects one of the built-in distance calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceKind {
    #[default]
    Euclidean,
    Manhattan,
}

impl DistanceFn for DistanceKind {
    #[inline]
    fn distance(&self, a: &InstanceSnapshot, b: &InstanceSnapshot, subset: &[usize]) -> f64 {
        match self {
            DistanceKind::Euclidean => Euclidean.distance(a, b, subset),
            DistanceKind::Manhattan => Manhattan.distance(a, b, subset),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            DistanceKind::Euclidean => Euclidean.name(),
            DistanceKind::Manhattan => Manhattan.name(),
        }
    }
}
