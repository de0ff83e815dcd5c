//! Decision partitions, information granules and the dependency degree.
//!
//! Positions in this module are offsets into the window's instance slice, not
//! stream indices.
//!
//! # Granules
//!
//! Granules are built by pivot expansion rather than as true equivalence
//! classes: the first unassigned instance (in window order) becomes the pivot
//! and absorbs every later unassigned instance that
//!
//! 1. equals it on all nominal attributes of the subset, and
//! 2. lies within the similarity threshold on the numeric ones.
//!
//! Similarity is only checked against the pivot, so two members of the same
//! granule may be further apart than the threshold. Pivots are taken in
//! ascending window position, which makes the partition reproducible.

use crate::data::{DatasetMetadata, InstanceSnapshot};
use crate::distance::DistanceFn;

// =============================================================================
// DecisionPartition
// =============================================================================

/// Window instances grouped by class.
#[derive(Debug, Clone)]
pub struct DecisionPartition {
    classes: Vec<Vec<usize>>,
    class_of: Vec<usize>,
}

impl DecisionPartition {
    /// Group `instances` by class index.
    ///
    /// Holds at least `n_classes` (possibly empty) classes; grows if an
    /// instance carries a larger class index.
    pub fn new(instances: &[InstanceSnapshot], n_classes: usize) -> Self {
        let mut classes: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
        let mut class_of = Vec::with_capacity(instances.len());
        for (position, inst) in instances.iter().enumerate() {
            let class = inst.class_index();
            if class >= classes.len() {
                classes.resize_with(class + 1, Vec::new);
            }
            classes[class].push(position);
            class_of.push(class);
        }
        Self { classes, class_of }
    }

    /// Number of classes, including empty ones.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Number of partitioned instances.
    #[inline]
    pub fn n_instances(&self) -> usize {
        self.class_of.len()
    }

    /// Positions of the instances of `class`.
    pub fn class(&self, class: usize) -> &[usize] {
        self.classes.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Instance count per class.
    pub fn class_sizes(&self) -> Vec<usize> {
        self.classes.iter().map(Vec::len).collect()
    }

    /// Returns true if every position in `granule` belongs to one class.
    pub fn is_consistent(&self, granule: &[usize]) -> bool {
        let mut classes = granule.iter().map(|&p| self.class_of[p]);
        match classes.next() {
            Some(first) => classes.all(|c| c == first),
            None => true,
        }
    }
}

// =============================================================================
// SimilarityRelation
// =============================================================================

/// Decides whether an instance joins a pivot's granule.
#[derive(Clone, Copy)]
pub struct SimilarityRelation<'a> {
    metadata: &'a DatasetMetadata,
    distance: &'a dyn DistanceFn,
    threshold: f64,
}

impl<'a> SimilarityRelation<'a> {
    pub fn new(metadata: &'a DatasetMetadata, distance: &'a dyn DistanceFn, threshold: f64) -> Self {
        Self {
            metadata,
            distance,
            threshold,
        }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Nominal and numeric parts of `attributes`.
    #[inline]
    fn split(&self, attributes: &[usize]) -> (Vec<usize>, Vec<usize>) {
        self.metadata.split_by_kind(attributes)
    }

    /// Nominal values must match exactly; numeric values must be within the
    /// threshold. An empty numeric part yields the sentinel distance, which
    /// every threshold accepts.
    #[inline]
    fn related(
        &self,
        pivot: &InstanceSnapshot,
        other: &InstanceSnapshot,
        nominal: &[usize],
        numeric: &[usize],
    ) -> bool {
        pivot.same_values(other, nominal)
            && self.distance.distance(pivot, other, numeric) <= self.threshold
    }
}

impl std::fmt::Debug for SimilarityRelation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityRelation")
            .field("distance", &self.distance.name())
            .field("threshold", &self.threshold)
            .finish()
    }
}

// =============================================================================
// Granules and dependency degree
// =============================================================================

/// Partition `instances` into information granules on `attributes`.
///
/// Every instance lands in exactly one granule and each pivot is in its own
/// granule. Granules are returned in pivot order, members ascending.
pub fn information_granules(
    instances: &[InstanceSnapshot],
    attributes: &[usize],
    relation: &SimilarityRelation<'_>,
) -> Vec<Vec<usize>> {
    let (nominal, numeric) = relation.split(attributes);
    let mut assigned = vec![false; instances.len()];
    let mut granules = Vec::new();

    for pivot in 0..instances.len() {
        if assigned[pivot] {
            continue;
        }
        assigned[pivot] = true;
        let mut granule = vec![pivot];
        for other in pivot + 1..instances.len() {
            if !assigned[other]
                && relation.related(&instances[pivot], &instances[other], &nominal, &numeric)
            {
                assigned[other] = true;
                granule.push(other);
            }
        }
        granules.push(granule);
    }

    granules
}

/// Rough-set dependency degree of the classes on `attributes`.
///
/// The number of instances in class-consistent granules divided by the window
/// size. Always in `[0, 1]`; `0.0` for an empty attribute set or an empty
/// window.
pub fn dependency_degree(
    instances: &[InstanceSnapshot],
    partition: &DecisionPartition,
    attributes: &[usize],
    relation: &SimilarityRelation<'_>,
) -> f64 {
    if attributes.is_empty() || instances.is_empty() {
        return 0.0;
    }
    let positive: usize = information_granules(instances, attributes, relation)
        .iter()
        .filter(|g| partition.is_consistent(g))
        .map(Vec::len)
        .sum();
    positive as f64 / instances.len() as f64
}
