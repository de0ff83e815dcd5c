//! Reduct value type.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::data::DatasetMetadata;

/// An attribute subset together with its dependency score.
///
/// The score is always supplied by the search; the reduct never computes it.
/// Attributes iterate in ascending index order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Reduct {
    attributes: BTreeSet<usize>,
    score: f64,
}

impl Reduct {
    /// Empty reduct with score 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reduct with the given attributes and score.
    pub fn from_parts(attributes: impl IntoIterator<Item = usize>, score: f64) -> Self {
        Self {
            attributes: attributes.into_iter().collect(),
            score,
        }
    }

    #[inline]
    pub fn contains(&self, attribute: usize) -> bool {
        self.attributes.contains(&attribute)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Insert `attribute` and adopt `score`.
    pub fn add(&mut self, attribute: usize, score: f64) {
        self.attributes.insert(attribute);
        self.score = score;
    }

    /// Delete `attribute` and adopt `score`.
    pub fn remove(&mut self, attribute: usize, score: f64) {
        self.attributes.remove(&attribute);
        self.score = score;
    }

    /// Replace the score without touching the attribute set.
    pub fn rescore(&mut self, score: f64) {
        self.score = score;
    }

    /// Returns true when the score is exactly 1.
    ///
    /// Scores are ratios of instance counts, so 1.0 is reached exactly.
    #[inline]
    pub fn has_max_score(&self) -> bool {
        self.score == 1.0
    }

    /// Attribute indices, ascending.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.attributes.iter().copied()
    }

    /// Attribute indices as a sorted vector.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    /// The reduct with attribute names resolved, e.g. `{outlook, humidity} (1.0000)`.
    ///
    /// Unknown indices are printed as `#<index>`.
    pub fn describe(&self, metadata: &DatasetMetadata) -> String {
        let names: Vec<String> = self
            .iter()
            .map(|i| match metadata.attribute_name(i) {
                Some(name) => name.to_string(),
                None => format!("#{i}"),
            })
            .collect();
        format!("{{{}}} ({:.4})", names.join(", "), self.score)
    }
}

impl fmt::Display for Reduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, attribute) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{attribute}")?;
        }
        write!(f, "}} ({:.4})", self.score)
    }
}
