//! Lightweight per-record instance snapshots.

use std::sync::Arc;

use super::value::AttributeValue;

/// Immutable view of one stream record.
///
/// Holds one [`AttributeValue`] per non-class attribute, in attribute order,
/// together with the record's stable position in the stream and its class.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceSnapshot {
    index: usize,
    class_index: usize,
    class_label: Arc<str>,
    attributes: Vec<AttributeValue>,
}

impl InstanceSnapshot {
    /// Create a snapshot.
    ///
    /// `attributes` must be ordered by attribute index; the position of a value
    /// in the vector is how the reduct search addresses it.
    pub fn new(
        index: usize,
        class_index: usize,
        class_label: impl Into<Arc<str>>,
        attributes: Vec<AttributeValue>,
    ) -> Self {
        debug_assert!(
            attributes.iter().enumerate().all(|(i, a)| a.index() == i),
            "attribute values must be ordered by attribute index"
        );
        Self {
            index,
            class_index,
            class_label: class_label.into(),
            attributes,
        }
    }

    /// Stable position of this record in the full stream.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn class_index(&self) -> usize {
        self.class_index
    }

    #[inline]
    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    #[inline]
    pub fn attributes(&self) -> &[AttributeValue] {
        &self.attributes
    }

    #[inline]
    pub fn n_attributes(&self) -> usize {
        self.attributes.len()
    }

    /// Value of the attribute at `index`, if present.
    #[inline]
    pub fn attribute(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Numeric payload of the attribute at `index`.
    ///
    /// Returns `None` for nominal or missing attributes.
    #[inline]
    pub fn numeric(&self, index: usize) -> Option<f64> {
        self.attribute(index).and_then(AttributeValue::as_numeric)
    }

    /// Returns true if both snapshots hold equal values on every attribute in
    /// `subset`. An attribute missing on either side never matches.
    pub fn same_values(&self, other: &InstanceSnapshot, subset: &[usize]) -> bool {
        subset
            .iter()
            .all(|&i| match (self.attribute(i), other.attribute(i)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            })
    }

    /// A copy of this snapshot restricted to the attributes in `subset`.
    ///
    /// Stream index and class data are kept. Retained values are re-indexed
    /// densely in `subset` order so the projection is itself a valid snapshot;
    /// labels keep the original attribute names.
    pub fn project(&self, subset: &[usize]) -> InstanceSnapshot {
        let attributes = subset
            .iter()
            .filter_map(|&i| self.attribute(i))
            .enumerate()
            .map(|(new_index, value)| match value {
                AttributeValue::Numeric { label, value, .. } => AttributeValue::Numeric {
                    index: new_index,
                    label: Arc::clone(label),
                    value: *value,
                },
                AttributeValue::Nominal { label, value, .. } => AttributeValue::Nominal {
                    index: new_index,
                    label: Arc::clone(label),
                    value: Arc::clone(value),
                },
            })
            .collect();

        InstanceSnapshot {
            index: self.index,
            class_index: self.class_index,
            class_label: Arc::clone(&self.class_label),
            attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(index: usize, a: f64, colour: &str, class_index: usize) -> InstanceSnapshot {
        InstanceSnapshot::new(
            index,
            class_index,
            if class_index == 0 { "no" } else { "yes" },
            vec![
                AttributeValue::numeric(0, "a", a),
                AttributeValue::nominal(1, "colour", colour),
                AttributeValue::numeric(2, "b", 1.0),
            ],
        )
    }

    #[test]
    fn same_values_on_subset() {
        let x = snapshot(0, 1.0, "red", 0);
        let y = snapshot(1, 2.0, "red", 1);
        assert!(x.same_values(&y, &[1, 2]));
        assert!(!x.same_values(&y, &[0, 1]));
        assert!(x.same_values(&y, &[]));
    }

    #[test]
    fn same_values_out_of_range_never_matches() {
        let x = snapshot(0, 1.0, "red", 0);
        assert!(!x.same_values(&x, &[7]));
    }

    #[test]
    fn numeric_accessor_skips_nominal() {
        let x = snapshot(0, 1.5, "red", 0);
        assert_eq!(x.numeric(0), Some(1.5));
        assert_eq!(x.numeric(1), None);
        assert_eq!(x.numeric(9), None);
    }

    #[test]
    fn project_keeps_identity_and_reindexes() {
        let x = snapshot(17, 1.5, "blue", 1);
        let p = x.project(&[1, 2]);
        assert_eq!(p.index(), 17);
        assert_eq!(p.class_index(), 1);
        assert_eq!(p.class_label(), "yes");
        assert_eq!(p.n_attributes(), 2);
        assert_eq!(p.attribute(0).map(|v| v.label()), Some("colour"));
        assert_eq!(p.attribute(0).and_then(|v| v.as_nominal()), Some("blue"));
        assert_eq!(p.numeric(1), Some(1.0));
    }
}
