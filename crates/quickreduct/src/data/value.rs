//! Attribute values carried by instance snapshots.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Logical attribute kinds.
///
/// The kind decides how two instances are compared on an attribute:
/// numeric attributes feed the distance calculator, nominal attributes must
/// match exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
pub enum AttributeKind {
    /// Continuous numeric attribute.
    #[default]
    Numeric,
    /// Nominal attribute with a finite label domain.
    Nominal,
}

impl AttributeKind {
    /// Returns true if this is a numeric attribute.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, AttributeKind::Numeric)
    }

    /// Returns true if this is a nominal attribute.
    #[inline]
    pub fn is_nominal(&self) -> bool {
        matches!(self, AttributeKind::Nominal)
    }
}

/// A single attribute value of one instance.
///
/// Carries the attribute's index and label alongside the payload. Labels are
/// shared with the dataset metadata, so cloning a value never copies strings.
///
/// Equality compares kind, index and payload. The label is descriptive only.
#[derive(Clone, Debug)]
pub enum AttributeValue {
    Numeric {
        index: usize,
        label: Arc<str>,
        value: f64,
    },
    Nominal {
        index: usize,
        label: Arc<str>,
        value: Arc<str>,
    },
}

impl AttributeValue {
    /// Create a numeric value.
    pub fn numeric(index: usize, label: impl Into<Arc<str>>, value: f64) -> Self {
        Self::Numeric {
            index,
            label: label.into(),
            value,
        }
    }

    /// Create a nominal value.
    pub fn nominal(index: usize, label: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        Self::Nominal {
            index,
            label: label.into(),
            value: value.into(),
        }
    }

    /// Attribute index within the dataset (class attribute excluded).
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Self::Numeric { index, .. } | Self::Nominal { index, .. } => *index,
        }
    }

    /// Attribute name.
    #[inline]
    pub fn label(&self) -> &str {
        match self {
            Self::Numeric { label, .. } | Self::Nominal { label, .. } => label,
        }
    }

    #[inline]
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::Numeric { .. } => AttributeKind::Numeric,
            Self::Nominal { .. } => AttributeKind::Nominal,
        }
    }

    /// The numeric payload, or `None` for nominal values.
    #[inline]
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Numeric { value, .. } => Some(*value),
            Self::Nominal { .. } => None,
        }
    }

    /// The nominal payload, or `None` for numeric values.
    #[inline]
    pub fn as_nominal(&self) -> Option<&str> {
        match self {
            Self::Numeric { .. } => None,
            Self::Nominal { value, .. } => Some(value),
        }
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Numeric { index: a, value: x, .. },
                Self::Numeric { index: b, value: y, .. },
            ) => a == b && x == y,
            (
                Self::Nominal { index: a, value: x, .. },
                Self::Nominal { index: b, value: y, .. },
            ) => a == b && x == y,
            _ => false,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric { label, value, .. } => write!(f, "{}={}", label, value),
            Self::Nominal { label, value, .. } => write!(f, "{}={}", label, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_default_is_numeric() {
        assert_eq!(AttributeKind::default(), AttributeKind::Numeric);
        assert!(AttributeKind::Nominal.is_nominal());
        assert!(!AttributeKind::Nominal.is_numeric());
    }

    #[test]
    fn equality_ignores_label() {
        let a = AttributeValue::numeric(2, "temp", 3.0);
        let b = AttributeValue::numeric(2, "temperature", 3.0);
        assert_eq!(a, b);
    }

    #[test]
    fn equality_requires_same_index_and_payload() {
        let a = AttributeValue::numeric(2, "temp", 3.0);
        assert_ne!(a, AttributeValue::numeric(3, "temp", 3.0));
        assert_ne!(a, AttributeValue::numeric(2, "temp", 3.5));
    }

    #[test]
    fn equality_requires_same_kind() {
        let numeric = AttributeValue::numeric(0, "day", 1.0);
        let nominal = AttributeValue::nominal(0, "day", "1.0");
        assert_ne!(numeric, nominal);
        assert_eq!(nominal, AttributeValue::nominal(0, "day", "1.0"));
    }

    #[test]
    fn accessors() {
        let v = AttributeValue::nominal(4, "colour", "red");
        assert_eq!(v.index(), 4);
        assert_eq!(v.label(), "colour");
        assert_eq!(v.kind(), AttributeKind::Nominal);
        assert_eq!(v.as_nominal(), Some("red"));
        assert_eq!(v.as_numeric(), None);
        assert_eq!(v.to_string(), "colour=red");
    }
}
