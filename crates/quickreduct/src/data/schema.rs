//! Dataset metadata.
//!
//! Describes the attributes and class labels of a stream. Built once from the
//! source header and shared read-only by every window.

use std::collections::HashMap;
use std::sync::Arc;

use ndarray::{ArrayView1, ArrayView2};

use super::error::DatasetError;
use super::instance::InstanceSnapshot;
use super::value::{AttributeKind, AttributeValue};

/// Metadata for a single (non-class) attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeMeta {
    /// Attribute name.
    pub name: Arc<str>,

    /// Attribute kind.
    pub kind: AttributeKind,

    /// Ordered label domain for nominal attributes. Empty for numeric ones.
    pub values: Vec<Arc<str>>,
}

impl AttributeMeta {
    /// Create metadata for a numeric attribute.
    pub fn numeric(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
            values: Vec::new(),
        }
    }

    /// Create metadata for a nominal attribute with the given label domain.
    pub fn nominal<S: Into<Arc<str>>>(
        name: impl Into<Arc<str>>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Attribute and class description of a stream.
///
/// Keeps bidirectional name↔index maps for attributes and for class labels.
/// The class attribute is not counted among the attributes.
#[derive(Clone, Debug)]
pub struct DatasetMetadata {
    name: String,
    n_instances: usize,
    attributes: Vec<AttributeMeta>,
    attribute_index: HashMap<Arc<str>, usize>,
    class_labels: Vec<Arc<str>>,
    class_index: HashMap<Arc<str>, usize>,
}

impl DatasetMetadata {
    /// Build metadata from attribute descriptions and class labels.
    ///
    /// # Errors
    ///
    /// Fails on duplicate attribute names, duplicate class labels or an empty
    /// class domain.
    pub fn new<S: Into<Arc<str>>>(
        name: impl Into<String>,
        n_instances: usize,
        attributes: Vec<AttributeMeta>,
        class_labels: impl IntoIterator<Item = S>,
    ) -> Result<Self, DatasetError> {
        let mut attribute_index = HashMap::with_capacity(attributes.len());
        for (i, meta) in attributes.iter().enumerate() {
            if attribute_index.insert(Arc::clone(&meta.name), i).is_some() {
                return Err(DatasetError::DuplicateAttributeName(meta.name.to_string()));
            }
        }

        let class_labels: Vec<Arc<str>> = class_labels.into_iter().map(Into::into).collect();
        if class_labels.is_empty() {
            return Err(DatasetError::EmptyClassDomain);
        }
        let mut class_index = HashMap::with_capacity(class_labels.len());
        for (i, label) in class_labels.iter().enumerate() {
            if class_index.insert(Arc::clone(label), i).is_some() {
                return Err(DatasetError::DuplicateClassLabel(label.to_string()));
            }
        }

        Ok(Self {
            name: name.into(),
            n_instances,
            attributes,
            attribute_index,
            class_labels,
            class_index,
        })
    }

    /// Dataset (relation) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n_instances(&self) -> usize {
        self.n_instances
    }

    /// Number of non-class attributes.
    pub fn n_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn n_classes(&self) -> usize {
        self.class_labels.len()
    }

    /// Get metadata for an attribute by index.
    pub fn attribute(&self, index: usize) -> Option<&AttributeMeta> {
        self.attributes.get(index)
    }

    /// Kind of the attribute at `index`. Unknown indices report numeric.
    pub fn attribute_kind(&self, index: usize) -> AttributeKind {
        self.attributes
            .get(index)
            .map(|m| m.kind)
            .unwrap_or_default()
    }

    /// Get attribute index by name.
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attribute_index.get(name).copied()
    }

    /// Get attribute name by index.
    pub fn attribute_name(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).map(|m| &*m.name)
    }

    /// Get class index by label.
    pub fn class_index(&self, label: &str) -> Option<usize> {
        self.class_index.get(label).copied()
    }

    /// Get class label by index.
    pub fn class_label(&self, index: usize) -> Option<&str> {
        self.class_labels.get(index).map(|l| &**l)
    }

    /// Iterate over `(index, metadata)` pairs.
    pub fn iter_attributes(&self) -> impl Iterator<Item = (usize, &AttributeMeta)> {
        self.attributes.iter().enumerate()
    }

    /// Indices of all numeric attributes, ascending.
    pub fn numeric_attributes(&self) -> Vec<usize> {
        self.iter_attributes()
            .filter(|(_, m)| m.kind.is_numeric())
            .map(|(i, _)| i)
            .collect()
    }

    /// Split an attribute set into its `(nominal, numeric)` parts, preserving
    /// order.
    pub fn split_by_kind(&self, attributes: &[usize]) -> (Vec<usize>, Vec<usize>) {
        attributes
            .iter()
            .copied()
            .partition(|&i| self.attribute_kind(i).is_nominal())
    }

    /// Convert a dense coded record into a snapshot.
    ///
    /// `row` holds one value per attribute; nominal attributes are stored as
    /// their code in the attribute's label domain. `class_code` is the class
    /// label's code.
    ///
    /// # Errors
    ///
    /// Fails when the row length does not match the attribute count or when a
    /// nominal or class code is out of range.
    pub fn snapshot_from_dense(
        &self,
        index: usize,
        row: &[f64],
        class_code: f64,
    ) -> Result<InstanceSnapshot, DatasetError> {
        if row.len() != self.attributes.len() {
            return Err(DatasetError::AttributeCountMismatch {
                expected: self.attributes.len(),
                got: row.len(),
            });
        }

        let class_index = code_to_index(class_code, self.class_labels.len()).ok_or(
            DatasetError::ClassOutOfRange {
                code: class_code,
                n_classes: self.class_labels.len(),
            },
        )?;

        let mut values = Vec::with_capacity(row.len());
        for (i, (meta, &raw)) in self.attributes.iter().zip(row).enumerate() {
            let value = match meta.kind {
                AttributeKind::Numeric => AttributeValue::numeric(i, Arc::clone(&meta.name), raw),
                AttributeKind::Nominal => {
                    let code = code_to_index(raw, meta.values.len()).ok_or_else(|| {
                        DatasetError::NominalCodeOutOfRange {
                            attribute: meta.name.to_string(),
                            code: raw,
                            domain_size: meta.values.len(),
                        }
                    })?;
                    AttributeValue::nominal(
                        i,
                        Arc::clone(&meta.name),
                        Arc::clone(&meta.values[code]),
                    )
                }
            };
            values.push(value);
        }

        Ok(InstanceSnapshot::new(
            index,
            class_index,
            Arc::clone(&self.class_labels[class_index]),
            values,
        ))
    }

    /// Convert a coded sample-major matrix into a stream.
    ///
    /// Row `i` of `features` together with `classes[i]` becomes the snapshot
    /// with stream index `i`.
    ///
    /// # Errors
    ///
    /// Fails when the row and class counts differ, or on the first record
    /// [`snapshot_from_dense`](Self::snapshot_from_dense) rejects.
    pub fn stream_from_dense(
        &self,
        features: ArrayView2<f64>,
        classes: ArrayView1<f64>,
    ) -> Result<Vec<InstanceSnapshot>, DatasetError> {
        if features.nrows() != classes.len() {
            return Err(DatasetError::ClassCountMismatch {
                rows: features.nrows(),
                classes: classes.len(),
            });
        }
        features
            .rows()
            .into_iter()
            .zip(classes.iter())
            .enumerate()
            .map(|(index, (row, &class_code))| {
                self.snapshot_from_dense(index, &row.to_vec(), class_code)
            })
            .collect()
    }
}

/// Interpret a stored code as an index into a domain of `len` labels.
fn code_to_index(code: f64, len: usize) -> Option<usize> {
    if code.is_finite() && code >= 0.0 && code.fract() == 0.0 && (code as usize) < len {
        Some(code as usize)
    } else {
        None
    }
}
