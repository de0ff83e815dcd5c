//! Dataset construction and ingestion errors.

/// Errors raised while building metadata or ingesting records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    /// Two attributes share a name.
    #[error("duplicate attribute name '{0}'")]
    DuplicateAttributeName(String),

    /// Two class labels are identical.
    #[error("duplicate class label '{0}'")]
    DuplicateClassLabel(String),

    /// The class attribute has no labels.
    #[error("class attribute must have at least one label")]
    EmptyClassDomain,

    /// A record does not have one value per attribute.
    #[error("record has {got} attribute values, expected {expected}")]
    AttributeCountMismatch { expected: usize, got: usize },

    /// A feature matrix and its class column have different lengths.
    #[error("{rows} feature rows but {classes} class codes")]
    ClassCountMismatch { rows: usize, classes: usize },

    /// A class code does not name a known class.
    #[error("class code {code} out of range for {n_classes} classes")]
    ClassOutOfRange { code: f64, n_classes: usize },

    /// A nominal code does not name a value in the attribute's domain.
    #[error("code {code} out of range for nominal attribute '{attribute}' with {domain_size} values")]
    NominalCodeOutOfRange {
        attribute: String,
        code: f64,
        domain_size: usize,
    },
}
