//! Stream data model.
//!
//! - [`AttributeValue`]: a tagged numeric/nominal value
//! - [`InstanceSnapshot`]: one record with its stream index and class
//! - [`DatasetMetadata`]: attribute and class name↔index maps

mod error;
mod instance;
mod schema;
mod value;

pub use error::DatasetError;
pub use instance::InstanceSnapshot;
pub use schema::{AttributeMeta, DatasetMetadata};
pub use value::{AttributeKind, AttributeValue};
