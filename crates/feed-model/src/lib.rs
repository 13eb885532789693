//! Data model for catalog exports.
//!
//! Records arrive from the reconstructor as arena-backed [`Record`]s and are
//! typed into [`AttributeDefinition`], [`AttributeValue`] and
//! [`ProductRecord`] before any listener sees them.

pub mod attribute;
pub mod error;
mod fields;
pub mod keys;
pub mod product;
pub mod section;
pub mod value;

pub use attribute::{AttributeDefinition, AttributeRole, AttributeValue, DataType};
pub use error::{FeedError, FieldError, Result};
pub use product::{AssetDescriptor, ProductRecord};
pub use section::SectionKind;
pub use value::{ContainerKind, Node, NodeId, Record, Scalar, ValueRef};
