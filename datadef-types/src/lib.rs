//! Core type definitions for the datadef data layer.
//!
//! This crate defines the schema-agnostic types every other crate builds on:
//! - [`Entity`]: a generic record with identity, field values and field errors
//! - [`FieldValue`]: the dynamically typed value stored in an entity field
//! - [`EntityRef`]: a lazy handle to a record of another definition
//! - [`EntityId`] and [`DefinitionKey`] identifiers
//!
//! What a field's value means is decided by the owning data definition, not
//! here.

mod entity;
mod ids;
mod reference;
mod value;

pub use entity::{Entity, FieldError};
pub use ids::{DefinitionKey, EntityId};
pub use reference::{EntityLoader, EntityRef};
pub use value::{DATE_FORMAT, DATE_TIME_FORMAT, FieldValue, ValueKind};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("referenced record not found: {definition}#{id}")]
    ReferenceNotFound { definition: String, id: EntityId },

    #[error("reference {definition}#{id} has no loader attached")]
    DetachedReference { definition: String, id: EntityId },

    #[error("storage error: {0}")]
    Storage(String),
}
