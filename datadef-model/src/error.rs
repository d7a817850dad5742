//! Error types for schema configuration.
//!
//! These are programmer or schema mistakes. Data problems are never reported
//! here; they end up as field errors on the entity.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("field '{field}' declared twice in '{definition}'")]
    DuplicateField { definition: String, field: String },

    #[error("'{definition}' declares more than one priority field")]
    MultiplePriorityFields { definition: String },

    #[error("priority field '{field}' of '{definition}' is scoped by unknown field '{scope}'")]
    UnknownScopeField {
        definition: String,
        field: String,
        scope: String,
    },

    #[error("custom fields are not supported: '{field}' of '{definition}'")]
    CustomFieldUnsupported { definition: String, field: String },

    #[error("data definition not found: {0}")]
    DefinitionNotFound(String),

    #[error("definition registry lock poisoned")]
    LockPoisoned,
}
