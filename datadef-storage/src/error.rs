//! Error types for the storage layer.

use datadef_types::EntityId;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No record with this identity exists.
    #[error("record not found: {definition}#{id}")]
    NotFound { definition: String, id: EntityId },

    /// The entity carries validation errors and must not be persisted.
    #[error("refusing to persist invalid record of '{definition}'")]
    InvalidEntity { definition: String },

    /// The next priority position in a scope does not fit in an integer.
    #[error("no priority position left for '{field}' of '{definition}'")]
    PriorityOverflow { definition: String, field: String },

    /// Shared state is unusable after a panic in another thread.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for datadef_types::Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<StorageError> for datadef_search::SearchError {
    fn from(err: StorageError) -> Self {
        Self::Execution(err.to_string())
    }
}
