//! Error types for the engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while validating, persisting or querying records.
///
/// Invalid data is not an error; it is reported on the returned entity.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] datadef_model::ModelError),

    #[error(transparent)]
    Search(#[from] datadef_search::SearchError),

    #[error(transparent)]
    Storage(#[from] datadef_storage::StorageError),

    /// Malformed configuration.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}
