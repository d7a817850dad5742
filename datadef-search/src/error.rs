//! Error types for building and running searches.

use thiserror::Error;

/// Result type for search operations.
pub type QueryResult<T> = Result<T, SearchError>;

/// Errors that can occur while building or executing a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The restriction set is full.
    #[error("too many restrictions, max is {max}")]
    TooManyRestrictions { max: usize },

    /// A restriction or order names a field the definition does not declare.
    #[error("unknown field '{field}' in '{definition}'")]
    UnknownField { definition: String, field: String },

    /// Restriction on a field whose type is not searchable.
    #[error("field '{field}' of '{definition}' is not searchable")]
    NotSearchable { definition: String, field: String },

    /// A restriction value has no meaning for the field's representation.
    #[error("{found} value cannot restrict '{field}' of '{definition}' ({expected})")]
    WrongValueKind {
        definition: String,
        field: String,
        expected: String,
        found: String,
    },

    /// Ordering on a field whose type is not orderable.
    #[error("field '{field}' of '{definition}' is not orderable")]
    NotOrderable { definition: String, field: String },

    /// More than one record matched where exactly one was expected.
    #[error("{count} records of '{definition}' match where one was expected")]
    AmbiguousResult { definition: String, count: usize },

    /// The executor failed.
    #[error("query execution failed: {0}")]
    Execution(String),
}
