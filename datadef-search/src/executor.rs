use crate::{QueryResult, SearchCriteria, SearchResult};

/// Runs a search against some backing store.
pub trait QueryExecutor: Send + Sync {
    /// Returns the page selected by `criteria` and the total match count.
    fn execute(&self, criteria: &SearchCriteria) -> QueryResult<SearchResult>;
}
