//! Search criteria for the datadef data layer.
//!
//! A [`SearchCriteria`] is built against one data definition, checked as it
//! is built, and handed to a [`QueryExecutor`] to run. Storage backends
//! implement the executor; backends without a query language can delegate
//! to [`SearchCriteria::evaluate`].

mod criteria;
mod error;
mod executor;
mod order;
mod restriction;
mod result;

pub use criteria::{DEFAULT_MAX_RESULTS, MAX_RESTRICTIONS, SearchCriteria};
pub use error::{QueryResult, SearchError};
pub use executor::QueryExecutor;
pub use order::{Order, OrderTarget};
pub use restriction::Restriction;
pub use result::SearchResult;
