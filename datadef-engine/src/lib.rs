//! Validation and data access for the datadef data layer.
//!
//! [`ValidationService`] runs the validation pipeline on one entity against
//! its data definition. [`DataAccessService`] wraps it with a
//! [`DataStore`](datadef_storage::DataStore): load the stored version,
//! validate, persist if valid. [`EngineConfig`] carries the settings read
//! from `engine.toml`.

mod config;
mod error;
mod service;
mod validation;

pub use config::{EngineConfig, SearchConfig};
pub use error::{EngineError, EngineResult};
pub use service::DataAccessService;
pub use validation::ValidationService;
