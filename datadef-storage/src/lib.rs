//! Storage layer for datadef.
//!
//! The core never talks to a database directly. Everything it needs from
//! persistence is the [`DataStore`] contract: lazy reference resolution,
//! query execution, and single-record get/save/delete.
//!
//! [`MemoryStore`] is an in-process implementation used by tests and by
//! embedders that keep their records in memory.

mod error;
mod memory;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;

use datadef_model::{DataDefinition, ReferenceResolver};
use datadef_search::QueryExecutor;
use datadef_types::{Entity, EntityId};

/// The storage collaborator.
///
/// Implementations provide their own unit-of-work boundary; nothing here
/// begins or ends a transaction.
pub trait DataStore: ReferenceResolver + QueryExecutor {
    /// Reads one record, or `None` if it does not exist.
    fn get(&self, definition: &DataDefinition, id: EntityId) -> StorageResult<Option<Entity>>;

    /// Persists a validated entity.
    ///
    /// A new entity is assigned its identity in place. An empty priority
    /// field is filled with the next position in its scope.
    fn save(&self, definition: &DataDefinition, entity: &mut Entity) -> StorageResult<()>;

    /// Removes one record.
    fn delete(&self, definition: &DataDefinition, id: EntityId) -> StorageResult<()>;
}
