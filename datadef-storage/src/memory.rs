use crate::{DataStore, StorageError, StorageResult};
use datadef_model::{DataDefinition, ReferenceResolver};
use datadef_search::{QueryExecutor, QueryResult, SearchCriteria, SearchResult};
use datadef_types::{DefinitionKey, Entity, EntityId, EntityLoader, EntityRef, FieldValue};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Stored records hold references as bare identities; handles are attached
/// on the way out.
#[derive(Debug, Default)]
struct Tables {
    last_id: u64,
    records: HashMap<DefinitionKey, BTreeMap<EntityId, Entity>>,
}

impl Tables {
    fn table(&self, definition: &DefinitionKey) -> Option<&BTreeMap<EntityId, Entity>> {
        self.records.get(definition)
    }

    fn record(&self, definition: &DefinitionKey, id: EntityId) -> Option<&Entity> {
        self.table(definition).and_then(|table| table.get(&id))
    }
}

/// Records held in process memory.
///
/// Clones share the same tables, so reference handles produced by one clone
/// see writes made through another. Identities come from one sequence
/// shared by all definitions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored for a definition.
    pub fn count(&self, definition: &DefinitionKey) -> StorageResult<usize> {
        Ok(self.read()?.table(definition).map_or(0, BTreeMap::len))
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StorageError::Storage(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StorageError::Storage(format!("lock poisoned: {e}")))
    }

    /// A copy of a stored record whose references load from the current
    /// state of this store.
    fn attached(&self, record: &Entity) -> Entity {
        rebind(record, &|r: &EntityRef| self.load_by_id(r.definition(), r.id()))
    }
}

impl EntityLoader for MemoryStore {
    fn load(&self, definition: &DefinitionKey, id: EntityId) -> datadef_types::Result<Option<Entity>> {
        debug!(definition = %definition, id = %id, "materializing reference");
        let tables = self.read()?;
        Ok(tables.record(definition, id).map(|e| self.attached(e)))
    }
}

impl ReferenceResolver for MemoryStore {
    fn load_by_id(&self, definition: &DefinitionKey, id: EntityId) -> EntityRef {
        EntityRef::lazy(definition.clone(), id, Arc::new(self.clone()))
    }
}

impl QueryExecutor for MemoryStore {
    fn execute(&self, criteria: &SearchCriteria) -> QueryResult<SearchResult> {
        let tables = self.read()?;
        let records = tables
            .table(criteria.definition().key())
            .into_iter()
            .flat_map(BTreeMap::values)
            .map(|e| self.attached(e));
        Ok(criteria.evaluate(records))
    }
}

impl DataStore for MemoryStore {
    fn get(&self, definition: &DataDefinition, id: EntityId) -> StorageResult<Option<Entity>> {
        let tables = self.read()?;
        Ok(tables
            .record(definition.key(), id)
            .map(|e| self.attached(e)))
    }

    fn save(&self, definition: &DataDefinition, entity: &mut Entity) -> StorageResult<()> {
        if !entity.is_valid() {
            return Err(StorageError::InvalidEntity {
                definition: definition.key().to_string(),
            });
        }

        let mut tables = self.write()?;
        if let Some(id) = entity.id()
            && tables.record(definition.key(), id).is_none()
        {
            return Err(StorageError::NotFound {
                definition: definition.key().to_string(),
                id,
            });
        }

        if let Some(priority) = definition.priority_field()
            && entity.value(priority.name()).is_null()
        {
            let scope = priority.field_type().scope_field().unwrap_or_default();
            let next = tables
                .table(definition.key())
                .map_or(Some(1), |table| {
                    next_priority(table, priority.name(), scope, entity.value(scope))
                })
                .ok_or_else(|| StorageError::PriorityOverflow {
                    definition: definition.key().to_string(),
                    field: priority.name().to_string(),
                })?;
            entity.set_field(priority.name(), next);
        }

        let id = match entity.id() {
            Some(id) => id,
            None => {
                tables.last_id += 1;
                EntityId::new(tables.last_id)
            }
        };
        entity.set_id(Some(id));

        let stored = rebind(entity, &|r: &EntityRef| {
            EntityRef::detached(r.definition().clone(), r.id())
        });
        tables
            .records
            .entry(definition.key().clone())
            .or_default()
            .insert(id, stored);
        info!(definition = %definition.key(), id = %id, "record saved");
        Ok(())
    }

    fn delete(&self, definition: &DataDefinition, id: EntityId) -> StorageResult<()> {
        let mut tables = self.write()?;
        tables
            .records
            .get_mut(definition.key())
            .and_then(|table| table.remove(&id))
            .ok_or_else(|| StorageError::NotFound {
                definition: definition.key().to_string(),
                id,
            })?;
        info!(definition = %definition.key(), id = %id, "record deleted");
        Ok(())
    }
}

/// Copies `entity`, replacing every reference handle, nested ones included.
fn rebind(entity: &Entity, bind: &dyn Fn(&EntityRef) -> EntityRef) -> Entity {
    let mut copy = entity.clone();
    for (name, value) in entity.fields() {
        let rebound = match value {
            FieldValue::Reference(r) => FieldValue::Reference(bind(r)),
            FieldValue::Entity(nested) => FieldValue::Entity(Box::new(rebind(nested, bind))),
            _ => continue,
        };
        copy.set_field(name.as_str(), rebound);
    }
    copy
}

/// One past the highest position among records sharing the scope value, or
/// `None` when that position does not fit.
fn next_priority(
    table: &BTreeMap<EntityId, Entity>,
    field: &str,
    scope: &str,
    scope_value: &FieldValue,
) -> Option<i64> {
    table
        .values()
        .filter(|record| same_scope(record.value(scope), scope_value))
        .filter_map(|record| record.get_integer(field))
        .max()
        .map_or(Some(1), |max| max.checked_add(1))
}

fn same_scope(a: &FieldValue, b: &FieldValue) -> bool {
    match (a.is_null(), b.is_null()) {
        (true, true) => true,
        (false, false) => a.compare(b) == Some(Ordering::Equal),
        _ => false,
    }
}
