use crate::{EngineConfig, EngineResult, ValidationService};
use datadef_model::{DataDefinition, DictionaryService};
use datadef_search::{SearchCriteria, SearchResult};
use datadef_storage::DataStore;
use datadef_types::{Entity, EntityId};
use std::sync::Arc;
use tracing::{debug, info};

/// Entry point for reading and writing records of any data definition.
///
/// Every write goes through the validation pipeline; only valid entities
/// reach the store.
pub struct DataAccessService<S> {
    store: S,
    dictionaries: Arc<dyn DictionaryService>,
    config: EngineConfig,
}

impl<S: DataStore> DataAccessService<S> {
    /// Creates a service whose dictionaries come from `config`.
    pub fn new(store: S, config: EngineConfig) -> Self {
        let dictionaries = Arc::new(config.dictionaries());
        Self {
            store,
            dictionaries,
            config,
        }
    }

    /// Replaces the dictionary collaborator.
    #[must_use]
    pub fn with_dictionaries(mut self, dictionaries: Arc<dyn DictionaryService>) -> Self {
        self.dictionaries = dictionaries;
        self
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A validation service bound to this service's collaborators.
    pub fn validator(&self) -> ValidationService<'_> {
        ValidationService::new(&self.store, self.dictionaries.as_ref())
    }

    /// Validates `entity` and persists it if it is valid.
    ///
    /// The returned entity carries its identity when it was persisted and
    /// its field errors when it was not.
    pub fn save(&self, definition: &DataDefinition, mut entity: Entity) -> EngineResult<Entity> {
        let existing = match entity.id() {
            Some(id) => self.store.get(definition, id)?,
            None => None,
        };

        self.validator()
            .validate(definition, &mut entity, existing.as_ref())?;

        if !entity.is_valid() {
            info!(
                definition = %definition.key(),
                id = ?entity.id(),
                errors = entity.errors().len(),
                "Entity is invalid, not saving"
            );
            return Ok(entity);
        }

        self.store.save(definition, &mut entity)?;
        Ok(entity)
    }

    pub fn get(&self, definition: &DataDefinition, id: EntityId) -> EngineResult<Option<Entity>> {
        Ok(self.store.get(definition, id)?)
    }

    pub fn delete(&self, definition: &DataDefinition, id: EntityId) -> EngineResult<()> {
        debug!(definition = %definition.key(), id = %id, "Deleting entity");
        Ok(self.store.delete(definition, id)?)
    }

    /// Starts a search over `definition` with the configured page size.
    pub fn find(&self, definition: Arc<DataDefinition>) -> SearchCriteria {
        let mut criteria = SearchCriteria::new(definition);
        criteria.with_max_results(self.config.search.default_max_results);
        criteria
    }

    pub fn list(&self, criteria: SearchCriteria) -> EngineResult<SearchResult> {
        Ok(criteria.list(&self.store)?)
    }

    pub fn unique(&self, criteria: SearchCriteria) -> EngineResult<Option<Entity>> {
        Ok(criteria.unique(&self.store)?)
    }
}
