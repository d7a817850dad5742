//! Registry of data definitions, keyed by plugin identifier and model name.

use crate::error::{ModelError, ModelResult};
use crate::DataDefinition;
use datadef_types::DefinitionKey;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Holds every registered [`DataDefinition`] for the lifetime of the process.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    definitions: RwLock<HashMap<DefinitionKey, Arc<DataDefinition>>>,
}

impl DefinitionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition, replacing any previous one with the same key.
    pub fn save(&self, definition: DataDefinition) -> ModelResult<Arc<DataDefinition>> {
        let definition = Arc::new(definition);
        let replaced = self
            .definitions
            .write()
            .map_err(|_| ModelError::LockPoisoned)?
            .insert(definition.key().clone(), Arc::clone(&definition))
            .is_some();
        info!(definition = %definition.key(), replaced, "Data definition registered");
        Ok(definition)
    }

    pub fn get(&self, plugin: &str, name: &str) -> ModelResult<Arc<DataDefinition>> {
        self.get_by_key(&DefinitionKey::new(plugin, name))
    }

    pub fn get_by_key(&self, key: &DefinitionKey) -> ModelResult<Arc<DataDefinition>> {
        self.definitions
            .read()
            .map_err(|_| ModelError::LockPoisoned)?
            .get(key)
            .cloned()
            .ok_or_else(|| ModelError::DefinitionNotFound(key.to_string()))
    }

    /// Removes a definition, returning it.
    pub fn delete(&self, plugin: &str, name: &str) -> ModelResult<Arc<DataDefinition>> {
        let key = DefinitionKey::new(plugin, name);
        let removed = self
            .definitions
            .write()
            .map_err(|_| ModelError::LockPoisoned)?
            .remove(&key)
            .ok_or_else(|| ModelError::DefinitionNotFound(key.to_string()))?;
        info!(definition = %key, "Data definition removed");
        Ok(removed)
    }

    /// All definitions, sorted by key.
    pub fn list(&self) -> ModelResult<Vec<Arc<DataDefinition>>> {
        let mut all: Vec<_> = self
            .definitions
            .read()
            .map_err(|_| ModelError::LockPoisoned)?
            .values()
            .cloned()
            .collect();
        all.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(all)
    }
}
