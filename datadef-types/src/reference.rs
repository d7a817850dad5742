//! Lazy handles to referenced records.
//!
//! Resolving a reference field must not materialize the referenced record:
//! the target may not be visible yet in the caller's unit of work, and
//! loading whole graphs during validation is wasteful. An [`EntityRef`]
//! carries the identity and defers the read until a field is accessed.

use crate::{DefinitionKey, Entity, EntityId, Error, FieldValue, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Loads a single record by identity. Implemented by the storage collaborator.
pub trait EntityLoader: Send + Sync {
    /// Returns the record, or `None` if no such record exists.
    fn load(&self, definition: &DefinitionKey, id: EntityId) -> Result<Option<Entity>>;
}

/// A handle to a record of another data definition.
///
/// Clones share the materialized record, so the loader runs at most once
/// per handle family. Equality and hashing only consider the target's
/// definition and identity.
#[derive(Clone)]
pub struct EntityRef {
    definition: DefinitionKey,
    id: EntityId,
    target: Arc<OnceLock<Entity>>,
    loader: Option<Arc<dyn EntityLoader>>,
}

impl EntityRef {
    /// A handle that loads the target on first access.
    #[must_use]
    pub fn lazy(definition: DefinitionKey, id: EntityId, loader: Arc<dyn EntityLoader>) -> Self {
        Self {
            definition,
            id,
            target: Arc::new(OnceLock::new()),
            loader: Some(loader),
        }
    }

    /// A handle around an already materialized record.
    ///
    /// Returns `None` if the record has no identity yet.
    #[must_use]
    pub fn resolved(definition: DefinitionKey, entity: Entity) -> Option<Self> {
        let id = entity.id()?;
        let target = OnceLock::new();
        let _ = target.set(entity);
        Some(Self {
            definition,
            id,
            target: Arc::new(target),
            loader: None,
        })
    }

    /// A handle with no way to load its target.
    #[must_use]
    pub fn detached(definition: DefinitionKey, id: EntityId) -> Self {
        Self {
            definition,
            id,
            target: Arc::new(OnceLock::new()),
            loader: None,
        }
    }

    #[must_use]
    pub const fn definition(&self) -> &DefinitionKey {
        &self.definition
    }

    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns true once the target has been read.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.target.get().is_some()
    }

    /// Materializes and returns the referenced record.
    pub fn get(&self) -> Result<&Entity> {
        if let Some(entity) = self.target.get() {
            return Ok(entity);
        }
        let loader = self.loader.as_ref().ok_or_else(|| Error::DetachedReference {
            definition: self.definition.to_string(),
            id: self.id,
        })?;
        let entity = loader
            .load(&self.definition, self.id)?
            .ok_or_else(|| Error::ReferenceNotFound {
                definition: self.definition.to_string(),
                id: self.id,
            })?;
        // A concurrent access may have won the race; either value is the same record.
        Ok(self.target.get_or_init(|| entity))
    }

    /// Reads one field of the referenced record, materializing it.
    pub fn field(&self, name: &str) -> Result<&FieldValue> {
        Ok(self.get()?.value(name))
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.definition == other.definition
    }
}

impl Eq for EntityRef {}

impl Hash for EntityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.definition.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRef")
            .field("definition", &self.definition)
            .field("id", &self.id)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.definition, self.id)
    }
}

#[derive(Serialize, Deserialize)]
struct RefRepr {
    definition: DefinitionKey,
    id: EntityId,
}

impl Serialize for EntityRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RefRepr {
            definition: self.definition.clone(),
            id: self.id,
        }
        .serialize(serializer)
    }
}

/// Deserialized handles are detached: only the identity survives the trip.
impl<'de> Deserialize<'de> for EntityRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = RefRepr::deserialize(deserializer)?;
        Ok(Self::detached(repr.definition, repr.id))
    }
}
