//! Collaborators consulted while coercing values.
//!
//! Field types never reach for ambient services: the storage and dictionary
//! collaborators are passed in explicitly through a [`CoercionContext`].

use datadef_types::{DefinitionKey, EntityId, EntityRef};
use std::collections::BTreeMap;

/// Resolves an identity to a handle on the referenced record.
pub trait ReferenceResolver: Send + Sync {
    /// Returns a handle for `definition#id`. Implementations should defer the
    /// actual read until the handle is accessed.
    fn load_by_id(&self, definition: &DefinitionKey, id: EntityId) -> EntityRef;
}

/// Supplies the current values of named dictionaries.
pub trait DictionaryService: Send + Sync {
    /// The dictionary's values in display order. Unknown dictionaries are empty.
    fn values(&self, dictionary: &str) -> Vec<String>;
}

/// Handles produced without any store behind them.
///
/// Useful when validating outside of a unit of work; accessing the target
/// of such a handle fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedReferences;

impl ReferenceResolver for DetachedReferences {
    fn load_by_id(&self, definition: &DefinitionKey, id: EntityId) -> EntityRef {
        EntityRef::detached(definition.clone(), id)
    }
}

/// Dictionaries held in memory, typically seeded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticDictionaries {
    dictionaries: BTreeMap<String, Vec<String>>,
}

impl StaticDictionaries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with<I, S>(mut self, dictionary: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(dictionary, values);
        self
    }

    /// Replaces the values of a dictionary.
    pub fn insert<I, S>(&mut self, dictionary: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dictionaries.insert(
            dictionary.into(),
            values.into_iter().map(Into::into).collect(),
        );
    }

    /// Names of the known dictionaries.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dictionaries.keys().map(String::as_str)
    }
}

impl DictionaryService for StaticDictionaries {
    fn values(&self, dictionary: &str) -> Vec<String> {
        self.dictionaries.get(dictionary).cloned().unwrap_or_default()
    }
}

impl From<BTreeMap<String, Vec<String>>> for StaticDictionaries {
    fn from(dictionaries: BTreeMap<String, Vec<String>>) -> Self {
        Self { dictionaries }
    }
}

/// Collaborator handles for one validation pass.
#[derive(Clone, Copy)]
pub struct CoercionContext<'a> {
    pub references: &'a dyn ReferenceResolver,
    pub dictionaries: &'a dyn DictionaryService,
}

impl<'a> CoercionContext<'a> {
    #[must_use]
    pub fn new(
        references: &'a dyn ReferenceResolver,
        dictionaries: &'a dyn DictionaryService,
    ) -> Self {
        Self {
            references,
            dictionaries,
        }
    }
}
