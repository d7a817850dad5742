use datadef_types::Entity;
use serde::{Deserialize, Serialize};

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matches before pagination.
    pub total_number_of_entities: usize,
    /// The requested page.
    pub entities: Vec<Entity>,
}

impl SearchResult {
    #[must_use]
    pub const fn new(total_number_of_entities: usize, entities: Vec<Entity>) -> Self {
        Self {
            total_number_of_entities,
            entities,
        }
    }

    #[must_use]
    pub const fn total_number_of_entities(&self) -> usize {
        self.total_number_of_entities
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
