use datadef_types::{Entity, FieldValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// What a search sorts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderTarget {
    Id,
    Field(String),
}

/// Sort direction and key of a search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    target: OrderTarget,
    ascending: bool,
}

impl Order {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            target: OrderTarget::Field(field.into()),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            target: OrderTarget::Field(field.into()),
            ascending: false,
        }
    }

    #[must_use]
    pub const fn asc_by_id() -> Self {
        Self {
            target: OrderTarget::Id,
            ascending: true,
        }
    }

    #[must_use]
    pub const fn desc_by_id() -> Self {
        Self {
            target: OrderTarget::Id,
            ascending: false,
        }
    }

    #[must_use]
    pub const fn target(&self) -> &OrderTarget {
        &self.target
    }

    /// The sorted field, or `None` when sorting by identity.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match &self.target {
            OrderTarget::Id => None,
            OrderTarget::Field(name) => Some(name),
        }
    }

    #[must_use]
    pub const fn is_ascending(&self) -> bool {
        self.ascending
    }

    /// Compares two records under this order.
    ///
    /// Nulls sort before every other value. Ties, and values that cannot be
    /// compared, fall back to ascending identity so results are stable.
    #[must_use]
    pub fn compare(&self, a: &Entity, b: &Entity) -> Ordering {
        let primary = match &self.target {
            OrderTarget::Id => a.id().cmp(&b.id()),
            OrderTarget::Field(name) => compare_values(a.value(name), b.value(name)),
        };
        let primary = if self.ascending {
            primary
        } else {
            primary.reverse()
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    }
}

fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}
