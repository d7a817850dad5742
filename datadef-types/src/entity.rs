use crate::{EntityId, FieldValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A validation failure: a message key plus its ordered format arguments.
///
/// The key is a localization key, never rendered by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl FieldError {
    pub fn new<I, S>(message: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// A generic record conforming to a data definition.
///
/// All data flows through this type. Fields are keyed by the field name from
/// the schema, and each value must match that field's declared type once the
/// entity has been validated. Validation failures are recorded here rather
/// than raised.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entity {
    id: Option<EntityId>,
    fields: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    errors: BTreeMap<String, FieldError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    global_errors: Vec<FieldError>,
}

impl Entity {
    /// Creates an empty, not yet persisted entity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty entity with the given identity.
    #[must_use]
    pub fn with_id(id: EntityId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Builds a submitted entity from a JSON object.
    ///
    /// A numeric `"id"` member becomes the identity; every other member
    /// becomes a field.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        value
            .as_object()
            .map(Self::from_json_map)
            .unwrap_or_default()
    }

    pub(crate) fn from_json_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut entity = Self::new();
        for (name, value) in map {
            if name == "id" {
                entity.id = match value {
                    serde_json::Value::Number(n) => n.as_u64().map(EntityId::new),
                    serde_json::Value::String(s) => EntityId::parse(s).ok(),
                    _ => None,
                };
                continue;
            }
            entity.set_field(name, FieldValue::from_json(value));
        }
        entity
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub const fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    /// Returns a field's value, or `None` when the field is absent.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns a field's value, treating an absent field as null.
    #[must_use]
    pub fn value(&self, name: &str) -> &FieldValue {
        const NULL: &FieldValue = &FieldValue::Null;
        self.fields.get(name).unwrap_or(NULL)
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn remove_field(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Extract a text value.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    /// Extract an integer value.
    #[must_use]
    pub fn get_integer(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(FieldValue::as_integer)
    }

    /// Extract a boolean value.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.fields.get(name).and_then(FieldValue::as_bool)
    }

    /// Records a failure for a field. The first failure recorded for a field
    /// is kept.
    pub fn add_error<I, S>(&mut self, field: &str, message: impl Into<String>, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| FieldError::new(message, args));
    }

    /// Records a failure that concerns the record as a whole.
    pub fn add_global_error<I, S>(&mut self, message: impl Into<String>, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_errors.push(FieldError::new(message, args));
    }

    #[must_use]
    pub fn error(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    #[must_use]
    pub const fn errors(&self) -> &BTreeMap<String, FieldError> {
        &self.errors
    }

    #[must_use]
    pub fn global_errors(&self) -> &[FieldError] {
        &self.global_errors
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
        self.global_errors.clear();
    }

    #[must_use]
    pub fn is_field_valid(&self, field: &str) -> bool {
        !self.errors.contains_key(field)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.global_errors.is_empty()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.fields == other.fields
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.fields.hash(state);
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "#{id}, {{")?,
            None => f.write_str("#new, {")?,
        }
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}
