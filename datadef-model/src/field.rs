use crate::validators::{FieldValidator, Required};
use crate::FieldType;
use std::fmt;
use std::sync::Arc;

/// A named, typed field of a data definition.
#[derive(Clone)]
pub struct FieldDefinition {
    name: String,
    field_type: FieldType,
    read_only: bool,
    read_only_on_update: bool,
    custom: bool,
    validators: Vec<Arc<dyn FieldValidator>>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            read_only: false,
            read_only_on_update: false,
            custom: false,
            validators: Vec::new(),
        }
    }

    /// The value is always carried forward from the persisted record.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// The value is carried forward from the persisted record on updates.
    #[must_use]
    pub fn read_only_on_update(mut self) -> Self {
        self.read_only_on_update = true;
        self
    }

    /// Marks the field as a custom (user-defined) field.
    #[must_use]
    pub fn custom(mut self) -> Self {
        self.custom = true;
        self
    }

    /// Appends a validator; validators run in the order they were added.
    #[must_use]
    pub fn with_validator(mut self, validator: impl FieldValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Shorthand for `with_validator(Required)`.
    #[must_use]
    pub fn required(self) -> Self {
        self.with_validator(Required)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub const fn is_read_only_on_update(&self) -> bool {
        self.read_only_on_update
    }

    #[must_use]
    pub const fn is_custom(&self) -> bool {
        self.custom
    }

    #[must_use]
    pub fn validators(&self) -> &[Arc<dyn FieldValidator>] {
        &self.validators
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("read_only", &self.read_only)
            .field("read_only_on_update", &self.read_only_on_update)
            .field("custom", &self.custom)
            .field("validators", &self.validators.len())
            .finish()
    }
}
