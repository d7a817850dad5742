//! Field- and entity-level validators.
//!
//! A validator that rejects a value records the reason on the entity and
//! returns `false`. Closures with the matching signature are validators too.

use crate::messages::{MISSING, OUT_OF_RANGE, STRING_IS_TOO_LONG, STRING_IS_TOO_SHORT};
use crate::{DataDefinition, FieldDefinition};
use datadef_types::{Entity, FieldValue};
use std::cmp::Ordering;

/// Checks one field's coerced value.
pub trait FieldValidator: Send + Sync {
    fn validate(
        &self,
        definition: &DataDefinition,
        field: &FieldDefinition,
        value: &FieldValue,
        entity: &mut Entity,
    ) -> bool;
}

impl<F> FieldValidator for F
where
    F: Fn(&DataDefinition, &FieldDefinition, &FieldValue, &mut Entity) -> bool + Send + Sync,
{
    fn validate(
        &self,
        definition: &DataDefinition,
        field: &FieldDefinition,
        value: &FieldValue,
        entity: &mut Entity,
    ) -> bool {
        self(definition, field, value, entity)
    }
}

/// Checks a whole record, typically constraints spanning several fields.
pub trait EntityValidator: Send + Sync {
    fn validate(&self, definition: &DataDefinition, entity: &mut Entity) -> bool;
}

impl<F> EntityValidator for F
where
    F: Fn(&DataDefinition, &mut Entity) -> bool + Send + Sync,
{
    fn validate(&self, definition: &DataDefinition, entity: &mut Entity) -> bool {
        self(definition, entity)
    }
}

/// Rejects null values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl FieldValidator for Required {
    fn validate(
        &self,
        _definition: &DataDefinition,
        field: &FieldDefinition,
        value: &FieldValue,
        entity: &mut Entity,
    ) -> bool {
        if value.is_null() {
            entity.add_error(field.name(), MISSING, Vec::<String>::new());
            return false;
        }
        true
    }
}

/// Bounds the character length of text values. Other values pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Length {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Length {
    #[must_use]
    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    #[must_use]
    pub const fn at_most(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }
}

impl FieldValidator for Length {
    fn validate(
        &self,
        _definition: &DataDefinition,
        field: &FieldDefinition,
        value: &FieldValue,
        entity: &mut Entity,
    ) -> bool {
        let Some(text) = value.as_text() else {
            return true;
        };
        let length = text.chars().count();
        if let Some(min) = self.min.filter(|min| length < *min) {
            entity.add_error(field.name(), STRING_IS_TOO_SHORT, [min.to_string()]);
            return false;
        }
        if let Some(max) = self.max.filter(|max| length > *max) {
            entity.add_error(field.name(), STRING_IS_TOO_LONG, [max.to_string()]);
            return false;
        }
        true
    }
}

/// Bounds values, inclusively, using [`FieldValue::compare`].
///
/// Null passes; a value not comparable to a bound is out of range.
#[derive(Debug, Clone, Default)]
pub struct Range {
    pub min: Option<FieldValue>,
    pub max: Option<FieldValue>,
}

impl Range {
    pub fn between(min: impl Into<FieldValue>, max: impl Into<FieldValue>) -> Self {
        Self {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    pub fn at_least(min: impl Into<FieldValue>) -> Self {
        Self {
            min: Some(min.into()),
            max: None,
        }
    }

    pub fn at_most(max: impl Into<FieldValue>) -> Self {
        Self {
            min: None,
            max: Some(max.into()),
        }
    }

    fn render(bound: Option<&FieldValue>) -> String {
        bound.map(ToString::to_string).unwrap_or_default()
    }
}

impl FieldValidator for Range {
    fn validate(
        &self,
        _definition: &DataDefinition,
        field: &FieldDefinition,
        value: &FieldValue,
        entity: &mut Entity,
    ) -> bool {
        if value.is_null() {
            return true;
        }
        let below = self
            .min
            .as_ref()
            .is_some_and(|min| !matches!(value.compare(min), Some(Ordering::Greater | Ordering::Equal)));
        let above = self
            .max
            .as_ref()
            .is_some_and(|max| !matches!(value.compare(max), Some(Ordering::Less | Ordering::Equal)));
        if below || above {
            entity.add_error(
                field.name(),
                OUT_OF_RANGE,
                [Self::render(self.min.as_ref()), Self::render(self.max.as_ref())],
            );
            return false;
        }
        true
    }
}
