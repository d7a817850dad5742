//! The validation pipeline.
//!
//! One pass over one entity, in fixed stages:
//!
//! 1. carry read-only and omitted fields forward from the stored version
//! 2. trim text and turn blank text into null
//! 3. coerce every field through its type, in schema order
//! 4. run each still-valid field's validators until the first rejection
//! 5. run the definition's entity validators if the entity is still valid
//! 6. dispatch the create or update hook
//!
//! Data problems end up as errors on the entity. Only schema
//! misconfiguration is returned as `Err`.

use crate::EngineResult;
use datadef_model::{
    CoercionContext, DataDefinition, DictionaryService, ModelError, ReferenceResolver,
};
use datadef_types::{Entity, FieldValue};
use tracing::debug;

/// Validates entities against their data definition.
///
/// The storage and dictionary collaborators are passed in, so the service
/// holds no state of its own and works without a live store.
#[derive(Clone, Copy)]
pub struct ValidationService<'a> {
    ctx: CoercionContext<'a>,
}

impl<'a> ValidationService<'a> {
    #[must_use]
    pub fn new(
        references: &'a dyn ReferenceResolver,
        dictionaries: &'a dyn DictionaryService,
    ) -> Self {
        Self {
            ctx: CoercionContext::new(references, dictionaries),
        }
    }

    /// Runs the full pipeline on `entity`.
    ///
    /// `existing` is the stored version of the entity, if it has one.
    /// Errors from an earlier pass are discarded first, so validating the
    /// same input twice yields the same outcome.
    pub fn validate(
        &self,
        definition: &DataDefinition,
        entity: &mut Entity,
        existing: Option<&Entity>,
    ) -> EngineResult<()> {
        if let Some(field) = definition.fields().values().find(|f| f.is_custom()) {
            return Err(ModelError::CustomFieldUnsupported {
                definition: definition.key().to_string(),
                field: field.name().to_string(),
            }
            .into());
        }

        entity.clear_errors();
        copy_read_only_and_missing_fields(definition, entity, existing);
        self.parse_fields(definition, entity);
        run_field_validators(definition, entity);
        if entity.is_valid() {
            for validator in definition.validators() {
                validator.validate(definition, entity);
            }
        }

        debug!(
            definition = %definition.key(),
            id = ?entity.id(),
            valid = entity.is_valid(),
            errors = entity.errors().len(),
            "Validated entity"
        );

        if entity.id().is_some() {
            definition.call_update_hook(entity);
        } else {
            definition.call_create_hook(entity);
        }
        Ok(())
    }

    fn parse_fields(&self, definition: &DataDefinition, entity: &mut Entity) {
        for (name, field) in definition.fields() {
            let raw = entity
                .remove_field(name)
                .map(FieldValue::normalized)
                .unwrap_or_default();
            let value = field.field_type().to_object(field, raw, entity, &self.ctx);
            entity.set_field(name.as_str(), value);
        }
    }
}

fn copy_read_only_and_missing_fields(
    definition: &DataDefinition,
    entity: &mut Entity,
    existing: Option<&Entity>,
) {
    let persisted = entity.id().is_some();
    for (name, field) in definition.fields() {
        let carry = field.is_read_only()
            || (field.is_read_only_on_update() && persisted)
            || (!entity.has_field(name) && persisted);
        if carry {
            let value = existing.map(|e| e.value(name).clone()).unwrap_or_default();
            entity.set_field(name.as_str(), value);
        }
    }
}

fn run_field_validators(definition: &DataDefinition, entity: &mut Entity) {
    for (name, field) in definition.fields() {
        if !entity.is_field_valid(name) {
            continue;
        }
        let value = entity.value(name).clone();
        for validator in field.validators() {
            if !validator.validate(definition, field, &value, entity) || !entity.is_field_valid(name)
            {
                break;
            }
        }
    }
}
