use datadef_engine::{EngineError, ValidationService};
use datadef_model::messages::{INVALID_DICTIONARY_ITEM, MISSING, STRING_IS_TOO_LONG, WRONG_TYPE};
use datadef_model::{
    DataDefinition, DetachedReferences, FieldDefinition, FieldType, ModelError, ReferenceResolver,
    StaticDictionaries,
};
use datadef_types::{DefinitionKey, Entity, EntityId, EntityRef, FieldError, FieldValue};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn validate(definition: &DataDefinition, entity: &mut Entity, existing: Option<&Entity>) {
    let dictionaries = StaticDictionaries::new().with("units", ["pcs", "kg"]);
    ValidationService::new(&DetachedReferences, &dictionaries)
        .validate(definition, entity, existing)
        .unwrap();
}

fn people() -> DataDefinition {
    DataDefinition::builder("crm", "person")
        .field(FieldDefinition::new("name", FieldType::string()))
        .field(FieldDefinition::new("age", FieldType::integer()))
        .build()
        .unwrap()
}

// ── End-to-end ──────────────────────────────────────────────────

#[test]
fn too_long_name_invalidates_only_that_field() {
    let def = people();
    let mut entity = Entity::new().field("name", "a".repeat(256)).field("age", 30);

    validate(&def, &mut entity, None);

    assert!(!entity.is_valid());
    assert_eq!(entity.errors().len(), 1);
    assert_eq!(
        entity.error("name"),
        Some(&FieldError::new(STRING_IS_TOO_LONG, ["255"]))
    );
    assert_eq!(entity.value("name"), &FieldValue::Null);
    assert_eq!(entity.value("age"), &FieldValue::Integer(30));
}

#[test]
fn valid_submission_is_coerced() {
    let def = people();
    let mut entity = Entity::new().field("name", "  Ada  ").field("age", "36");

    validate(&def, &mut entity, None);

    assert!(entity.is_valid());
    assert_eq!(entity.get_str("name"), Some("Ada"));
    assert_eq!(entity.get_integer("age"), Some(36));
}

#[test]
fn json_submission_is_validated() {
    let def = people();
    let payload = serde_json::json!({ "name": "Grace", "age": "not a number" });
    let mut entity = Entity::from_json(&payload);

    validate(&def, &mut entity, None);

    assert_eq!(entity.get_str("name"), Some("Grace"));
    assert!(!entity.is_field_valid("age"));
    assert!(entity.is_field_valid("name"));
}

// ── References ──────────────────────────────────────────────────

struct RecordingResolver {
    calls: Mutex<Vec<(DefinitionKey, EntityId)>>,
}

impl ReferenceResolver for RecordingResolver {
    fn load_by_id(&self, definition: &DefinitionKey, id: EntityId) -> EntityRef {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((definition.clone(), id));
        }
        EntityRef::detached(definition.clone(), id)
    }
}

fn orders() -> DataDefinition {
    DataDefinition::builder("sales", "order")
        .field(FieldDefinition::new(
            "customer",
            FieldType::belongs_to("crm", "person", "name"),
        ))
        .build()
        .unwrap()
}

#[test]
fn textual_reference_resolves_with_one_load() {
    let resolver = RecordingResolver {
        calls: Mutex::new(Vec::new()),
    };
    let dictionaries = StaticDictionaries::new();
    let def = orders();
    let mut entity = Entity::new().field("customer", "42");

    ValidationService::new(&resolver, &dictionaries)
        .validate(&def, &mut entity, None)
        .unwrap();

    assert!(entity.is_valid());
    let reference = entity.value("customer").as_reference().unwrap();
    assert_eq!(reference.id(), EntityId::new(42));
    assert!(!reference.is_loaded());
    assert_eq!(
        *resolver.calls.lock().unwrap(),
        vec![(DefinitionKey::new("crm", "person"), EntityId::new(42))]
    );
}

#[test]
fn reference_of_wrong_kind_is_rejected() {
    let def = orders();
    let mut entity = Entity::new().field("customer", true);

    validate(&def, &mut entity, None);

    assert_eq!(
        entity.error("customer"),
        Some(&FieldError::new(WRONG_TYPE, ["Boolean", "Entity"]))
    );
}

// ── Carry-forward ───────────────────────────────────────────────

fn products() -> DataDefinition {
    DataDefinition::builder("products", "product")
        .field(FieldDefinition::new("code", FieldType::string()).read_only())
        .field(FieldDefinition::new("name", FieldType::string()).required())
        .field(FieldDefinition::new("unit", FieldType::dictionary("units")).read_only_on_update())
        .field(FieldDefinition::new("note", FieldType::text()))
        .build()
        .unwrap()
}

fn stored_product() -> Entity {
    Entity::with_id(EntityId::new(1))
        .field("code", "P-001")
        .field("name", "Bolt")
        .field("unit", "pcs")
        .field("note", "zinc plated")
}

#[test]
fn read_only_field_keeps_stored_value() {
    let def = products();
    let existing = stored_product();
    let mut entity = Entity::with_id(EntityId::new(1))
        .field("code", "HACKED")
        .field("name", "Bolt");

    validate(&def, &mut entity, Some(&existing));

    assert!(entity.is_valid());
    assert_eq!(entity.get_str("code"), Some("P-001"));
}

#[test]
fn read_only_field_of_new_entity_is_null() {
    let def = products();
    let mut entity = Entity::new().field("code", "P-002").field("name", "Nut");

    validate(&def, &mut entity, None);

    assert_eq!(entity.value("code"), &FieldValue::Null);
}

#[test]
fn read_only_on_update_applies_to_updates_only() {
    let def = products();

    let mut created = Entity::new().field("name", "Nut").field("unit", "kg");
    validate(&def, &mut created, None);
    assert_eq!(created.get_str("unit"), Some("kg"));

    let existing = stored_product();
    let mut updated = Entity::with_id(EntityId::new(1))
        .field("name", "Bolt")
        .field("unit", "kg");
    validate(&def, &mut updated, Some(&existing));
    assert_eq!(updated.get_str("unit"), Some("pcs"));
}

#[test]
fn omitted_fields_of_update_are_unchanged() {
    let def = products();
    let existing = stored_product();
    let mut entity = Entity::with_id(EntityId::new(1)).field("name", "Hex bolt");

    validate(&def, &mut entity, Some(&existing));

    assert_eq!(entity.get_str("name"), Some("Hex bolt"));
    assert_eq!(entity.get_str("note"), Some("zinc plated"));
}

#[test]
fn explicit_null_clears_field_on_update() {
    let def = products();
    let existing = stored_product();
    let mut entity = Entity::with_id(EntityId::new(1))
        .field("name", "Bolt")
        .field("note", "   ");

    validate(&def, &mut entity, Some(&existing));

    assert_eq!(entity.value("note"), &FieldValue::Null);
}

// ── Field validators ────────────────────────────────────────────

#[test]
fn blank_required_value_is_missing() {
    let def = products();
    let mut entity = Entity::new().field("name", "   ");

    validate(&def, &mut entity, None);

    assert_eq!(entity.error("name"), Some(&FieldError::new(MISSING, Vec::<String>::new())));
}

#[test]
fn first_rejecting_validator_stops_the_chain() {
    let later = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&later);
    let def = DataDefinition::builder("crm", "person")
        .field(
            FieldDefinition::new("name", FieldType::string())
                .required()
                .with_validator(move |_: &DataDefinition, _: &FieldDefinition, _: &FieldValue, _: &mut Entity| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    true
                }),
        )
        .build()
        .unwrap();
    let mut entity = Entity::new();

    validate(&def, &mut entity, None);

    assert!(!entity.is_field_valid("name"));
    assert_eq!(later.load(Ordering::SeqCst), 0);
}

#[test]
fn validators_skip_fields_that_failed_coercion() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let def = DataDefinition::builder("crm", "person")
        .field(FieldDefinition::new("age", FieldType::integer()).with_validator(
            move |_: &DataDefinition, _: &FieldDefinition, _: &FieldValue, _: &mut Entity| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            },
        ))
        .build()
        .unwrap();
    let mut entity = Entity::new().field("age", "old");

    validate(&def, &mut entity, None);

    assert!(!entity.is_field_valid("age"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn every_field_is_attempted() {
    let def = products();
    let mut entity = Entity::new().field("unit", "litre");

    validate(&def, &mut entity, None);

    assert_eq!(entity.error("name").map(|e| e.message.as_str()), Some(MISSING));
    assert_eq!(
        entity.error("unit"),
        Some(&FieldError::new(INVALID_DICTIONARY_ITEM, ["[pcs, kg]"]))
    );
}

// ── Entity validators ───────────────────────────────────────────

fn ranges(calls: Arc<AtomicUsize>) -> DataDefinition {
    let second = Arc::clone(&calls);
    DataDefinition::builder("plan", "window")
        .field(FieldDefinition::new("from", FieldType::integer()).required())
        .field(FieldDefinition::new("to", FieldType::integer()))
        .validator(move |_: &DataDefinition, e: &mut Entity| {
            calls.fetch_add(1, Ordering::SeqCst);
            match (e.get_integer("from"), e.get_integer("to")) {
                (Some(from), Some(to)) if from > to => {
                    e.add_global_error("fromAfterTo", Vec::<String>::new());
                    false
                }
                _ => true,
            }
        })
        .validator(move |_: &DataDefinition, _: &mut Entity| {
            second.fetch_add(1, Ordering::SeqCst);
            true
        })
        .build()
        .unwrap()
}

#[test]
fn entity_validators_see_whole_record() {
    let calls = Arc::new(AtomicUsize::new(0));
    let def = ranges(Arc::clone(&calls));
    let mut entity = Entity::new().field("from", 5).field("to", 2);

    validate(&def, &mut entity, None);

    assert!(!entity.is_valid());
    assert!(entity.errors().is_empty());
    assert_eq!(entity.global_errors()[0].message, "fromAfterTo");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn entity_validators_skipped_for_invalid_fields() {
    let calls = Arc::new(AtomicUsize::new(0));
    let def = ranges(Arc::clone(&calls));
    let mut entity = Entity::new().field("to", 2);

    validate(&def, &mut entity, None);

    assert!(!entity.is_field_valid("from"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// ── Hooks ───────────────────────────────────────────────────────

fn hooked() -> DataDefinition {
    DataDefinition::builder("crm", "person")
        .field(FieldDefinition::new("name", FieldType::string()).required())
        .field(FieldDefinition::new("state", FieldType::string()))
        .on_create(|_: &DataDefinition, e: &mut Entity| e.set_field("state", "created"))
        .on_update(|_: &DataDefinition, e: &mut Entity| e.set_field("state", "updated"))
        .build()
        .unwrap()
}

#[test]
fn create_hook_runs_for_new_entity() {
    let mut entity = Entity::new().field("name", "Ada");

    validate(&hooked(), &mut entity, None);

    assert_eq!(entity.get_str("state"), Some("created"));
}

#[test]
fn update_hook_runs_for_existing_entity() {
    let existing = Entity::with_id(EntityId::new(3)).field("name", "Ada");
    let mut entity = Entity::with_id(EntityId::new(3)).field("name", "Ada L.");

    validate(&hooked(), &mut entity, Some(&existing));

    assert_eq!(entity.get_str("state"), Some("updated"));
}

#[test]
fn hooks_run_for_invalid_entity() {
    let mut entity = Entity::new();

    validate(&hooked(), &mut entity, None);

    assert!(!entity.is_valid());
    assert_eq!(entity.get_str("state"), Some("created"));
}

// ── Configuration errors ────────────────────────────────────────

#[test]
fn custom_field_is_a_configuration_error() {
    let def = DataDefinition::builder("crm", "person")
        .field(FieldDefinition::new("name", FieldType::string()))
        .field(FieldDefinition::new("extra", FieldType::string()).custom())
        .build()
        .unwrap();
    let mut entity = Entity::new().field("name", "  Ada ");
    let dictionaries = StaticDictionaries::new();

    let err = ValidationService::new(&DetachedReferences, &dictionaries)
        .validate(&def, &mut entity, None)
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Model(ModelError::CustomFieldUnsupported { field, .. }) if field == "extra"
    ));
    assert_eq!(entity.get_str("name"), Some("  Ada "));
}

// ── Idempotence ─────────────────────────────────────────────────

#[test]
fn stale_errors_are_discarded() {
    let def = people();
    let mut entity = Entity::new().field("name", "Ada");
    entity.add_error("name", STRING_IS_TOO_LONG, ["255"]);

    validate(&def, &mut entity, None);

    assert!(entity.is_valid());
}

proptest! {
    #[test]
    fn revalidation_of_valid_entity_is_stable(name in "[ a-z]{0,255}", age in any::<i64>()) {
        let def = people();
        let mut entity = Entity::new().field("name", name).field("age", age);

        validate(&def, &mut entity, None);
        prop_assert!(entity.is_valid());
        let first = entity.clone();
        validate(&def, &mut entity, None);

        prop_assert_eq!(&entity, &first);
        prop_assert!(entity.is_valid());
    }
}

