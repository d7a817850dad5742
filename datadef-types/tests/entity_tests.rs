use datadef_types::{Entity, EntityId, FieldError, FieldValue};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashSet;

fn make_entity() -> Entity {
    Entity::with_id(EntityId::new(7))
        .field("name", "Widget")
        .field("count", 5)
        .field("active", true)
}

// ── Construction & fields ────────────────────────────────────────

#[test]
fn new_entity_has_no_id() {
    let e = Entity::new();
    assert_eq!(e.id(), None);
    assert!(e.fields().is_empty());
}

#[test]
fn typed_getters() {
    let e = make_entity();
    assert_eq!(e.id(), Some(EntityId::new(7)));
    assert_eq!(e.get_str("name"), Some("Widget"));
    assert_eq!(e.get_integer("count"), Some(5));
    assert_eq!(e.get_bool("active"), Some(true));
    assert_eq!(e.get_str("count"), None);
}

#[test]
fn absent_field_reads_as_null() {
    let e = make_entity();
    assert!(!e.has_field("missing"));
    assert_eq!(e.get_field("missing"), None);
    assert!(e.value("missing").is_null());
}

#[test]
fn explicit_null_is_present() {
    let mut e = Entity::new();
    e.set_field("name", FieldValue::Null);
    assert!(e.has_field("name"));
    assert!(e.value("name").is_null());
}

// ── Errors ───────────────────────────────────────────────────────

#[test]
fn fresh_entity_is_valid() {
    assert!(make_entity().is_valid());
}

#[test]
fn field_error_marks_field_and_entity_invalid() {
    let mut e = make_entity();
    e.add_error("name", "stringIsTooLong", ["255"]);
    assert!(!e.is_valid());
    assert!(!e.is_field_valid("name"));
    assert!(e.is_field_valid("count"));
    assert_eq!(
        e.error("name"),
        Some(&FieldError::new("stringIsTooLong", ["255"]))
    );
}

#[test]
fn first_error_on_a_field_wins() {
    let mut e = make_entity();
    e.add_error("name", "missing", Vec::<String>::new());
    e.add_error("name", "stringIsTooLong", ["255"]);
    assert_eq!(e.error("name").unwrap().message, "missing");
    assert_eq!(e.errors().len(), 1);
}

#[test]
fn global_error_invalidates_entity() {
    let mut e = make_entity();
    e.add_global_error("datesOverlap", ["start", "end"]);
    assert!(!e.is_valid());
    assert!(e.is_field_valid("name"));
    assert_eq!(e.global_errors().len(), 1);

    e.clear_errors();
    assert!(e.is_valid());
}

// ── Equality ─────────────────────────────────────────────────────

#[test]
fn equality_ignores_errors() {
    let a = make_entity();
    let mut b = make_entity();
    b.add_error("name", "missing", Vec::<String>::new());
    assert_eq!(a, b);
}

#[test]
fn equality_considers_id_and_fields() {
    let a = make_entity();
    let mut b = make_entity();
    b.set_id(Some(EntityId::new(8)));
    assert_ne!(a, b);

    let c = make_entity().field("name", "Gadget");
    assert_ne!(a, c);
}

#[test]
fn equal_entities_hash_alike() {
    let mut set = HashSet::new();
    set.insert(make_entity());
    set.insert(make_entity());
    assert_eq!(set.len(), 1);
}

// ── JSON payloads ────────────────────────────────────────────────

#[test]
fn from_json_extracts_id_and_fields() {
    let e = Entity::from_json(&json!({
        "id": 42,
        "name": "Widget",
        "price": 12.5,
        "count": 3,
        "active": false,
        "note": null
    }));
    assert_eq!(e.id(), Some(EntityId::new(42)));
    assert_eq!(e.get_str("name"), Some("Widget"));
    assert_eq!(e.value("price").as_decimal().unwrap().to_string(), "12.5");
    assert_eq!(e.get_integer("count"), Some(3));
    assert_eq!(e.get_bool("active"), Some(false));
    assert!(e.has_field("note"));
    assert!(!e.has_field("id"));
}

#[test]
fn from_json_accepts_textual_id() {
    let e = Entity::from_json(&json!({"id": "15"}));
    assert_eq!(e.id(), Some(EntityId::new(15)));
}

#[test]
fn from_json_nested_object_becomes_entity() {
    let e = Entity::from_json(&json!({"parent": {"id": 3}}));
    assert_eq!(e.value("parent").reference_id(), Some(EntityId::new(3)));
}

#[test]
fn from_json_non_object_is_empty() {
    let e = Entity::from_json(&json!([1, 2, 3]));
    assert_eq!(e, Entity::new());
}

#[test]
fn serde_roundtrip_keeps_errors() {
    let mut e = make_entity();
    e.add_error("name", "missing", Vec::<String>::new());
    let json = serde_json::to_string(&e).unwrap();
    let back: Entity = serde_json::from_str(&json).unwrap();
    assert_eq!(back, e);
    assert_eq!(back.error("name"), e.error("name"));
}

#[test]
fn display_lists_fields() {
    let e = Entity::with_id(EntityId::new(1)).field("a", 1).field("b", "x");
    assert_eq!(e.to_string(), "#1, {a=1, b=x}");
    assert_eq!(Entity::new().to_string(), "#new, {}");
}
