use datadef_types::{DefinitionKey, EntityId};
use std::collections::HashSet;
use std::str::FromStr;

// ── EntityId ──────────────────────────────────────────────────────

#[test]
fn entity_id_display_and_parse() {
    let id = EntityId::new(1234);
    let parsed = EntityId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn entity_id_parse_trims() {
    assert_eq!(EntityId::from_str(" 42 ").unwrap(), EntityId::new(42));
}

#[test]
fn entity_id_parse_invalid() {
    assert!(EntityId::parse("forty-two").is_err());
    assert!(EntityId::parse("-1").is_err());
}

#[test]
fn entity_id_ordering() {
    assert!(EntityId::new(1) < EntityId::new(2));
}

#[test]
fn entity_id_serde_is_transparent() {
    let json = serde_json::to_string(&EntityId::new(5)).unwrap();
    assert_eq!(json, "5");
}

// ── DefinitionKey ────────────────────────────────────────────────

#[test]
fn definition_key_display() {
    assert_eq!(DefinitionKey::new("products", "order").to_string(), "products.order");
}

#[test]
fn definition_keys_are_unique_per_plugin_and_name() {
    let mut set = HashSet::new();
    set.insert(DefinitionKey::new("a", "x"));
    set.insert(DefinitionKey::new("a", "x"));
    set.insert(DefinitionKey::new("b", "x"));
    assert_eq!(set.len(), 2);
}
