use datadef_search::Restriction;
use datadef_types::{Entity, EntityId};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn entity() -> Entity {
    Entity::with_id(EntityId::new(7))
        .field("name", "Hex Bolt M8")
        .field("quantity", 12)
        .field("price", Decimal::new(1250, 2))
}

// ── Comparisons ─────────────────────────────────────────────────

#[test]
fn comparisons_follow_value_order() {
    let e = entity();

    assert!(Restriction::eq("quantity", 12).matches(&e));
    assert!(Restriction::ge("quantity", 12).matches(&e));
    assert!(Restriction::gt("quantity", 11).matches(&e));
    assert!(!Restriction::lt("quantity", 12).matches(&e));
    assert!(Restriction::le("price", Decimal::new(1250, 2)).matches(&e));
    assert!(Restriction::ne("name", "Nut").matches(&e));
}

#[test]
fn integers_and_decimals_compare_numerically() {
    assert!(Restriction::lt("price", 13).matches(&entity()));
    assert!(Restriction::eq("quantity", Decimal::new(120, 1)).matches(&entity()));
}

#[test]
fn null_never_compares() {
    let e = entity();

    assert!(!Restriction::eq("missing", 1).matches(&e));
    assert!(!Restriction::ne("missing", 1).matches(&e));
    assert!(Restriction::is_null("missing").matches(&e));
    assert!(Restriction::is_not_null("name").matches(&e));
}

#[test]
fn unrelated_kinds_never_match() {
    assert!(!Restriction::eq("quantity", "12").matches(&entity()));
    assert!(!Restriction::ne("quantity", "12").matches(&entity()));
}

#[test]
fn in_matches_any_listed_value() {
    assert!(Restriction::is_in("quantity", [1, 12, 30]).matches(&entity()));
    assert!(!Restriction::is_in("quantity", [1, 2]).matches(&entity()));
}

#[test]
fn id_eq_matches_identity() {
    assert!(Restriction::id_eq(EntityId::new(7)).matches(&entity()));
    assert!(!Restriction::id_eq(EntityId::new(7)).matches(&Entity::new()));
}

// ── Like ────────────────────────────────────────────────────────

#[test]
fn like_supports_both_wildcard_spellings() {
    let e = entity();

    assert!(Restriction::like("name", "Hex*").matches(&e));
    assert!(Restriction::like("name", "%M8").matches(&e));
    assert!(Restriction::like("name", "Hex Bolt M?").matches(&e));
    assert!(Restriction::like("name", "H_x%").matches(&e));
    assert!(!Restriction::like("name", "Bolt*").matches(&e));
    assert!(!Restriction::like("quantity", "*").matches(&e));
}

proptest! {
    #[test]
    fn star_matches_any_text(text in "[a-zA-Z0-9 ]{0,40}") {
        let e = Entity::new().field("name", text.as_str());
        prop_assert!(Restriction::like("name", "*").matches(&e));
    }

    #[test]
    fn literal_pattern_matches_only_itself(a in "[a-z]{1,12}", b in "[a-z]{1,12}") {
        let e = Entity::new().field("name", a.as_str());
        prop_assert_eq!(Restriction::like("name", b.as_str()).matches(&e), a == b);
    }

    #[test]
    fn prefix_pattern_matches_extensions(prefix in "[a-z]{0,8}", rest in "[a-z]{0,8}") {
        let e = Entity::new().field("name", format!("{prefix}{rest}"));
        let pattern = format!("{prefix}%");
        prop_assert!(Restriction::like("name", pattern).matches(&e));
    }
}
