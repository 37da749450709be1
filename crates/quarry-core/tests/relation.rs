//! Relation keys.

use quarry_core::{Error, RelationKey};

#[test]
fn test_relation_key_round_trips_through_display() {
    let key = RelationKey::parse(" uid : UserId ").unwrap();
    assert_eq!(key.field, "uid");
    assert_eq!(key.attribute, "UserId");
    assert_eq!(key.to_string(), "uid:UserId");
}

#[test]
fn test_malformed_relation_keys() {
    for input in ["", "uid", "uid:", ":UserId", "a:b:c"] {
        assert!(
            matches!(RelationKey::parse(input), Err(Error::MalformedInput { .. })),
            "expected {input:?} to be rejected"
        );
    }
}
