//! Integration tests for tagged unions: variant resolution, sorted
//! storage, and unknown sizes.

use pdl_typeck::error::{LoadError, TypeError};
use pdl_typeck::ty::TypeKind;
use pdl_typeck::Protocol;
use serde_json::json;

// ── Helpers ────────────────────────────────────────────────────────────

fn load_protocol(
    definitions: serde_json::Value,
    pdus: serde_json::Value,
) -> Result<Protocol, LoadError> {
    pdl_typeck::load_value(json!({
        "construct": "Protocol",
        "name": "Test",
        "definitions": definitions,
        "pdus": pdus,
    }))
}

fn expect_type_error(result: Result<Protocol, LoadError>) -> TypeError {
    match result {
        Err(LoadError::Type(err)) => err,
        Err(LoadError::Parse(err)) => panic!("expected a type error, got parse error: {}", err),
        Ok(_) => panic!("expected a type error, document loaded"),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

/// 1. An enum over two 32-bit strings, declared as a PDU: variants come
///    out sorted, the size is unknown, and the PDU list resolves.
#[test]
fn test_enum_as_pdu() {
    let protocol = load_protocol(
        json!([
            {"construct": "BitString", "name": "TypeB", "size": 32},
            {"construct": "BitString", "name": "TypeA", "size": 32},
            {"construct": "Enum", "name": "TestEnum",
             "variants": [{"type": "TypeB"}, {"type": "TypeA"}]},
        ]),
        json!([{"type": "TestEnum"}]),
    )
    .unwrap();
    let record = protocol.get_type("TestEnum").unwrap();
    assert_eq!(record.kind_name(), "Enum");
    assert_eq!(record.size(), None);
    let TypeKind::Enum { variants } = &record.kind else {
        panic!("expected an Enum kind");
    };
    assert_eq!(variants, &["TypeA".to_string(), "TypeB".into()]);
    assert_eq!(protocol.pdus(), ["TestEnum".to_string()]);
}

/// 2. Enums implement no traits and carry no methods.
#[test]
fn test_enum_has_no_methods() {
    let protocol = load_protocol(
        json!([
            {"construct": "BitString", "name": "Word", "size": 16},
            {"construct": "Enum", "name": "Chunk", "variants": [{"type": "Word"}]},
        ]),
        json!([]),
    )
    .unwrap();
    let record = protocol.get_type("Chunk").unwrap();
    assert!(record.implements.is_empty());
    assert!(record.methods.is_empty());
}

/// 3. A variant referencing an unregistered type fails.
#[test]
fn test_unknown_variant_fails() {
    let err = expect_type_error(load_protocol(
        json!([
            {"construct": "Enum", "name": "Chunk", "variants": [{"type": "Word"}]},
        ]),
        json!([]),
    ));
    assert_eq!(err, TypeError::UnknownType { name: "Word".into() });
}

/// 4. A newtype over an enum reads as an Enum with the same variants.
#[test]
fn test_new_type_over_enum() {
    let protocol = load_protocol(
        json!([
            {"construct": "BitString", "name": "TypeA", "size": 32},
            {"construct": "Enum", "name": "Chunk", "variants": [{"type": "TypeA"}]},
            {"construct": "NewType", "name": "Frame", "derived_from": "Chunk", "implements": []},
        ]),
        json!([]),
    )
    .unwrap();
    let record = protocol.get_type("Frame").unwrap();
    assert_eq!(record.kind_name(), "Enum");
    assert_eq!(record.size(), None);
    let TypeKind::Enum { variants } = &record.kind else {
        panic!("expected an Enum kind");
    };
    assert_eq!(variants, &["TypeA".to_string()]);
}
