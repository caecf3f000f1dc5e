//! Item-level nodes: the protocol document and its definitions.
//!
//! Covers: Document, Definition, BitStringDef, ArrayDef, StructDef,
//! FieldDef, TransformDef, EnumDef, VariantRef, NewTypeDef, FunctionDef,
//! ParamDef, ContextDef, ContextFieldDef, PduRef.

use serde::{Deserialize, Serialize};

use crate::expr::Expr;

/// A complete protocol document.
///
/// The top-level `construct` key must be `"Protocol"`; the loader rejects
/// anything else. Definitions are kept in document order because a
/// definition may only reference types declared before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub construct: String,
    pub name: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub pdus: Vec<PduRef>,
}

/// A reference to a top-level PDU type: `{"type": "Packet"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PduRef {
    #[serde(rename = "type")]
    pub ty: String,
}

/// A single definition, discriminated by the `construct` tag.
///
/// An unrecognized tag fails deserialization, which aborts loading before
/// any checking starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "construct")]
pub enum Definition {
    BitString(BitStringDef),
    Array(ArrayDef),
    Struct(StructDef),
    Enum(EnumDef),
    NewType(NewTypeDef),
    Function(FunctionDef),
    Context(ContextDef),
}

/// A fixed-width string of bits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitStringDef {
    pub name: String,
    /// Width in bits; must be positive.
    pub size: u64,
}

/// A homogeneous array. `length` is `null` (or absent) when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayDef {
    pub name: String,
    pub element_type: String,
    pub length: Option<u64>,
}

/// A structure: ordered fields plus constraints and actions over them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub constraints: Vec<Expr>,
    #[serde(default)]
    pub actions: Vec<Expr>,
}

/// One struct field. `is_present` is a Boolean-typed predicate evaluated
/// against the struct being defined; `transform` optionally reinterprets
/// the field as another type of the same bit width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub is_present: Expr,
    #[serde(default)]
    pub transform: Option<TransformDef>,
}

/// A declared field reinterpretation: `using` names a single-argument
/// function from the field's type to `into_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformDef {
    pub into_name: String,
    pub into_type: String,
    pub using: String,
}

/// A tagged union over previously defined types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<VariantRef>,
}

/// A reference to a variant type: `{"type": "ShortHeader"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRef {
    #[serde(rename = "type")]
    pub ty: String,
}

/// A derived type: a fresh name over an existing type's shape, optionally
/// implementing additional traits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTypeDef {
    pub name: String,
    pub derived_from: String,
    #[serde(default)]
    pub implements: Vec<String>,
}

/// A pure function signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParamDef>,
    pub return_type: String,
}

/// A named, typed function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// Protocol-wide context fields. Not a type definition: the fields are
/// merged into the protocol's context table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDef {
    #[serde(default)]
    pub fields: Vec<ContextFieldDef>,
}

/// A single context field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextFieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty_document() {
        let doc: Document = serde_json::from_str(
            r#"{"construct": "Protocol", "name": "Empty", "definitions": [], "pdus": []}"#,
        )
        .unwrap();
        assert_eq!(doc.construct, "Protocol");
        assert_eq!(doc.name, "Empty");
        assert!(doc.definitions.is_empty());
        assert!(doc.pdus.is_empty());
    }

    #[test]
    fn deserialize_bit_string_definition() {
        let def: Definition = serde_json::from_str(
            r#"{"construct": "BitString", "name": "SeqNum", "size": 16}"#,
        )
        .unwrap();
        assert_eq!(
            def,
            Definition::BitString(BitStringDef { name: "SeqNum".into(), size: 16 })
        );
    }

    #[test]
    fn deserialize_array_with_null_length() {
        let def: Definition = serde_json::from_str(
            r#"{"construct": "Array", "name": "Payload", "element_type": "Octet", "length": null}"#,
        )
        .unwrap();
        assert_eq!(
            def,
            Definition::Array(ArrayDef {
                name: "Payload".into(),
                element_type: "Octet".into(),
                length: None,
            })
        );
    }

    #[test]
    fn deserialize_struct_with_transform() {
        let def: Definition = serde_json::from_str(
            r#"{
                "construct": "Struct",
                "name": "Header",
                "fields": [
                    {
                        "name": "seq",
                        "type": "SeqNum",
                        "is_present": {"expression": "Constant", "type": "Boolean", "value": true},
                        "transform": {
                            "into_name": "ext_seq",
                            "into_type": "ExtSeqNum",
                            "using": "decode_seq"
                        }
                    }
                ],
                "constraints": [],
                "actions": []
            }"#,
        )
        .unwrap();
        let Definition::Struct(s) = def else {
            panic!("expected Struct definition");
        };
        assert_eq!(s.fields.len(), 1);
        let transform = s.fields[0].transform.as_ref().unwrap();
        assert_eq!(transform.into_name, "ext_seq");
        assert_eq!(transform.using, "decode_seq");
    }

    #[test]
    fn missing_struct_lists_default_to_empty() {
        let def: Definition =
            serde_json::from_str(r#"{"construct": "Struct", "name": "Empty", "fields": []}"#)
                .unwrap();
        let Definition::Struct(s) = def else {
            panic!("expected Struct definition");
        };
        assert!(s.constraints.is_empty());
        assert!(s.actions.is_empty());
    }

    #[test]
    fn unknown_construct_tag_is_rejected() {
        let result: Result<Definition, _> =
            serde_json::from_str(r#"{"construct": "Macro", "name": "M"}"#);
        assert!(result.is_err());
    }
}
