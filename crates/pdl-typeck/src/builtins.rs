//! Built-in type and trait registration.
//!
//! Every protocol starts from the same substrate: the four primitive
//! types (Nothing, Boolean, Size, FieldName) and the seven built-in
//! traits (ArithmeticOps, BooleanOps, Equality, IndexCollection, Ordinal,
//! Sized, Value). Boolean and Size then implement the traits that make
//! presence predicates, constraints, and size arithmetic well-typed.

use crate::error::TypeError;
use crate::protocol::Protocol;
use crate::traits::{TraitDef, TraitMethod, TraitParam};
use crate::ty::{TypeKind, TypeRecord};

/// A binary method `name(self, other: Self) -> ret`; `ret: None` returns
/// the self type.
fn binary(name: &str, ret: Option<&str>) -> TraitMethod {
    TraitMethod::new(
        name,
        vec![TraitParam::self_param(), TraitParam::self_typed("other")],
        ret,
    )
}

/// Register primitives, built-in traits, and primitive trait
/// implementations into a fresh protocol.
pub(crate) fn register(protocol: &mut Protocol) -> Result<(), TypeError> {
    // ── Primitive types ────────────────────────────────────────────────

    protocol.define_type(TypeRecord::new("Nothing", TypeKind::Nothing))?;
    protocol.define_type(TypeRecord::new("Boolean", TypeKind::Boolean))?;
    protocol.define_type(TypeRecord::new("Size", TypeKind::Size))?;
    protocol.define_type(TypeRecord::new("FieldName", TypeKind::FieldName))?;

    // ── Built-in traits ────────────────────────────────────────────────

    protocol.define_trait(TraitDef::new(
        "Value",
        vec![
            TraitMethod::new("get", vec![TraitParam::self_param()], None),
            TraitMethod::new(
                "set",
                vec![TraitParam::self_param(), TraitParam::self_typed("value")],
                Some("Nothing"),
            ),
        ],
    ))?;

    protocol.define_trait(TraitDef::new(
        "Sized",
        vec![TraitMethod::new("size", vec![TraitParam::self_param()], Some("Size"))],
    ))?;

    protocol.define_trait(TraitDef::new(
        "IndexCollection",
        vec![
            TraitMethod::new(
                "get",
                vec![TraitParam::self_param(), TraitParam::named("index", "Size")],
                None,
            ),
            TraitMethod::new(
                "set",
                vec![
                    TraitParam::self_param(),
                    TraitParam::named("index", "Size"),
                    TraitParam::self_typed("value"),
                ],
                Some("Nothing"),
            ),
            TraitMethod::new("length", vec![TraitParam::self_param()], Some("Size")),
        ],
    ))?;

    protocol.define_trait(TraitDef::new(
        "Equality",
        vec![binary("eq", Some("Boolean")), binary("ne", Some("Boolean"))],
    ))?;

    protocol.define_trait(TraitDef::new(
        "Ordinal",
        vec![
            binary("lt", Some("Boolean")),
            binary("le", Some("Boolean")),
            binary("gt", Some("Boolean")),
            binary("ge", Some("Boolean")),
        ],
    ))?;

    protocol.define_trait(TraitDef::new(
        "BooleanOps",
        vec![
            binary("and", Some("Boolean")),
            binary("or", Some("Boolean")),
            TraitMethod::new("not", vec![TraitParam::self_param()], Some("Boolean")),
        ],
    ))?;

    protocol.define_trait(TraitDef::new(
        "ArithmeticOps",
        vec![
            binary("plus", None),
            binary("minus", None),
            binary("multiply", None),
            binary("divide", None),
            binary("modulo", None),
        ],
    ))?;

    // ── Primitive trait implementations ────────────────────────────────

    protocol.implement("Boolean", &["BooleanOps", "Equality"])?;
    protocol.implement("Size", &["ArithmeticOps", "Equality", "Ordinal"])?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_protocol_has_primitives_and_traits() {
        let protocol = Protocol::new("Test").unwrap();
        assert_eq!(protocol.types().count(), 4);
        assert_eq!(protocol.traits().count(), 7);
        for name in ["Nothing", "Boolean", "Size", "FieldName"] {
            assert!(protocol.get_type(name).is_some(), "missing primitive {}", name);
        }
    }

    #[test]
    fn size_arithmetic_is_self_typed() {
        let protocol = Protocol::new("Test").unwrap();
        let size = protocol.get_type("Size").unwrap();
        assert_eq!(
            size.implements,
            vec!["ArithmeticOps".to_string(), "Equality".into(), "Ordinal".into()]
        );
        let plus = size.method("plus").unwrap();
        assert_eq!(plus.to_string(), "plus(self: Size, other: Size) -> Size");
        let lt = size.method("lt").unwrap();
        assert_eq!(lt.ret, "Boolean");
    }

    #[test]
    fn boolean_combinators_are_registered() {
        let protocol = Protocol::new("Test").unwrap();
        let boolean = protocol.get_type("Boolean").unwrap();
        assert_eq!(boolean.implements, vec!["BooleanOps".to_string(), "Equality".into()]);
        assert_eq!(
            boolean.method("not").unwrap().to_string(),
            "not(self: Boolean) -> Boolean"
        );
    }
}
