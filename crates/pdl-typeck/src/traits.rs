//! Trait definitions and self-type substitution.
//!
//! A trait is a named bundle of method signatures polymorphic over a
//! self-type. In a trait signature the self-type is a placeholder
//! (`ty: None`); implementing the trait materializes each signature onto
//! the implementing type with every placeholder replaced by that type's
//! name. Materialization is eager, so after loading a type's method table
//! is a flat mapping with no placeholders left.

use serde::Serialize;

use crate::ty::{Method, Param};

/// A parameter in a trait method signature. `ty: None` is the self-type
/// placeholder, resolved at implementation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitParam {
    pub name: String,
    pub ty: Option<String>,
}

impl TraitParam {
    /// The mandatory leading parameter of every trait method: `("self", None)`.
    pub fn self_param() -> Self {
        TraitParam { name: "self".into(), ty: None }
    }

    /// A parameter of the self type.
    pub fn self_typed(name: impl Into<String>) -> Self {
        TraitParam { name: name.into(), ty: None }
    }

    /// A parameter of a concrete named type.
    pub fn named(name: impl Into<String>, ty: impl Into<String>) -> Self {
        TraitParam { name: name.into(), ty: Some(ty.into()) }
    }
}

/// A method signature within a trait definition.
///
/// `ret: None` means the method returns the self type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitMethod {
    pub name: String,
    pub params: Vec<TraitParam>,
    pub ret: Option<String>,
}

impl TraitMethod {
    pub fn new(
        name: impl Into<String>,
        params: Vec<TraitParam>,
        ret: Option<&str>,
    ) -> Self {
        TraitMethod {
            name: name.into(),
            params,
            ret: ret.map(String::from),
        }
    }

    /// Copy this signature with every self placeholder replaced by
    /// `self_ty`, yielding a concrete method for that type.
    pub fn materialize(&self, self_ty: &str) -> Method {
        Method {
            name: self.name.clone(),
            params: self
                .params
                .iter()
                .map(|p| Param {
                    name: p.name.clone(),
                    ty: p.ty.clone().unwrap_or_else(|| self_ty.to_string()),
                })
                .collect(),
            ret: self.ret.clone().unwrap_or_else(|| self_ty.to_string()),
        }
    }
}

/// A trait definition: a name plus its method signatures, in declaration
/// order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitDef {
    pub name: String,
    pub methods: Vec<TraitMethod>,
}

impl TraitDef {
    pub fn new(name: impl Into<String>, methods: Vec<TraitMethod>) -> Self {
        TraitDef { name: name.into(), methods }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materialize_substitutes_every_placeholder() {
        let sig = TraitMethod::new(
            "plus",
            vec![TraitParam::self_param(), TraitParam::self_typed("other")],
            None,
        );
        let method = sig.materialize("Size");
        assert_eq!(method.to_string(), "plus(self: Size, other: Size) -> Size");
    }

    #[test]
    fn materialize_keeps_concrete_types() {
        let sig = TraitMethod::new(
            "set",
            vec![
                TraitParam::self_param(),
                TraitParam::named("index", "Size"),
                TraitParam::self_typed("value"),
            ],
            Some("Nothing"),
        );
        let method = sig.materialize("CsrcList");
        assert_eq!(
            method.to_string(),
            "set(self: CsrcList, index: Size, value: CsrcList) -> Nothing"
        );
    }
}
