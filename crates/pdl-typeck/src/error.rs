//! Typed validation errors.
//!
//! Loading either produces a complete protocol or fails with a single
//! `TypeError`; nothing is recovered locally and no partial IR escapes.
//! Each variant carries enough context to render a precise message through
//! `Display`.

use std::fmt;

use serde::Serialize;

/// A validation failure raised while loading a protocol document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeError {
    // ── Naming ─────────────────────────────────────────────────────────
    /// A name that must match `[A-Z][A-Za-z0-9$_]+` does not.
    MalformedTypeName { name: String },
    /// A name that must match `[a-z][A-Za-z0-9$_]+` does not.
    MalformedName { name: String },
    /// The name is already taken by a type or a trait.
    DuplicateDefinition { name: String },

    // ── References ─────────────────────────────────────────────────────
    /// A type reference does not name a previously registered type.
    UnknownType { name: String },
    /// A trait reference does not name a registered trait.
    UnknownTrait { name: String },
    /// A function reference does not name a registered function.
    UnknownFunction { name: String },
    /// A struct has no field of the given name.
    UnknownField { ty: String, field: String },
    /// A type has no method of the given name.
    UnknownMethod { ty: String, method: String },
    /// The protocol context has no field of the given name.
    UnknownContextField { field: String },
    /// A PDU entry does not name a registered type.
    UnknownPdu { name: String },

    // ── Shape ──────────────────────────────────────────────────────────
    /// The top-level document does not declare itself a protocol.
    NotAProtocol { found: String },
    /// A field access on a non-struct type.
    NotAStruct { ty: String },
    /// The named type exists but is not a function.
    NotAFunction { name: String },
    /// A trait method whose first parameter is not the self placeholder.
    MissingSelfParameter { trait_name: String, method: String },
    /// Wrong number of arguments in a method or function invocation.
    ArityMismatch { callee: String, expected: usize, found: usize },
    /// An argument's name does not match the declared parameter's name.
    ArgumentNameMismatch { callee: String, expected: String, found: String },
    /// An argument's type does not match the declared parameter's type.
    ArgumentTypeMismatch {
        callee: String,
        param: String,
        expected: String,
        found: String,
    },

    // ── Typing ─────────────────────────────────────────────────────────
    /// A field's `is_present` predicate is not Boolean.
    PresenceNotBoolean { field: String, found: String },
    /// A struct constraint is not Boolean.
    ConstraintNotBoolean { ty: String, found: String },
    /// A struct action does not check to Nothing.
    ActionNotNothing { ty: String, found: String },
    /// An if/else condition is not Boolean.
    ConditionNotBoolean { found: String },
    /// The two arms of an if/else have different types.
    BranchMismatch { if_true: String, if_false: String },
    /// A transform function does not take exactly one parameter of the
    /// field's type.
    TransformParameterMismatch { using: String, expected: String },
    /// A transform function's return type is not the declared target type.
    TransformReturnMismatch { using: String, expected: String, found: String },
    /// A transform changes the field's bit width.
    TransformSizeMismatch {
        field: String,
        from_size: Option<u64>,
        into_size: Option<u64>,
    },

    // ── Structure ──────────────────────────────────────────────────────
    /// A struct declares the same field name twice (transform target
    /// names count).
    DuplicateField { ty: String, field: String },
    /// A function declares the same parameter name twice.
    DuplicateParameter { function: String, param: String },
    /// The context declares the same field name twice.
    DuplicateContextField { field: String },
    /// The type already implements the trait.
    TraitAlreadyImplemented { ty: String, trait_name: String },
    /// Implementing a trait would overwrite an existing method.
    MethodAlreadyDefined { ty: String, method: String },
    /// A bit string was declared with a zero width.
    InvalidBitStringSize { name: String },
}

/// Render an optional bit width; unknown widths print as `unknown`.
fn bits(size: &Option<u64>) -> String {
    match size {
        Some(n) => format!("{} bits", n),
        None => "unknown size".to_string(),
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::MalformedTypeName { name } => {
                write!(f, "malformed type name `{}`", name)
            }
            TypeError::MalformedName { name } => {
                write!(f, "malformed name `{}`", name)
            }
            TypeError::DuplicateDefinition { name } => {
                write!(f, "`{}` is already defined", name)
            }
            TypeError::UnknownType { name } => {
                write!(f, "unknown type `{}`", name)
            }
            TypeError::UnknownTrait { name } => {
                write!(f, "unknown trait `{}`", name)
            }
            TypeError::UnknownFunction { name } => {
                write!(f, "unknown function `{}`", name)
            }
            TypeError::UnknownField { ty, field } => {
                write!(f, "struct `{}` has no field `{}`", ty, field)
            }
            TypeError::UnknownMethod { ty, method } => {
                write!(f, "type `{}` has no method `{}`", ty, method)
            }
            TypeError::UnknownContextField { field } => {
                write!(f, "context has no field `{}`", field)
            }
            TypeError::UnknownPdu { name } => {
                write!(f, "PDU `{}` is not a registered type", name)
            }
            TypeError::NotAProtocol { found } => {
                write!(f, "expected a `Protocol` document, found `{}`", found)
            }
            TypeError::NotAStruct { ty } => {
                write!(f, "type `{}` is not a struct", ty)
            }
            TypeError::NotAFunction { name } => {
                write!(f, "`{}` is not a function", name)
            }
            TypeError::MissingSelfParameter { trait_name, method } => {
                write!(
                    f,
                    "method `{}` of trait `{}` must take `self` as its first parameter",
                    method, trait_name
                )
            }
            TypeError::ArityMismatch { callee, expected, found } => {
                write!(
                    f,
                    "`{}` expects {} argument(s), found {}",
                    callee, expected, found
                )
            }
            TypeError::ArgumentNameMismatch { callee, expected, found } => {
                write!(
                    f,
                    "argument `{}` of `{}` should be named `{}`",
                    found, callee, expected
                )
            }
            TypeError::ArgumentTypeMismatch { callee, param, expected, found } => {
                write!(
                    f,
                    "argument `{}` of `{}` expects `{}`, found `{}`",
                    param, callee, expected, found
                )
            }
            TypeError::PresenceNotBoolean { field, found } => {
                write!(
                    f,
                    "presence predicate of field `{}` must be `Boolean`, found `{}`",
                    field, found
                )
            }
            TypeError::ConstraintNotBoolean { ty, found } => {
                write!(
                    f,
                    "constraint on struct `{}` must be `Boolean`, found `{}`",
                    ty, found
                )
            }
            TypeError::ActionNotNothing { ty, found } => {
                write!(
                    f,
                    "action on struct `{}` must be `Nothing`, found `{}`",
                    ty, found
                )
            }
            TypeError::ConditionNotBoolean { found } => {
                write!(f, "if/else condition must be `Boolean`, found `{}`", found)
            }
            TypeError::BranchMismatch { if_true, if_false } => {
                write!(
                    f,
                    "if/else branches disagree: `{}` vs `{}`",
                    if_true, if_false
                )
            }
            TypeError::TransformParameterMismatch { using, expected } => {
                write!(
                    f,
                    "transform function `{}` must take exactly one parameter of type `{}`",
                    using, expected
                )
            }
            TypeError::TransformReturnMismatch { using, expected, found } => {
                write!(
                    f,
                    "transform function `{}` must return `{}`, found `{}`",
                    using, expected, found
                )
            }
            TypeError::TransformSizeMismatch { field, from_size, into_size } => {
                write!(
                    f,
                    "transform of field `{}` is a size mismatch: {} -> {}",
                    field,
                    bits(from_size),
                    bits(into_size)
                )
            }
            TypeError::DuplicateField { ty, field } => {
                write!(f, "struct `{}` already has a field named `{}`", ty, field)
            }
            TypeError::DuplicateParameter { function, param } => {
                write!(
                    f,
                    "function `{}` already has a parameter named `{}`",
                    function, param
                )
            }
            TypeError::DuplicateContextField { field } => {
                write!(f, "context already has a field named `{}`", field)
            }
            TypeError::TraitAlreadyImplemented { ty, trait_name } => {
                write!(f, "type `{}` already implements `{}`", ty, trait_name)
            }
            TypeError::MethodAlreadyDefined { ty, method } => {
                write!(f, "type `{}` already has a method `{}`", ty, method)
            }
            TypeError::InvalidBitStringSize { name } => {
                write!(f, "bit string `{}` requires a positive size", name)
            }
        }
    }
}

impl std::error::Error for TypeError {}

/// An error from the string/value entry points: either the document was
/// not valid protocol JSON, or it failed validation.
#[derive(Debug)]
pub enum LoadError {
    /// The document could not be deserialized (malformed JSON, missing
    /// keys, unknown `construct` or `expression` tags).
    Parse(serde_json::Error),
    /// The document deserialized but failed validation.
    Type(TypeError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Parse(err) => write!(f, "invalid protocol document: {}", err),
            LoadError::Type(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Parse(err) => Some(err),
            LoadError::Type(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err)
    }
}

impl From<TypeError> for LoadError {
    fn from(err: TypeError) -> Self {
        LoadError::Type(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_error_display() {
        let err = TypeError::UnknownType { name: "SeqNum".into() };
        assert_eq!(err.to_string(), "unknown type `SeqNum`");
    }

    #[test]
    fn size_mismatch_display_with_unknown_width() {
        let err = TypeError::TransformSizeMismatch {
            field: "seq".into(),
            from_size: Some(16),
            into_size: None,
        };
        assert_eq!(
            err.to_string(),
            "transform of field `seq` is a size mismatch: 16 bits -> unknown size"
        );
    }
}
