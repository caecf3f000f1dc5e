//! Expression nodes of the protocol description language.
//!
//! Expressions appear in three places in a protocol document: a struct
//! field's `is_present` predicate, a struct's `constraints`, and a
//! struct's `actions`. They are tagged JSON objects discriminated by the
//! `expression` key.

use serde::{Deserialize, Serialize};

/// An expression, discriminated by the `expression` tag.
///
/// Expressions are checked bottom-up by the type checker; this crate only
/// carries their shape. `Constant` values are kept as raw JSON -- whether
/// a literal fits its declared type is not decided here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expression")]
pub enum Expr {
    /// The enclosing struct: `this`.
    This,
    /// A typed literal: `{"expression": "Constant", "type": "Size", "value": 4}`.
    Constant {
        #[serde(rename = "type")]
        ty: String,
        value: serde_json::Value,
    },
    /// A method call on the target's type: `target.method(arguments)`.
    MethodInvocation {
        target: Box<Expr>,
        method: String,
        arguments: Vec<Argument>,
    },
    /// A call of a named top-level function.
    FunctionInvocation { name: String, arguments: Vec<Argument> },
    /// Field projection out of a struct-typed target.
    FieldAccess { target: Box<Expr>, field: String },
    /// A read of a protocol context field.
    ContextAccess { field: String },
    /// A two-armed conditional; both arms must have the same type.
    IfElse {
        condition: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Box<Expr>,
    },
}

/// A named actual argument in a method or function invocation.
///
/// Arguments are positional, but each carries the name of the parameter it
/// binds to; the checker verifies the names line up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub value: Expr,
}
