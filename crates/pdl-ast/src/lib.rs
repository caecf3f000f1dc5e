//! Declarative document model for the protocol description language.
//!
//! A protocol is described by a single JSON document: an ordered list of
//! type definitions (bit strings, arrays, structures, tagged unions,
//! derived types, functions, a context) followed by the protocol's PDU
//! list. This crate defines the typed shape of that document and of the
//! embedded expression language, both deserialized with serde over the
//! `construct` / `expression` discriminator keys.
//!
//! The crate is purely structural: no name resolution, no type checking.
//! That is the job of `pdl-typeck`, which consumes these nodes.

pub mod expr;
pub mod item;

pub use expr::{Argument, Expr};
pub use item::{
    ArrayDef, BitStringDef, ContextDef, ContextFieldDef, Definition, Document, EnumDef, FieldDef,
    FunctionDef, NewTypeDef, ParamDef, PduRef, StructDef, TransformDef, VariantRef,
};
