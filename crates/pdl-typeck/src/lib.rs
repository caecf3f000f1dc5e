//! Type checker and intermediate representation for the protocol
//! description language.
//!
//! A protocol document (see `pdl-ast`) declares bit strings, arrays,
//! structs with per-field presence predicates and transforms, tagged
//! unions, derived types, functions, a context, and a PDU list. Loading
//! the document builds an IR in which every name resolves, every
//! expression checks against the trait/method algebra of its receiver,
//! and every structural invariant holds. The result is the substrate
//! that code generators and parser synthesizers consume.
//!
//! The pass is load -> validate -> expose: [`load`] either returns a
//! complete, immutable [`Protocol`] or fails fast with a [`TypeError`].
//! All listed collections (implemented traits, enum variants, PDUs) are
//! sorted, so the IR is deterministic and suitable for golden-file
//! comparison.

pub mod check;
pub mod error;
pub mod protocol;
pub mod traits;
pub mod ty;

mod builtins;
mod construct;
mod loader;

pub use error::{LoadError, TypeError};
pub use loader::{load, load_str, load_value};
pub use protocol::{Context, ContextField, Protocol};
pub use ty::{TypeKind, TypeRecord};
