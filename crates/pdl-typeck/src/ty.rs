//! Type records and the kind algebra of the protocol IR.
//!
//! Every registered type is a `TypeRecord`: a name, a `TypeKind` carrying
//! the kind-specific payload (bit widths, fields, variants, signatures),
//! the sorted list of implemented traits, and the table of materialized
//! methods. Sizes are bit counts; `None` means unknown or unsized, and it
//! propagates through arrays and structs.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use pdl_ast::Expr;

// ── Name patterns ──────────────────────────────────────────────────────

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '$' || c == '_'
}

/// Whether `name` matches the type-name pattern `[A-Z][A-Za-z0-9$_]+`.
pub fn is_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && name.len() >= 2
        && chars.all(is_name_char)
}

/// Whether `name` matches the field/function-name pattern
/// `[a-z][A-Za-z0-9$_]+`. Also used for methods, parameters, and context
/// fields.
pub fn is_item_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && name.len() >= 2
        && chars.all(is_name_char)
}

// ── Kinds ──────────────────────────────────────────────────────────────

/// The kind of a registered type, with its kind-specific payload.
///
/// A derived type (newtype) clones its base's kind wholesale, so a
/// newtype over a 16-bit string reads as `BitString { size: 16 }`
/// downstream -- only the name, method table, and trait list are fresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum TypeKind {
    Nothing,
    Boolean,
    Size,
    FieldName,
    BitString {
        size: u64,
    },
    Array {
        element_type: String,
        length: Option<u64>,
        size: Option<u64>,
    },
    Struct {
        fields: Vec<StructField>,
        constraints: Vec<Expr>,
        actions: Vec<Expr>,
        size: Option<u64>,
    },
    /// A tagged union. Its size depends on the instantiated variant and
    /// is therefore always unknown. Variants are kept sorted.
    Enum {
        variants: Vec<String>,
    },
    Function {
        parameters: Vec<FunctionParam>,
        return_type: String,
    },
}

impl TypeKind {
    /// The kind tag as it appears to downstream consumers.
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Nothing => "Nothing",
            TypeKind::Boolean => "Boolean",
            TypeKind::Size => "Size",
            TypeKind::FieldName => "FieldName",
            TypeKind::BitString { .. } => "BitString",
            TypeKind::Array { .. } => "Array",
            TypeKind::Struct { .. } => "Struct",
            TypeKind::Enum { .. } => "Enum",
            TypeKind::Function { .. } => "Function",
        }
    }

    /// The bit width of values of this kind, when known.
    pub fn size(&self) -> Option<u64> {
        match self {
            TypeKind::BitString { size } => Some(*size),
            TypeKind::Array { size, .. } => *size,
            TypeKind::Struct { size, .. } => *size,
            TypeKind::Nothing
            | TypeKind::Boolean
            | TypeKind::Size
            | TypeKind::FieldName
            | TypeKind::Enum { .. }
            | TypeKind::Function { .. } => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One field of a struct, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructField {
    pub name: String,
    pub ty: String,
    /// Boolean-typed predicate deciding whether the field is present.
    pub is_present: Expr,
    pub transform: Option<Transform>,
}

/// A validated field reinterpretation. `using` names a registered function
/// from the field's type to `into_type`, of identical bit width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transform {
    pub into_name: String,
    pub into_type: String,
    pub using: String,
}

/// A named, typed parameter of a function type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionParam {
    pub name: String,
    pub ty: String,
}

// ── Materialized methods ───────────────────────────────────────────────

/// A concrete method on a type, produced by trait implementation.
///
/// All placeholders are resolved: the leading `self` parameter and any
/// self-typed parameters or return carry the implementing type's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: String,
}

/// A parameter of a materialized method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", p.name, p.ty)?;
        }
        write!(f, ") -> {}", self.ret)
    }
}

// ── Type records ───────────────────────────────────────────────────────

/// A registered type: the unit of the IR.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRecord {
    pub name: String,
    pub kind: TypeKind,
    /// Implemented trait names, kept sorted and duplicate-free.
    pub implements: Vec<String>,
    /// Materialized methods, keyed by method name.
    pub methods: BTreeMap<String, Method>,
}

impl TypeRecord {
    /// A fresh record with no traits and no methods.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        TypeRecord {
            name: name.into(),
            kind,
            implements: Vec::new(),
            methods: BTreeMap::new(),
        }
    }

    /// The kind tag, e.g. `"BitString"`.
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// The bit width of values of this type, when known.
    pub fn size(&self) -> Option<u64> {
        self.kind.size()
    }

    /// Whether this type implements the named trait.
    pub fn implements_trait(&self, trait_name: &str) -> bool {
        self.implements.iter().any(|t| t == trait_name)
    }

    /// Look up a materialized method by name.
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    /// The struct fields, if this is a struct.
    pub fn fields(&self) -> Option<&[StructField]> {
        match &self.kind {
            TypeKind::Struct { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Look up a struct field by name.
    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields()?.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_name_pattern() {
        assert!(is_type_name("SeqNum"));
        assert!(is_type_name("Bits16"));
        assert!(is_type_name("A$_9"));
        assert!(!is_type_name("X")); // single character
        assert!(!is_type_name("seqNum")); // lowercase start
        assert!(!is_type_name("Seq-Num")); // illegal character
        assert!(!is_type_name(""));
    }

    #[test]
    fn item_name_pattern() {
        assert!(is_item_name("seq"));
        assert!(is_item_name("eq"));
        assert!(is_item_name("payload_length"));
        assert!(!is_item_name("s")); // single character
        assert!(!is_item_name("Seq")); // uppercase start
        assert!(!is_item_name("seq num"));
    }

    #[test]
    fn unknown_sizes_propagate() {
        let array = TypeKind::Array {
            element_type: "Octet".into(),
            length: None,
            size: None,
        };
        assert_eq!(array.size(), None);
        assert_eq!(TypeKind::Enum { variants: vec![] }.size(), None);
        assert_eq!(TypeKind::BitString { size: 32 }.size(), Some(32));
    }

    #[test]
    fn method_display() {
        let method = Method {
            name: "eq".into(),
            params: vec![
                Param { name: "self".into(), ty: "SeqNum".into() },
                Param { name: "other".into(), ty: "SeqNum".into() },
            ],
            ret: "Boolean".into(),
        };
        assert_eq!(method.to_string(), "eq(self: SeqNum, other: SeqNum) -> Boolean");
    }
}
