//! The protocol object: the canonical registry of types and traits.
//!
//! All cross-references in the IR are by name and resolve through this
//! single store; records never point at each other. The loader is the
//! only writer -- after `load` returns, the protocol is immutable apart
//! from the context's value slots, which exist for later evaluation
//! stages and are never written here.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::builtins;
use crate::error::TypeError;
use crate::traits::TraitDef;
use crate::ty::{is_item_name, is_type_name, TypeKind, TypeRecord};

/// Protocol-wide mutable slots, typed like fields. The IR registers them;
/// evaluation stages read and write the values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Context {
    fields: BTreeMap<String, ContextField>,
}

/// A single context field. `value` starts unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextField {
    pub ty: String,
    pub value: Option<Value>,
}

impl Context {
    /// Look up a context field by name.
    pub fn get(&self, name: &str) -> Option<&ContextField> {
        self.fields.get(name)
    }

    /// Iterate fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ContextField)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Assign a field's current value. For evaluation stages; the loader
    /// never calls this.
    pub fn set_value(&mut self, name: &str, value: Value) -> Result<(), TypeError> {
        match self.fields.get_mut(name) {
            Some(field) => {
                field.value = Some(value);
                Ok(())
            }
            None => Err(TypeError::UnknownContextField { field: name.to_string() }),
        }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub(crate) fn insert(&mut self, name: String, ty: String) {
        self.fields.insert(name, ContextField { ty, value: None });
    }
}

/// The loaded IR: name, type table, trait table, context, and PDU list.
///
/// Tables are keyed maps with sorted iteration, so two loads of the same
/// document compare equal and serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Protocol {
    name: String,
    types: BTreeMap<String, TypeRecord>,
    traits: BTreeMap<String, TraitDef>,
    context: Context,
    pdus: Vec<String>,
}

impl Protocol {
    /// Create a protocol holding only the primitive types and built-in
    /// traits. Fails if `name` is not a legal type name.
    pub fn new(name: &str) -> Result<Self, TypeError> {
        if !is_type_name(name) {
            return Err(TypeError::MalformedTypeName { name: name.to_string() });
        }
        let mut protocol = Protocol {
            name: name.to_string(),
            types: BTreeMap::new(),
            traits: BTreeMap::new(),
            context: Context::default(),
            pdus: Vec::new(),
        };
        builtins::register(&mut protocol)?;
        Ok(protocol)
    }

    // ── Registry operations ────────────────────────────────────────────

    /// Register a fresh type record.
    ///
    /// Function types carry lowercase names; every other kind carries a
    /// type name. The name must not collide with any existing type or
    /// trait.
    pub fn define_type(&mut self, record: TypeRecord) -> Result<(), TypeError> {
        let is_function = matches!(record.kind, TypeKind::Function { .. });
        let legal = if is_function {
            is_item_name(&record.name)
        } else {
            is_type_name(&record.name)
        };
        if !legal {
            return Err(if is_function {
                TypeError::MalformedName { name: record.name }
            } else {
                TypeError::MalformedTypeName { name: record.name }
            });
        }
        if self.types.contains_key(&record.name) || self.traits.contains_key(&record.name) {
            return Err(TypeError::DuplicateDefinition { name: record.name });
        }
        self.types.insert(record.name.clone(), record);
        Ok(())
    }

    /// Register a trait definition.
    ///
    /// Every method must lead with the `("self", None)` placeholder, and
    /// every concrete parameter or return type must already be
    /// registered.
    pub fn define_trait(&mut self, def: TraitDef) -> Result<(), TypeError> {
        if !is_type_name(&def.name) {
            return Err(TypeError::MalformedTypeName { name: def.name });
        }
        if self.types.contains_key(&def.name) || self.traits.contains_key(&def.name) {
            return Err(TypeError::DuplicateDefinition { name: def.name });
        }
        for method in &def.methods {
            if !is_item_name(&method.name) {
                return Err(TypeError::MalformedName { name: method.name.clone() });
            }
            match method.params.first() {
                Some(first) if first.name == "self" && first.ty.is_none() => {}
                _ => {
                    return Err(TypeError::MissingSelfParameter {
                        trait_name: def.name,
                        method: method.name.clone(),
                    })
                }
            }
            for param in &method.params[1..] {
                if !is_item_name(&param.name) {
                    return Err(TypeError::MalformedName { name: param.name.clone() });
                }
                if let Some(ty) = &param.ty {
                    if !self.types.contains_key(ty) {
                        return Err(TypeError::UnknownType { name: ty.clone() });
                    }
                }
            }
            if let Some(ret) = &method.ret {
                if !self.types.contains_key(ret) {
                    return Err(TypeError::UnknownType { name: ret.clone() });
                }
            }
        }
        self.traits.insert(def.name.clone(), def);
        Ok(())
    }

    /// Implement the named traits on a type, in the given order.
    ///
    /// Each trait's methods are materialized onto the type with the self
    /// placeholder replaced. A trait may be implemented at most once, and
    /// implementing it never overwrites an existing method.
    pub fn implement(&mut self, type_name: &str, trait_names: &[&str]) -> Result<(), TypeError> {
        if !self.types.contains_key(type_name) {
            return Err(TypeError::UnknownType { name: type_name.to_string() });
        }
        for &trait_name in trait_names {
            let def = match self.traits.get(trait_name) {
                Some(def) => def.clone(),
                None => return Err(TypeError::UnknownTrait { name: trait_name.to_string() }),
            };
            let record = self
                .types
                .get_mut(type_name)
                .ok_or_else(|| TypeError::UnknownType { name: type_name.to_string() })?;
            if record.implements_trait(trait_name) {
                return Err(TypeError::TraitAlreadyImplemented {
                    ty: type_name.to_string(),
                    trait_name: trait_name.to_string(),
                });
            }
            for method in &def.methods {
                if record.methods.contains_key(&method.name) {
                    return Err(TypeError::MethodAlreadyDefined {
                        ty: type_name.to_string(),
                        method: method.name.clone(),
                    });
                }
            }
            for method in &def.methods {
                record
                    .methods
                    .insert(method.name.clone(), method.materialize(type_name));
            }
            record.implements.push(trait_name.to_string());
            record.implements.sort();
        }
        Ok(())
    }

    pub(crate) fn set_pdus(&mut self, pdus: Vec<String>) {
        self.pdus = pdus;
    }

    pub(crate) fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    // ── Consumer surface ───────────────────────────────────────────────

    /// The protocol's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a type by name.
    pub fn get_type(&self, name: &str) -> Option<&TypeRecord> {
        self.types.get(name)
    }

    /// Look up a trait by name.
    pub fn get_trait(&self, name: &str) -> Option<&TraitDef> {
        self.traits.get(name)
    }

    /// Iterate all registered types in name order.
    pub fn types(&self) -> impl Iterator<Item = &TypeRecord> {
        self.types.values()
    }

    /// Iterate all registered traits in name order.
    pub fn traits(&self) -> impl Iterator<Item = &TraitDef> {
        self.traits.values()
    }

    /// The sorted PDU list.
    pub fn pdus(&self) -> &[String] {
        &self.pdus
    }

    /// The protocol context.
    pub fn context(&self) -> &Context {
        &self.context
    }
}
