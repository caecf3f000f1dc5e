//! Type constructors: one per definition kind.
//!
//! Each constructor validates its definition, synthesizes a type record,
//! registers it, and records any implemented traits. Definitions may only
//! reference types registered before them; the loader calls these in
//! document order.

use std::collections::BTreeSet;

use pdl_ast::{
    ArrayDef, BitStringDef, ContextDef, EnumDef, FieldDef, FunctionDef, NewTypeDef, StructDef,
    TransformDef,
};

use crate::check::check_expr;
use crate::error::TypeError;
use crate::protocol::Protocol;
use crate::ty::{is_item_name, is_type_name, FunctionParam, StructField, Transform, TypeKind, TypeRecord};

impl Protocol {
    /// Define a fixed-width bit string. Implements `Value` and `Equality`.
    pub fn define_bit_string(&mut self, def: &BitStringDef) -> Result<(), TypeError> {
        if def.size == 0 {
            return Err(TypeError::InvalidBitStringSize { name: def.name.clone() });
        }
        self.define_type(TypeRecord::new(&def.name, TypeKind::BitString { size: def.size }))?;
        self.implement(&def.name, &["Value", "Equality"])
    }

    /// Define an array over a registered element type. Implements
    /// `Equality` and `IndexCollection`. The size is known only when both
    /// the element size and the length are.
    pub fn define_array(&mut self, def: &ArrayDef) -> Result<(), TypeError> {
        let element_size = match self.get_type(&def.element_type) {
            Some(element) => element.size(),
            None => return Err(TypeError::UnknownType { name: def.element_type.clone() }),
        };
        let size = match (element_size, def.length) {
            (Some(element), Some(length)) => element.checked_mul(length),
            _ => None,
        };
        self.define_type(TypeRecord::new(
            &def.name,
            TypeKind::Array {
                element_type: def.element_type.clone(),
                length: def.length,
                size,
            },
        ))?;
        self.implement(&def.name, &["Equality", "IndexCollection"])
    }

    /// Define a struct.
    ///
    /// The record is registered with its declared fields first, so that
    /// presence predicates, transforms, constraints, and actions can
    /// reference `this.field` -- including fields declared later. The
    /// struct's size is the sum of the declared (pre-transform) field
    /// sizes, unknown as soon as one field's size is.
    pub fn define_struct(&mut self, def: &StructDef) -> Result<(), TypeError> {
        let mut fields: Vec<StructField> = Vec::with_capacity(def.fields.len());
        let mut size = Some(0u64);
        for field in &def.fields {
            if !is_item_name(&field.name) {
                return Err(TypeError::MalformedName { name: field.name.clone() });
            }
            if fields.iter().any(|f| f.name == field.name) {
                return Err(TypeError::DuplicateField {
                    ty: def.name.clone(),
                    field: field.name.clone(),
                });
            }
            let field_size = match self.get_type(&field.ty) {
                Some(record) => record.size(),
                None => return Err(TypeError::UnknownType { name: field.ty.clone() }),
            };
            size = match (size, field_size) {
                (Some(total), Some(field_size)) => total.checked_add(field_size),
                _ => None,
            };
            fields.push(StructField {
                name: field.name.clone(),
                ty: field.ty.clone(),
                is_present: field.is_present.clone(),
                transform: field.transform.as_ref().map(|t| Transform {
                    into_name: t.into_name.clone(),
                    into_type: t.into_type.clone(),
                    using: t.using.clone(),
                }),
            });
        }
        self.define_type(TypeRecord::new(
            &def.name,
            TypeKind::Struct {
                fields,
                constraints: def.constraints.clone(),
                actions: def.actions.clone(),
                size,
            },
        ))?;

        let mut transform_targets: Vec<String> = Vec::new();
        for field in &def.fields {
            let found = check_expr(self, &field.is_present, &def.name)?;
            if found != "Boolean" {
                return Err(TypeError::PresenceNotBoolean { field: field.name.clone(), found });
            }
            if let Some(transform) = &field.transform {
                self.check_transform(&def.name, field, transform, &transform_targets)?;
                transform_targets.push(transform.into_name.clone());
            }
        }
        for constraint in &def.constraints {
            let found = check_expr(self, constraint, &def.name)?;
            if found != "Boolean" {
                return Err(TypeError::ConstraintNotBoolean { ty: def.name.clone(), found });
            }
        }
        for action in &def.actions {
            let found = check_expr(self, action, &def.name)?;
            if found != "Nothing" {
                return Err(TypeError::ActionNotNothing { ty: def.name.clone(), found });
            }
        }
        Ok(())
    }

    /// Validate a field transform against the registered struct: target
    /// name fresh across declared fields and earlier transform targets,
    /// target type registered, `using` a single-parameter function from
    /// the field's type to the target type, bit widths identical.
    fn check_transform(
        &self,
        struct_name: &str,
        field: &FieldDef,
        transform: &TransformDef,
        earlier_targets: &[String],
    ) -> Result<(), TypeError> {
        if !is_item_name(&transform.into_name) {
            return Err(TypeError::MalformedName { name: transform.into_name.clone() });
        }
        let strukt = self
            .get_type(struct_name)
            .ok_or_else(|| TypeError::UnknownType { name: struct_name.to_string() })?;
        if strukt.field(&transform.into_name).is_some()
            || earlier_targets.iter().any(|t| t == &transform.into_name)
        {
            return Err(TypeError::DuplicateField {
                ty: struct_name.to_string(),
                field: transform.into_name.clone(),
            });
        }
        let into_size = match self.get_type(&transform.into_type) {
            Some(record) => record.size(),
            None => return Err(TypeError::UnknownType { name: transform.into_type.clone() }),
        };
        let using = self
            .get_type(&transform.using)
            .ok_or_else(|| TypeError::UnknownFunction { name: transform.using.clone() })?;
        let TypeKind::Function { parameters, return_type } = &using.kind else {
            return Err(TypeError::NotAFunction { name: transform.using.clone() });
        };
        if parameters.len() != 1 || parameters[0].ty != field.ty {
            return Err(TypeError::TransformParameterMismatch {
                using: transform.using.clone(),
                expected: field.ty.clone(),
            });
        }
        if *return_type != transform.into_type {
            return Err(TypeError::TransformReturnMismatch {
                using: transform.using.clone(),
                expected: transform.into_type.clone(),
                found: return_type.clone(),
            });
        }
        let from_size = self.get_type(&field.ty).and_then(|record| record.size());
        if from_size != into_size {
            return Err(TypeError::TransformSizeMismatch {
                field: field.name.clone(),
                from_size,
                into_size,
            });
        }
        Ok(())
    }

    /// Define a tagged union over registered variant types. Variants are
    /// stored sorted; the size is unknown until instantiation.
    pub fn define_enum(&mut self, def: &EnumDef) -> Result<(), TypeError> {
        let mut variants = Vec::with_capacity(def.variants.len());
        for variant in &def.variants {
            if self.get_type(&variant.ty).is_none() {
                return Err(TypeError::UnknownType { name: variant.ty.clone() });
            }
            variants.push(variant.ty.clone());
        }
        variants.sort();
        self.define_type(TypeRecord::new(&def.name, TypeKind::Enum { variants }))
    }

    /// Define a derived type: the base's kind under a fresh name, with a
    /// fresh method table and the union of the base's traits and any
    /// additionally listed ones.
    pub fn define_new_type(&mut self, def: &NewTypeDef) -> Result<(), TypeError> {
        let (kind, mut traits) = match self.get_type(&def.derived_from) {
            Some(base) => (
                base.kind.clone(),
                base.implements.iter().cloned().collect::<BTreeSet<String>>(),
            ),
            None => return Err(TypeError::UnknownType { name: def.derived_from.clone() }),
        };
        traits.extend(def.implements.iter().cloned());
        self.define_type(TypeRecord::new(&def.name, kind))?;
        let trait_names: Vec<&str> = traits.iter().map(String::as_str).collect();
        self.implement(&def.name, &trait_names)
    }

    /// Define a pure function type: named parameters over registered
    /// types and a registered return type.
    pub fn define_function(&mut self, def: &FunctionDef) -> Result<(), TypeError> {
        let mut parameters: Vec<FunctionParam> = Vec::with_capacity(def.parameters.len());
        for param in &def.parameters {
            if !is_item_name(&param.name) {
                return Err(TypeError::MalformedName { name: param.name.clone() });
            }
            if parameters.iter().any(|p| p.name == param.name) {
                return Err(TypeError::DuplicateParameter {
                    function: def.name.clone(),
                    param: param.name.clone(),
                });
            }
            if self.get_type(&param.ty).is_none() {
                return Err(TypeError::UnknownType { name: param.ty.clone() });
            }
            parameters.push(FunctionParam { name: param.name.clone(), ty: param.ty.clone() });
        }
        if !is_type_name(&def.return_type) {
            return Err(TypeError::MalformedTypeName { name: def.return_type.clone() });
        }
        if self.get_type(&def.return_type).is_none() {
            return Err(TypeError::UnknownType { name: def.return_type.clone() });
        }
        self.define_type(TypeRecord::new(
            &def.name,
            TypeKind::Function { parameters, return_type: def.return_type.clone() },
        ))
    }

    /// Merge context field declarations into the protocol context.
    /// Values start unset.
    pub fn extend_context(&mut self, def: &ContextDef) -> Result<(), TypeError> {
        for field in &def.fields {
            if !is_item_name(&field.name) {
                return Err(TypeError::MalformedName { name: field.name.clone() });
            }
            if self.context().contains(&field.name) {
                return Err(TypeError::DuplicateContextField { field: field.name.clone() });
            }
            if self.get_type(&field.ty).is_none() {
                return Err(TypeError::UnknownType { name: field.ty.clone() });
            }
            self.context_mut().insert(field.name.clone(), field.ty.clone());
        }
        Ok(())
    }
}
