//! Type-directed expression checking.
//!
//! Given an expression and the type of `this`, computes the expression's
//! type bottom-up or fails. One function per expression case; the
//! dispatcher is a single exhaustive match. Type equality is by name.
//!
//! Constant literals are not checked against their declared type here --
//! whether `47` fits a 4-bit string is a question for evaluation stages.

use pdl_ast::{Argument, Expr};

use crate::error::TypeError;
use crate::protocol::Protocol;
use crate::ty::TypeKind;

/// Check `expr` in the context of `this_ty` (the type `this` refers to)
/// and return the expression's type name.
pub fn check_expr(protocol: &Protocol, expr: &Expr, this_ty: &str) -> Result<String, TypeError> {
    match expr {
        Expr::This => Ok(this_ty.to_string()),
        Expr::Constant { ty, .. } => check_constant(protocol, ty),
        Expr::FieldAccess { target, field } => check_field_access(protocol, target, field, this_ty),
        Expr::ContextAccess { field } => check_context_access(protocol, field),
        Expr::MethodInvocation { target, method, arguments } => {
            check_method_invocation(protocol, target, method, arguments, this_ty)
        }
        Expr::FunctionInvocation { name, arguments } => {
            check_function_invocation(protocol, name, arguments, this_ty)
        }
        Expr::IfElse { condition, if_true, if_false } => {
            check_if_else(protocol, condition, if_true, if_false, this_ty)
        }
    }
}

fn check_constant(protocol: &Protocol, ty: &str) -> Result<String, TypeError> {
    if protocol.get_type(ty).is_none() {
        return Err(TypeError::UnknownType { name: ty.to_string() });
    }
    Ok(ty.to_string())
}

fn check_field_access(
    protocol: &Protocol,
    target: &Expr,
    field: &str,
    this_ty: &str,
) -> Result<String, TypeError> {
    let target_ty = check_expr(protocol, target, this_ty)?;
    let record = protocol
        .get_type(&target_ty)
        .ok_or_else(|| TypeError::UnknownType { name: target_ty.clone() })?;
    if record.fields().is_none() {
        return Err(TypeError::NotAStruct { ty: target_ty });
    }
    match record.field(field) {
        Some(f) => Ok(f.ty.clone()),
        None => Err(TypeError::UnknownField { ty: target_ty, field: field.to_string() }),
    }
}

fn check_context_access(protocol: &Protocol, field: &str) -> Result<String, TypeError> {
    match protocol.context().get(field) {
        Some(ctx_field) => Ok(ctx_field.ty.clone()),
        None => Err(TypeError::UnknownContextField { field: field.to_string() }),
    }
}

fn check_method_invocation(
    protocol: &Protocol,
    target: &Expr,
    method: &str,
    arguments: &[Argument],
    this_ty: &str,
) -> Result<String, TypeError> {
    let target_ty = check_expr(protocol, target, this_ty)?;
    let record = protocol
        .get_type(&target_ty)
        .ok_or_else(|| TypeError::UnknownType { name: target_ty.clone() })?;
    let sig = record.method(method).ok_or_else(|| TypeError::UnknownMethod {
        ty: target_ty.clone(),
        method: method.to_string(),
    })?;
    let callee = format!("{}.{}", target_ty, method);
    // The leading self parameter is bound by the target, not an argument.
    let params: Vec<(&str, &str)> = sig.params[1..]
        .iter()
        .map(|p| (p.name.as_str(), p.ty.as_str()))
        .collect();
    check_arguments(protocol, &callee, &params, arguments, this_ty)?;
    Ok(sig.ret.clone())
}

fn check_function_invocation(
    protocol: &Protocol,
    name: &str,
    arguments: &[Argument],
    this_ty: &str,
) -> Result<String, TypeError> {
    let record = protocol
        .get_type(name)
        .ok_or_else(|| TypeError::UnknownFunction { name: name.to_string() })?;
    let TypeKind::Function { parameters, return_type } = &record.kind else {
        return Err(TypeError::NotAFunction { name: name.to_string() });
    };
    let params: Vec<(&str, &str)> = parameters
        .iter()
        .map(|p| (p.name.as_str(), p.ty.as_str()))
        .collect();
    check_arguments(protocol, name, &params, arguments, this_ty)?;
    Ok(return_type.clone())
}

/// Match actual arguments against declared parameters: same count, same
/// names position by position, same types.
fn check_arguments(
    protocol: &Protocol,
    callee: &str,
    params: &[(&str, &str)],
    arguments: &[Argument],
    this_ty: &str,
) -> Result<(), TypeError> {
    if params.len() != arguments.len() {
        return Err(TypeError::ArityMismatch {
            callee: callee.to_string(),
            expected: params.len(),
            found: arguments.len(),
        });
    }
    for (&(param_name, param_ty), argument) in params.iter().zip(arguments) {
        if argument.name != param_name {
            return Err(TypeError::ArgumentNameMismatch {
                callee: callee.to_string(),
                expected: param_name.to_string(),
                found: argument.name.clone(),
            });
        }
        let found = check_expr(protocol, &argument.value, this_ty)?;
        if found != param_ty {
            return Err(TypeError::ArgumentTypeMismatch {
                callee: callee.to_string(),
                param: param_name.to_string(),
                expected: param_ty.to_string(),
                found,
            });
        }
    }
    Ok(())
}

fn check_if_else(
    protocol: &Protocol,
    condition: &Expr,
    if_true: &Expr,
    if_false: &Expr,
    this_ty: &str,
) -> Result<String, TypeError> {
    let condition_ty = check_expr(protocol, condition, this_ty)?;
    if condition_ty != "Boolean" {
        return Err(TypeError::ConditionNotBoolean { found: condition_ty });
    }
    let true_ty = check_expr(protocol, if_true, this_ty)?;
    let false_ty = check_expr(protocol, if_false, this_ty)?;
    if true_ty != false_ty {
        return Err(TypeError::BranchMismatch { if_true: true_ty, if_false: false_ty });
    }
    Ok(true_ty)
}
