use std::mem;

use log::debug;

use crate::{
    ast::{
        ast::AstNode,
        types::{is_convertible, TypeDesc},
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// Whether `expr` needs a conversion wrapper to become `type_`.
///
/// Errors are reported at `blame` when given, at `expr` otherwise.
fn needs_conversion(
    expr: &AstNode,
    type_: &TypeDesc,
    blame: Option<Position>,
    context: Option<&str>,
) -> Result<bool, Error> {
    let position = Some(blame.unwrap_or(expr.position));

    let Some(from) = &expr.node_type else {
        return Err(Error::new(ErrorImpl::UnresolvedType, position));
    };

    if from == type_ {
        Ok(false)
    } else if is_convertible(from, type_) {
        Ok(true)
    } else {
        Err(Error::new(
            ErrorImpl::InconvertibleType {
                from: from.to_string(),
                to: type_.to_string(),
                context: context.map(String::from),
            },
            position,
        ))
    }
}

/// Converts a checked expression to `type_`.
///
/// Returns `expr` itself when it already has that type, or `expr` wrapped
/// in a conversion node when the lattice has a direct edge to `type_`.
pub fn type_convert(
    expr: AstNode,
    type_: &TypeDesc,
    blame: Option<Position>,
    context: Option<&str>,
) -> Result<AstNode, Error> {
    if needs_conversion(&expr, type_, blame, context)? {
        debug!("converting {} to {}", expr.label(), type_);
        Ok(AstNode::type_convert(expr, type_.clone()))
    } else {
        Ok(expr)
    }
}

/// [`type_convert`] applied to a child in place. The slot is left untouched on error.
pub fn convert_slot(
    slot: &mut AstNode,
    type_: &TypeDesc,
    blame: Option<Position>,
    context: Option<&str>,
) -> Result<(), Error> {
    if needs_conversion(slot, type_, blame, context)? {
        debug!("converting {} to {}", slot.label(), type_);
        let position = slot.position;
        let expr = mem::replace(slot, AstNode::empty(position));
        *slot = AstNode::type_convert(expr, type_.clone());
    }
    Ok(())
}
