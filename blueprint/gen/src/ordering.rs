//! Declaration order recovery.
//!
//! Types and endpoints arrive as maps. Output follows their recorded
//! source lines instead, with ties broken lexically by name (maps iterate
//! in name order and the sort is stable).

use std::collections::BTreeMap;

use blueprint_define::{EndpointDef, TypeDef, TypeKind};
use tracing::debug;

use crate::errors::GeneratorError;

/// Ordering line for parameterless endpoints whose name starts with `get`.
const PARAMETERLESS_GET_LINE: i32 = -1;

/// Ordering line for other parameterless endpoints.
const PARAMETERLESS_LINE: i32 = 0;

/// Returns the representative source line of a type.
///
/// - primitives and references use their own line
/// - lists and sets use the element's line, falling back to their own
/// - tuples use the line of their first field by name
pub fn type_line(name: &str, ty: &TypeDef) -> Result<i32, GeneratorError> {
    let missing = || GeneratorError::MissingPosition(name.to_string());
    match &ty.kind {
        TypeKind::Primitive(_) | TypeKind::Reference(_) => ty.line.ok_or_else(missing),
        TypeKind::List(inner) | TypeKind::Set(inner) => inner.line.or(ty.line).ok_or_else(missing),
        TypeKind::Tuple(fields) => match fields.iter().next() {
            Some((field, def)) => type_line(&format!("{}.{}", name, field), def),
            None => Err(missing()),
        },
    }
}

/// Names of `types` in ascending source-line order.
///
/// ## Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use blueprint_define::{Primitive, TypeDef};
/// use blueprint_gen::ordering::type_order;
///
/// let mut fields = BTreeMap::new();
/// fields.insert("A".to_string(), TypeDef::primitive(Primitive::Int).at(9));
/// fields.insert("B".to_string(), TypeDef::primitive(Primitive::Int).at(3));
///
/// assert_eq!(type_order(&fields).unwrap(), vec!["B", "A"]);
/// ```
pub fn type_order(types: &BTreeMap<String, TypeDef>) -> Result<Vec<&str>, GeneratorError> {
    let lines = types
        .iter()
        .map(|(name, ty)| type_line(name, ty).map(|line| (name.as_str(), line)))
        .collect::<Result<Vec<_>, GeneratorError>>()?;
    Ok(sort_by_line(lines))
}

/// Returns the ordering line of an endpoint.
///
/// This is the line of its first path or query parameter. Endpoints
/// without parameters sort at -1 when their name starts with `get`
/// (case-insensitive) and at 0 otherwise.
pub fn endpoint_line(endpoint: &EndpointDef) -> i32 {
    match endpoint.rest_params.first() {
        Some(param) => param.ty.line.unwrap_or(PARAMETERLESS_LINE),
        None if endpoint.name.to_lowercase().starts_with("get") => PARAMETERLESS_GET_LINE,
        None => PARAMETERLESS_LINE,
    }
}

/// Endpoint names in ordering-line order.
pub fn endpoint_order(endpoints: &BTreeMap<String, EndpointDef>) -> Vec<&str> {
    let lines = endpoints
        .iter()
        .map(|(name, ep)| (name.as_str(), endpoint_line(ep)))
        .collect();
    let order = sort_by_line(lines);
    debug!(?order, "resolved endpoint order");
    order
}

fn sort_by_line(mut lines: Vec<(&str, i32)>) -> Vec<&str> {
    lines.sort_by_key(|(_, line)| *line);
    lines.into_iter().map(|(name, _)| name).collect()
}
