//! Service method signature inference.
//!
//! Parameters come from an endpoint's path/query parameters followed by its
//! body; the return shape comes from the first statement that decides it.

use std::str::FromStr;
use std::sync::LazyLock;

use blueprint_define::{Application, EndpointDef, Param, Primitive, Statement, TypeKind};
use regex::Regex;

use crate::errors::GeneratorError;
use crate::type_mapper::{MAP_PREFIX, map_type, resolve_name, simple_type};

/// Inline refinement syntax `{name <: Type}` inside a mapped type.
static REFINEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\{\s*(\w+)\s*<:\s*(\w+)\s*\}\s*$").expect("refinement pattern is valid")
});

/// Where a handler finds a parameter's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Captured from the path template into the request context.
    Path,
    /// Read from the query string.
    Query,
    /// Deserialized from the JSON request body.
    Body,
}

/// One parameter of a service method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParam {
    /// The parameter name as written in the schema; the lookup key for its value.
    pub source: String,
    /// The name used in the generated signature.
    pub name: String,
    /// Rust type expression.
    pub ty: String,
    pub binding: Binding,
}

/// What a service method returns besides its error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape {
    Nothing,
    /// A payload of the named type.
    Value(String),
}

/// Classifies a path or query parameter.
///
/// References are path-bound, primitives are query-bound; anything else
/// cannot be carried by a URL.
pub fn binding_of(endpoint: &EndpointDef, param: &Param) -> Result<Binding, GeneratorError> {
    match param.ty.kind {
        TypeKind::Reference(_) => Ok(Binding::Path),
        TypeKind::Primitive(_) => Ok(Binding::Query),
        _ => Err(GeneratorError::UnsupportedParameter {
            endpoint: endpoint.name.clone(),
            param: param.name.clone(),
        }),
    }
}

/// Classifies a path or query parameter of an endpoint in `app` and checks
/// that handlers can parse its value from URL text.
///
/// Rejected are the `bytes` and `empty` primitives, `map of` references,
/// and references naming one of the application's records.
///
/// ## Examples
///
/// ```
/// use blueprint_define::{Application, EndpointDef, Primitive, TypeDef};
/// use blueprint_gen::inference::{Binding, url_binding};
///
/// let ep = EndpointDef::new("GET /files/{id}")
///     .rest_param("id", TypeDef::reference("{id <: int}"))
///     .rest_param("raw", TypeDef::primitive(Primitive::Bytes))
///     .returns("File");
/// let app = Application::new("Files");
///
/// assert_eq!(url_binding(&app, &ep, &ep.rest_params[0]).unwrap(), Binding::Path);
/// assert!(url_binding(&app, &ep, &ep.rest_params[1]).is_err());
/// ```
pub fn url_binding(
    app: &Application,
    endpoint: &EndpointDef,
    param: &Param,
) -> Result<Binding, GeneratorError> {
    let binding = binding_of(endpoint, param)?;
    let unsupported = || GeneratorError::UnsupportedParameter {
        endpoint: endpoint.name.clone(),
        param: param.name.clone(),
    };

    let primitive = match &param.ty.kind {
        TypeKind::Primitive(primitive) => Some(*primitive),
        TypeKind::Reference(path) => {
            let joined = path.join(".");
            let name = match REFINEMENT.captures(&joined).and_then(|caps| caps.get(2)) {
                Some(refined) => refined.as_str(),
                None => joined.as_str(),
            };
            if name.starts_with(MAP_PREFIX) || app.types.contains_key(name) {
                return Err(unsupported());
            }
            Primitive::from_str(name).ok()
        }
        _ => None,
    };

    match primitive {
        Some(Primitive::Bytes | Primitive::Empty) => Err(unsupported()),
        _ => Ok(binding),
    }
}

/// Infers the parameters of an endpoint's service method.
///
/// ## Examples
///
/// ```
/// use blueprint_define::{EndpointDef, TypeDef};
/// use blueprint_gen::inference::{Binding, method_params};
///
/// let ep = EndpointDef::new("PUT /refdata/{key}")
///     .rest_param("key", TypeDef::reference("{key <: string}"))
///     .body("data", TypeDef::reference("RefData"))
///     .returns_nothing();
///
/// let params = method_params(&ep).unwrap();
/// assert_eq!(params[0].ty, "String");
/// assert_eq!(params[0].binding, Binding::Path);
/// assert_eq!(params[1].ty, "RefData");
/// assert_eq!(params[1].binding, Binding::Body);
/// ```
pub fn method_params(endpoint: &EndpointDef) -> Result<Vec<MethodParam>, GeneratorError> {
    let mut params = Vec::with_capacity(endpoint.rest_params.len() + 1);

    for param in &endpoint.rest_params {
        let binding = binding_of(endpoint, param)?;
        let mapped = map_type(&param.ty)?;
        let (name, ty) = match REFINEMENT.captures(&mapped) {
            Some(caps) => (caps[1].to_string(), resolve_name(&caps[2])?),
            None => (param.name.clone(), mapped),
        };
        params.push(MethodParam {
            source: param.name.clone(),
            name,
            ty,
            binding,
        });
    }

    if let Some(body) = &endpoint.body {
        if !matches!(body.ty.kind, TypeKind::Reference(_)) {
            return Err(GeneratorError::BodyNotReference {
                endpoint: endpoint.name.clone(),
                param: body.name.clone(),
            });
        }
        params.push(MethodParam {
            source: body.name.clone(),
            name: body.name.clone(),
            ty: simple_type(&body.ty)?,
            binding: Binding::Body,
        });
    }

    Ok(params)
}

/// Infers the return shape from the endpoint's statements.
///
/// The first bare `return` or typed return decides; an endpoint with
/// neither is an error.
pub fn return_shape(endpoint: &EndpointDef) -> Result<ReturnShape, GeneratorError> {
    endpoint
        .stmts
        .iter()
        .find_map(|stmt| match stmt {
            Statement::Action(action) if action == "return" => Some(ReturnShape::Nothing),
            Statement::Ret(payload) => Some(ReturnShape::Value(payload.clone())),
            Statement::Action(_) => None,
        })
        .ok_or_else(|| GeneratorError::MissingReturn(endpoint.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_define::TypeDef;

    #[test]
    fn params_follow_declaration_order_then_body() {
        let ep = EndpointDef::new("POST /a/{id}")
            .rest_param("verbose", TypeDef::primitive(Primitive::Bool))
            .rest_param("id", TypeDef::reference("ItemId"))
            .body("item", TypeDef::reference("Item"))
            .returns("Item");

        let params = method_params(&ep).unwrap();
        let summary: Vec<_> = params
            .iter()
            .map(|p| (p.name.as_str(), p.ty.as_str(), p.binding))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("verbose", "bool", Binding::Query),
                ("id", "ItemId", Binding::Path),
                ("item", "Item", Binding::Body),
            ]
        );
    }

    #[test]
    fn refinement_is_unpacked_and_keeps_source_name() {
        let ep = EndpointDef::new("GET /a/{key}")
            .rest_param("key", TypeDef::reference("{ k <: int }"))
            .returns("A");

        let params = method_params(&ep).unwrap();
        assert_eq!(params[0].source, "key");
        assert_eq!(params[0].name, "k");
        assert_eq!(params[0].ty, "i64");
    }

    #[test]
    fn body_must_be_a_reference() {
        let ep = EndpointDef::new("PUT /a")
            .body("raw", TypeDef::primitive(Primitive::Bytes))
            .returns_nothing();
        assert!(matches!(
            method_params(&ep),
            Err(GeneratorError::BodyNotReference { ref param, .. }) if param == "raw"
        ));
    }

    #[test]
    fn composite_rest_params_are_rejected() {
        let ep = EndpointDef::new("GET /a")
            .rest_param("ids", TypeDef::list(TypeDef::primitive(Primitive::Int)))
            .returns("A");
        assert!(matches!(
            method_params(&ep),
            Err(GeneratorError::UnsupportedParameter { .. })
        ));
    }

    #[test]
    fn url_params_must_parse_from_text() {
        let app = Application::new("Api").with_type(
            "Item",
            TypeDef::tuple([("Name", TypeDef::primitive(Primitive::String).at(1))]),
        );
        let ep = EndpointDef::new("GET /a/{id}/{item}/{tally}")
            .rest_param("id", TypeDef::reference("{id <: string}"))
            .rest_param("item", TypeDef::reference("Item"))
            .rest_param("tally", TypeDef::reference("map of string:int"))
            .rest_param("raw", TypeDef::primitive(Primitive::Bytes))
            .rest_param("nothing", TypeDef::primitive(Primitive::Empty))
            .rest_param("blank", TypeDef::reference("{b <: empty}"))
            .rest_param("when", TypeDef::primitive(Primitive::DateTime))
            .rest_param("alias", TypeDef::reference("ItemId"))
            .returns("A");

        let verdicts: Vec<(&str, bool)> = ep
            .rest_params
            .iter()
            .map(|p| (p.name.as_str(), url_binding(&app, &ep, p).is_ok()))
            .collect();
        assert_eq!(
            verdicts,
            vec![
                ("id", true),
                ("item", false),
                ("tally", false),
                ("raw", false),
                ("nothing", false),
                ("blank", false),
                ("when", true),
                ("alias", true),
            ]
        );
        assert!(matches!(
            url_binding(&app, &ep, &ep.rest_params[1]),
            Err(GeneratorError::UnsupportedParameter { ref param, .. }) if param == "item"
        ));
    }

    #[test]
    fn first_deciding_statement_wins() {
        let ep = EndpointDef::new("GET /a").returns("Thing").returns_nothing();
        assert_eq!(return_shape(&ep).unwrap(), ReturnShape::Value("Thing".to_string()));

        let ep = EndpointDef::new("DELETE /a").returns_nothing().returns("Thing");
        assert_eq!(return_shape(&ep).unwrap(), ReturnShape::Nothing);
    }

    #[test]
    fn other_actions_are_skipped() {
        let mut ep = EndpointDef::new("GET /a");
        ep.stmts.push(Statement::Action("log request".to_string()));
        ep.stmts.push(Statement::Ret("Thing".to_string()));
        assert_eq!(return_shape(&ep).unwrap(), ReturnShape::Value("Thing".to_string()));
    }

    #[test]
    fn missing_return_is_an_error() {
        let ep = EndpointDef::new("GET /a");
        let err = return_shape(&ep).unwrap_err();
        assert_eq!(err.to_string(), "Return missing in endpoint 'GET /a'");
    }
}
