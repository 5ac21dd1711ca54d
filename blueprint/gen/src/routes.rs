//! Route table construction.
//!
//! Endpoints are grouped by path template in first-seen order. The first
//! endpoint on a path fixes its path-bound parameters and middleware hook;
//! every endpoint contributes one verb route with its own query parameters.

use blueprint_define::{Application, HttpVerb, TypeKind};
use tracing::{debug, warn};

use crate::errors::GeneratorError;
use crate::inference::{Binding, url_binding};
use crate::naming::method_name;
use crate::parser::{extract_path_params, parse_endpoint_name};
use crate::type_mapper::simple_type;

/// One verb bound on a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbRoute {
    pub verb: HttpVerb,
    /// Service method name, e.g. `GetApiKey`.
    pub method_name: String,
    /// The endpoint this route was built from.
    pub endpoint: String,
    /// Query-bound parameter names in declaration order.
    pub query_params: Vec<String>,
    /// Body payload type for Put and Post, empty when there is none.
    pub payload_type: String,
}

/// All verbs registered on one path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: String,
    /// Middleware hook name, empty when the path has none.
    pub middleware: String,
    /// Path-bound parameter names from the first endpoint on this path.
    pub path_params: Vec<String>,
    pub verbs: Vec<VerbRoute>,
}

impl RouteEntry {
    pub fn verb(&self, verb: HttpVerb) -> Option<&VerbRoute> {
        self.verbs.iter().find(|route| route.verb == verb)
    }
}

/// Paths in first-seen order with their verb routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    pub entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn get(&self, path: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the route table for `app`, visiting endpoints in `order`.
///
/// ## Errors
///
/// Fails on malformed endpoint names, unknown verbs, parameters that cannot
/// be read from a URL, a body on a Get or Delete, and a verb bound twice
/// on one path.
pub fn build_routes(app: &Application, order: &[&str]) -> Result<RouteTable, GeneratorError> {
    let mut table = RouteTable::default();

    for name in order {
        let Some(endpoint) = app.endpoints.get(*name) else {
            continue;
        };
        let (verb, path) = parse_endpoint_name(&endpoint.name)?;

        let mut path_params = Vec::new();
        let mut query_params = Vec::new();
        for param in &endpoint.rest_params {
            match url_binding(app, endpoint, param)? {
                Binding::Path => path_params.push(param.name.clone()),
                _ => query_params.push(param.name.clone()),
            }
        }

        let placeholders = extract_path_params(path);
        for param in &path_params {
            if !placeholders.contains(&param.as_str()) {
                warn!(endpoint = %endpoint.name, param = %param, "path parameter has no placeholder in path");
            }
        }

        let payload_type = match &endpoint.body {
            Some(_) if !verb.has_body() => {
                return Err(GeneratorError::BodyNotAllowed {
                    endpoint: endpoint.name.clone(),
                    verb: verb.to_string(),
                });
            }
            Some(body) if matches!(body.ty.kind, TypeKind::Reference(_)) => simple_type(&body.ty)?,
            _ => String::new(),
        };

        let route = VerbRoute {
            verb,
            method_name: method_name(endpoint),
            endpoint: endpoint.name.clone(),
            query_params,
            payload_type,
        };

        let index = match table.entries.iter().position(|e| e.path == path) {
            Some(index) => index,
            None => {
                table.entries.push(RouteEntry {
                    path: path.to_string(),
                    middleware: endpoint.attr("middleware").unwrap_or_default().to_string(),
                    path_params,
                    verbs: Vec::new(),
                });
                table.entries.len() - 1
            }
        };
        let entry = &mut table.entries[index];
        if entry.verb(verb).is_some() {
            return Err(GeneratorError::DuplicateRoute {
                verb: verb.to_string(),
                path: path.to_string(),
            });
        }
        entry.verbs.push(route);
    }

    debug!(paths = table.len(), "built route table");
    Ok(table)
}
