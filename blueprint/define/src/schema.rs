//! The top-level schema and its applications.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Attributes;
use crate::endpoint::EndpointDef;
use crate::types::TypeDef;

/// Errors raised while loading a schema from its JSON encoding.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read schema '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema: {0}")]
    Json(#[from] serde_json::Error),
}

/// A named application: its types, endpoints and configuration attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    #[serde(default)]
    pub attrs: Attributes,
    #[serde(default)]
    pub types: BTreeMap<String, TypeDef>,
    /// Keyed by the endpoint name (`"<VERB> <path>"`).
    #[serde(default)]
    pub endpoints: BTreeMap<String, EndpointDef>,
}

impl Application {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, name: impl Into<String>, def: TypeDef) -> Self {
        self.types.insert(name.into(), def);
        self
    }

    /// Adds an endpoint under its own name.
    pub fn with_endpoint(mut self, endpoint: EndpointDef) -> Self {
        self.endpoints.insert(endpoint.name.clone(), endpoint);
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}

/// The structured API description consumed by the generator.
///
/// Generation requires exactly one application; the map allows the
/// loader to represent (and the generator to reject) anything else.
///
/// ## Examples
///
/// ```
/// use blueprint_define::{Application, Schema};
///
/// let schema = Schema::from_json_str(r#"{ "apps": { "Shop": { "name": "Shop" } } }"#).unwrap();
/// assert_eq!(schema.apps["Shop"], Application::new("Shop"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub apps: BTreeMap<String, Application>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// A schema holding only `app`.
    pub fn single(app: Application) -> Self {
        Self::new().with_app(app)
    }

    pub fn with_app(mut self, app: Application) -> Self {
        self.apps.insert(app.name.clone(), app);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let json = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }
}
