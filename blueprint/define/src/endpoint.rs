//! Endpoint definitions.
//!
//! An endpoint is named `"<VERB> <path>"` and carries its parameters,
//! an optional body and the statements its return shape is inferred from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::Attributes;
use crate::types::TypeDef;

/// HTTP verbs an endpoint may be bound to.
///
/// Parsing is case-insensitive; display is title case.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use blueprint_define::HttpVerb;
///
/// assert_eq!(HttpVerb::from_str("get").unwrap(), HttpVerb::Get);
/// assert_eq!(HttpVerb::from_str("DELETE").unwrap().to_string(), "Delete");
/// assert!(HttpVerb::from_str("PATCH").is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum HttpVerb {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpVerb {
    /// Whether requests with this verb carry a body payload.
    pub fn has_body(self) -> bool {
        matches!(self, HttpVerb::Put | HttpVerb::Post)
    }
}

/// A named, typed endpoint parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDef,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeDef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A statement inside an endpoint body.
///
/// Only `return` actions and typed returns matter for generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statement {
    /// A bare action such as `return`.
    Action(String),
    /// A typed return naming the payload type.
    Ret(String),
}

/// A single HTTP-style operation.
///
/// ## Examples
///
/// ```
/// use blueprint_define::{EndpointDef, TypeDef};
///
/// let ep = EndpointDef::new("GET /people/{id}")
///     .rest_param("id", TypeDef::reference("PersonId").at(7))
///     .returns("Person");
///
/// assert_eq!(ep.rest_params.len(), 1);
/// assert!(ep.body.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: Attributes,
    /// Path and query parameters in declaration order.
    #[serde(default)]
    pub rest_params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Param>,
    #[serde(default)]
    pub stmts: Vec<Statement>,
}

impl EndpointDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
            rest_params: Vec::new(),
            body: None,
            stmts: Vec::new(),
        }
    }

    pub fn rest_param(mut self, name: impl Into<String>, ty: TypeDef) -> Self {
        self.rest_params.push(Param::new(name, ty));
        self
    }

    pub fn body(mut self, name: impl Into<String>, ty: TypeDef) -> Self {
        self.body = Some(Param::new(name, ty));
        self
    }

    /// Appends a typed return of `payload`.
    pub fn returns(mut self, payload: impl Into<String>) -> Self {
        self.stmts.push(Statement::Ret(payload.into()));
        self
    }

    /// Appends a bare `return`.
    pub fn returns_nothing(mut self) -> Self {
        self.stmts.push(Statement::Action("return".to_string()));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Primitive, TypeKind};
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn verbs_parse_case_insensitively() {
        for verb in HttpVerb::iter() {
            let upper = verb.to_string().to_uppercase();
            let lower = verb.to_string().to_lowercase();
            assert_eq!(HttpVerb::from_str(&upper).unwrap(), verb);
            assert_eq!(HttpVerb::from_str(&lower).unwrap(), verb);
        }
    }

    #[test]
    fn only_put_and_post_have_bodies() {
        assert!(HttpVerb::Put.has_body());
        assert!(HttpVerb::Post.has_body());
        assert!(!HttpVerb::Get.has_body());
        assert!(!HttpVerb::Delete.has_body());
    }

    #[test]
    fn endpoint_deserializes_with_defaults() {
        let json = r#"{
            "name": "PUT /people/{id}",
            "rest_params": [
                { "name": "id", "type": { "kind": { "reference": ["PersonId"] }, "line": 3 } },
                { "name": "dryRun", "type": { "kind": { "primitive": "bool" } } }
            ],
            "body": { "name": "person", "type": { "kind": { "reference": ["Person"] } } },
            "stmts": [ { "action": "return" } ]
        }"#;
        let ep: EndpointDef = serde_json::from_str(json).unwrap();

        assert!(ep.attrs.is_empty());
        assert_eq!(ep.rest_params[1].ty.kind, TypeKind::Primitive(Primitive::Bool));
        assert_eq!(ep.body.as_ref().map(|b| b.name.as_str()), Some("person"));
        assert_eq!(ep.stmts, vec![Statement::Action("return".to_string())]);
    }

    #[test]
    fn builder_preserves_parameter_order() {
        let ep = EndpointDef::new("GET /x")
            .rest_param("b", TypeDef::reference("B"))
            .rest_param("a", TypeDef::reference("A"))
            .returns_nothing()
            .returns("X");

        let names: Vec<_> = ep.rest_params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(ep.stmts.len(), 2);
    }
}
