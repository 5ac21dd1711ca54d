//! Type descriptions for schema data types.
//!
//! - [`TypeDef`] - A type plus its recorded source line and attributes
//! - [`TypeKind`] - The tagged variant over primitive, reference and composite kinds
//! - [`Primitive`] - The primitive kinds a schema may name

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::Attributes;

/// Primitive kinds understood by the schema.
///
/// Parses from and displays as the lowercase keyword used in schemas.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use blueprint_define::Primitive;
///
/// assert_eq!(Primitive::from_str("datetime").unwrap(), Primitive::DateTime);
/// assert_eq!(Primitive::Int.to_string(), "int");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Primitive {
    Bool,
    Any,
    Int,
    String,
    Empty,
    Float,
    Decimal,
    Bytes,
    Date,
    DateTime,
    Xml,
    Uuid,
}

/// The shape of a schema type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Primitive(Primitive),
    /// A named type, as scoped path segments. Only single-segment
    /// references can be generated.
    Reference(Vec<String>),
    List(Box<TypeDef>),
    Set(Box<TypeDef>),
    /// A record: field name to field type.
    Tuple(BTreeMap<String, TypeDef>),
}

/// A schema type with its source position.
///
/// The line is only used to recover declaration order.
///
/// ## Examples
///
/// ```
/// use blueprint_define::{Primitive, TypeDef, TypeKind};
///
/// let person = TypeDef::tuple([
///     ("FirstName", TypeDef::primitive(Primitive::String).at(2)),
///     ("LastName", TypeDef::primitive(Primitive::String).at(3)),
/// ]);
///
/// assert!(matches!(person.kind, TypeKind::Tuple(ref fields) if fields.len() == 2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<i32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: Attributes,
}

impl TypeDef {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            line: None,
            attrs: Attributes::new(),
        }
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::new(TypeKind::Primitive(primitive))
    }

    /// A single-segment reference to a named type.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Reference(vec![name.into()]))
    }

    pub fn scoped_reference<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(TypeKind::Reference(
            segments.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn list(inner: TypeDef) -> Self {
        Self::new(TypeKind::List(Box::new(inner)))
    }

    pub fn set(inner: TypeDef) -> Self {
        Self::new(TypeKind::Set(Box::new(inner)))
    }

    pub fn tuple<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeDef)>,
        S: Into<String>,
    {
        Self::new(TypeKind::Tuple(
            fields
                .into_iter()
                .map(|(name, def)| (name.into(), def))
                .collect(),
        ))
    }

    /// Records the source line of this type.
    pub fn at(mut self, line: i32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// True for List, Set and Tuple.
    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::List(_) | TypeKind::Set(_) | TypeKind::Tuple(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn primitive_keywords_round_trip_through_strum() {
        for primitive in Primitive::iter() {
            let keyword = primitive.to_string();
            assert_eq!(Primitive::from_str(&keyword).unwrap(), primitive);
        }
    }

    #[test]
    fn unknown_primitive_keyword_is_rejected() {
        assert!(Primitive::from_str("money").is_err());
    }

    #[test]
    fn type_def_deserializes_from_tagged_json() {
        let json = r#"{
            "kind": { "list": { "kind": { "reference": ["Person"] }, "line": 4 } },
            "attrs": { "doc": "people" }
        }"#;
        let def: TypeDef = serde_json::from_str(json).unwrap();

        assert_eq!(def.line, None);
        assert_eq!(def.attr("doc"), Some("people"));
        match def.kind {
            TypeKind::List(inner) => {
                assert_eq!(inner.kind, TypeKind::Reference(vec!["Person".to_string()]));
                assert_eq!(inner.line, Some(4));
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn primitive_serializes_as_lowercase_keyword() {
        let json = serde_json::to_string(&TypeDef::primitive(Primitive::DateTime)).unwrap();
        assert_eq!(json, r#"{"kind":{"primitive":"datetime"}}"#);
    }

    #[test]
    fn composite_detection() {
        assert!(TypeDef::list(TypeDef::reference("A")).is_composite());
        assert!(TypeDef::tuple(Vec::<(String, TypeDef)>::new()).is_composite());
        assert!(!TypeDef::reference("A").is_composite());
        assert!(!TypeDef::primitive(Primitive::Bool).is_composite());
    }
}
