//! Mapping of schema types to Rust type expressions.
//!
//! | Schema          | Rust                                 |
//! |-----------------|--------------------------------------|
//! | `bool`          | `bool`                               |
//! | `any`           | `serde_json::Value`                  |
//! | `int`           | `i64`                                |
//! | `string`        | `String`                             |
//! | `empty`         | `()`                                 |
//! | `float`/`decimal` | `f64`                              |
//! | `bytes`         | `Vec<u8>`                            |
//! | `date`/`datetime` | `chrono::DateTime<chrono::Utc>`    |
//! | `map of K:V`    | `std::collections::HashMap<K, V>`    |
//! | list of T       | `Vec<T>`                             |
//! | set of T        | `std::collections::HashMap<T, ()>`   |
//!
//! `xml` and `uuid` have no mapping. Lists and sets may only wrap a
//! primitive or a reference.

use std::str::FromStr;

use blueprint_define::{Primitive, TypeDef, TypeKind};

use crate::errors::GeneratorError;

/// Prefix of the `map of K:V` reference convention.
pub const MAP_PREFIX: &str = "map of";

/// Returns the Rust type for a primitive kind.
pub fn primitive_type(primitive: Primitive) -> Result<&'static str, GeneratorError> {
    match primitive {
        Primitive::Bool => Ok("bool"),
        Primitive::Any => Ok("serde_json::Value"),
        Primitive::Int => Ok("i64"),
        Primitive::String => Ok("String"),
        Primitive::Empty => Ok("()"),
        Primitive::Float | Primitive::Decimal => Ok("f64"),
        Primitive::Bytes => Ok("Vec<u8>"),
        Primitive::Date | Primitive::DateTime => Ok("chrono::DateTime<chrono::Utc>"),
        Primitive::Xml | Primitive::Uuid => {
            Err(GeneratorError::UnsupportedPrimitive(primitive.to_string()))
        }
    }
}

/// Maps a field or parameter type.
///
/// Tuples are rejected; records are only emitted at the top level.
///
/// ## Examples
///
/// ```
/// use blueprint_define::{Primitive, TypeDef};
/// use blueprint_gen::type_mapper::map_type;
///
/// let tags = TypeDef::set(TypeDef::primitive(Primitive::String));
/// assert_eq!(map_type(&tags).unwrap(), "std::collections::HashMap<String, ()>");
///
/// let nested = TypeDef::list(TypeDef::list(TypeDef::reference("Row")));
/// assert!(map_type(&nested).is_err());
/// ```
pub fn map_type(ty: &TypeDef) -> Result<String, GeneratorError> {
    match &ty.kind {
        TypeKind::Primitive(_) | TypeKind::Reference(_) => simple_type(ty),
        TypeKind::List(inner) => Ok(format!("Vec<{}>", simple_type(inner)?)),
        TypeKind::Set(inner) => Ok(format!(
            "std::collections::HashMap<{}, ()>",
            simple_type(inner)?
        )),
        TypeKind::Tuple(_) => Err(GeneratorError::RecordAsField),
    }
}

/// Maps a non-composite type: a primitive or a single-segment reference.
///
/// Only reached for top-level simple types and list/set elements, so any
/// composite here is a nesting error.
pub fn simple_type(ty: &TypeDef) -> Result<String, GeneratorError> {
    match &ty.kind {
        TypeKind::Primitive(p) => primitive_type(*p).map(str::to_string),
        TypeKind::Reference(path) => match path.as_slice() {
            [name] => reference_type(name),
            _ => Err(GeneratorError::MultiSegmentReference(path.join("."))),
        },
        TypeKind::List(_) | TypeKind::Set(_) | TypeKind::Tuple(_) => Err(
            GeneratorError::NestedComposite(format!("{} inside a list or set", kind_name(ty))),
        ),
    }
}

/// Maps a referenced type name, expanding the `map of K:V` convention.
///
/// ```
/// use blueprint_gen::type_mapper::reference_type;
///
/// assert_eq!(
///     reference_type("map of string:int").unwrap(),
///     "std::collections::HashMap<String, i64>"
/// );
/// assert!(reference_type("map of string:int:bool").is_err());
/// ```
pub fn reference_type(name: &str) -> Result<String, GeneratorError> {
    let Some(rest) = name.strip_prefix(MAP_PREFIX) else {
        return resolve_name(name);
    };
    let pair = rest.trim_matches(' ');
    let parts: Vec<&str> = pair.split(':').collect();
    match parts.as_slice() {
        [key, value] => Ok(format!(
            "std::collections::HashMap<{}, {}>",
            resolve_name(key.trim())?,
            resolve_name(value.trim())?
        )),
        _ => Err(GeneratorError::BadMapDefinition(pair.to_string())),
    }
}

/// Resolves a bare type name: primitive keywords map through the primitive
/// table, anything else is used verbatim.
pub fn resolve_name(name: &str) -> Result<String, GeneratorError> {
    match Primitive::from_str(name) {
        Ok(primitive) => primitive_type(primitive).map(str::to_string),
        Err(_) => Ok(name.to_string()),
    }
}

fn kind_name(ty: &TypeDef) -> &'static str {
    match ty.kind {
        TypeKind::Primitive(_) => "primitive",
        TypeKind::Reference(_) => "reference",
        TypeKind::List(_) => "list",
        TypeKind::Set(_) => "set",
        TypeKind::Tuple(_) => "tuple",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    #[test]
    fn primitive_table() {
        let cases = [
            (Primitive::Bool, "bool"),
            (Primitive::Any, "serde_json::Value"),
            (Primitive::Int, "i64"),
            (Primitive::String, "String"),
            (Primitive::Empty, "()"),
            (Primitive::Float, "f64"),
            (Primitive::Decimal, "f64"),
            (Primitive::Bytes, "Vec<u8>"),
            (Primitive::Date, "chrono::DateTime<chrono::Utc>"),
            (Primitive::DateTime, "chrono::DateTime<chrono::Utc>"),
        ];
        for (primitive, expected) in cases {
            assert_eq!(map_type(&TypeDef::primitive(primitive)).unwrap(), expected);
        }
    }

    #[test]
    fn xml_and_uuid_are_unsupported() {
        for primitive in [Primitive::Xml, Primitive::Uuid] {
            let err = map_type(&TypeDef::primitive(primitive)).unwrap_err();
            assert!(matches!(err, GeneratorError::UnsupportedPrimitive(ref k) if k == &primitive.to_string()));
        }
    }

    #[test]
    fn every_supported_primitive_parses_as_a_rust_type() {
        for primitive in Primitive::iter() {
            if let Ok(ty) = primitive_type(primitive) {
                assert!(syn::parse_str::<syn::Type>(ty).is_ok(), "{} -> {}", primitive, ty);
            }
        }
    }

    #[test]
    fn references_are_verbatim_unless_keywords() {
        assert_eq!(map_type(&TypeDef::reference("Person")).unwrap(), "Person");
        assert_eq!(map_type(&TypeDef::reference("string")).unwrap(), "String");
    }

    #[test]
    fn map_convention() {
        assert_eq!(
            map_type(&TypeDef::reference("map of string:int")).unwrap(),
            "std::collections::HashMap<String, i64>"
        );
        assert_eq!(
            map_type(&TypeDef::reference("map of  Key:Value ")).unwrap(),
            "std::collections::HashMap<Key, Value>"
        );
    }

    #[test]
    fn map_convention_requires_one_pair() {
        for bad in ["map of string:int:bool", "map of string", "map of"] {
            let err = map_type(&TypeDef::reference(bad)).unwrap_err();
            assert!(matches!(err, GeneratorError::BadMapDefinition(_)), "{}", bad);
        }
    }

    #[test]
    fn multi_segment_reference_is_rejected() {
        let err = map_type(&TypeDef::scoped_reference(["Other", "Person"])).unwrap_err();
        assert!(matches!(err, GeneratorError::MultiSegmentReference(ref p) if p == "Other.Person"));
    }

    #[test]
    fn lists_and_sets_of_simple_types() {
        assert_eq!(
            map_type(&TypeDef::list(TypeDef::reference("Person"))).unwrap(),
            "Vec<Person>"
        );
        assert_eq!(
            map_type(&TypeDef::set(TypeDef::primitive(Primitive::Int))).unwrap(),
            "std::collections::HashMap<i64, ()>"
        );
    }

    #[test]
    fn tuple_is_not_mappable_directly() {
        let ty = TypeDef::tuple([("A", TypeDef::primitive(Primitive::Int))]);
        assert!(matches!(map_type(&ty), Err(GeneratorError::RecordAsField)));
    }

    #[test]
    fn list_of_tuple_is_nested_composite() {
        let ty = TypeDef::list(TypeDef::tuple([("A", TypeDef::primitive(Primitive::Int))]));
        assert!(matches!(map_type(&ty), Err(GeneratorError::NestedComposite(_))));
    }

    fn composite(inner: TypeDef, depth: u8, as_set: bool) -> TypeDef {
        (0..depth).fold(inner, |acc, _| {
            if as_set { TypeDef::set(acc) } else { TypeDef::list(acc) }
        })
    }

    proptest! {
        #[test]
        fn nested_lists_and_sets_always_fail(depth in 2u8..5, outer_set in any::<bool>(), inner_set in any::<bool>()) {
            let leaf = TypeDef::reference("Leaf");
            let inner = composite(leaf, depth - 1, inner_set);
            let ty = if outer_set { TypeDef::set(inner) } else { TypeDef::list(inner) };
            prop_assert!(
                matches!(map_type(&ty), Err(GeneratorError::NestedComposite(_))),
                "nesting accepted"
            );
        }
    }
}
