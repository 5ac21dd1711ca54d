//! Record struct generation.
//!
//! Every top-level schema type must be a tuple and becomes one serde
//! struct. Fields follow their source lines and carry their JSON property
//! name in `#[serde(rename)]`.

use std::collections::BTreeSet;

use blueprint_define::{Application, TypeDef, TypeKind};
use proc_macro2::TokenStream;
use quote::quote;
use tracing::debug;

use super::{doc_attr, ident, rust_type};
use crate::errors::GeneratorError;
use crate::naming::{serialization_key, to_snake_case};
use crate::ordering::type_order;
use crate::type_mapper::map_type;

/// Application attribute holding the JSON property word separator.
pub const JSON_SEPARATOR_ATTR: &str = "json_property_separator";

/// Generates all record structs of `app` in declaration order.
pub fn generate_records(app: &Application) -> Result<TokenStream, GeneratorError> {
    let separator = app.attr(JSON_SEPARATOR_ATTR).unwrap_or_default();
    let order = type_order(&app.types)?;
    debug!(?order, "resolved type order");

    let mut tokens = TokenStream::new();
    for name in order {
        tokens.extend(generate_record(name, &app.types[name], separator)?);
    }
    Ok(tokens)
}

/// Generates one record struct.
///
/// ## Examples
///
/// ```
/// use blueprint_define::{Primitive, TypeDef};
/// use blueprint_gen::codegen::generate_record;
///
/// let person = TypeDef::tuple([
///     ("LastName", TypeDef::primitive(Primitive::String).at(2)),
///     ("Age", TypeDef::primitive(Primitive::Int).at(3)),
/// ]);
/// let code = generate_record("Person", &person, "-").unwrap().to_string();
/// assert!(code.contains("\"last-name\""));
/// assert!(code.contains("last_name"));
/// ```
pub fn generate_record(
    name: &str,
    ty: &TypeDef,
    separator: &str,
) -> Result<TokenStream, GeneratorError> {
    let TypeKind::Tuple(fields) = &ty.kind else {
        return Err(GeneratorError::NotARecord(name.to_string()));
    };

    let struct_name = ident(name, "record type")?;
    let doc = doc_attr(ty.attr("doc"));

    let mut seen = BTreeSet::new();
    let mut field_tokens = Vec::with_capacity(fields.len());
    for field in type_order(fields)? {
        let field_ty = &fields[field];
        let snake = to_snake_case(field);
        if !seen.insert(snake.clone()) {
            return Err(GeneratorError::CodeGenError(format!(
                "fields of '{}' collide on '{}'",
                name, snake
            )));
        }
        let field_name = ident(&snake, &format!("field of '{}'", name))?;
        let field_type = rust_type(&map_type(field_ty)?)?;
        let key = serialization_key(field, field_ty, separator);
        field_tokens.push(quote! {
            #[serde(rename = #key)]
            pub #field_name: #field_type,
        });
    }

    Ok(quote! {
        #doc
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct #struct_name {
            #(#field_tokens)*
        }
    })
}
