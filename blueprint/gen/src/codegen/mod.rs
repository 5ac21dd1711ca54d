//! Code generation modules for blueprint.
//!
//! Each submodule produces one part of the generated output as a
//! `proc_macro2::TokenStream`:
//!
//! - [`records`] - One struct per schema record type
//! - [`service`] - The service contract trait and its `ServiceError`
//! - [`middleware`] - The `Middleware` trait with one accessor per hook
//! - [`rest`] - Context keys, the axum router constructor and handlers
//! - [`module_docs`] - Module-level documentation for each artifact
//!
//! Token streams are validated with `syn::parse2` and formatted with
//! `prettyplease` in [`crate::output`].
//!
//! Names coming from the schema pass through [`ident`] and [`rust_type`],
//! so a bad name surfaces as a [`GeneratorError`] instead of a panic
//! inside `quote!`.

pub mod middleware;
pub mod module_docs;
pub mod records;
pub mod rest;
pub mod service;

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::errors::GeneratorError;

pub use middleware::{generate_middleware, middleware_hooks};
pub use module_docs::ModuleDocBuilder;
pub use records::{generate_record, generate_records};
pub use rest::generate_rest;
pub use service::{generate_service_error, generate_service_trait, service_trait_name};

/// Parses `name` as an identifier, falling back to a raw identifier for
/// keywords such as `type`.
///
/// `context` describes where the name is used, for the error message.
pub fn ident(name: &str, context: &str) -> Result<Ident, GeneratorError> {
    syn::parse_str::<Ident>(name)
        .or_else(|_| syn::parse_str::<Ident>(&format!("r#{}", name)))
        .map_err(|_| GeneratorError::InvalidIdentifier {
            name: name.to_string(),
            context: context.to_string(),
        })
}

/// Parses a Rust type expression.
pub fn rust_type(expr: &str) -> Result<syn::Type, GeneratorError> {
    syn::parse_str::<syn::Type>(expr).map_err(|e| GeneratorError::InvalidType {
        name: expr.to_string(),
        reason: e.to_string(),
    })
}

/// A `#[doc]` attribute for `text`, or nothing when absent.
pub(crate) fn doc_attr(text: Option<&str>) -> TokenStream {
    match text {
        Some(text) => {
            let line = format!(" {}", text.trim());
            quote! { #[doc = #line] }
        }
        None => TokenStream::new(),
    }
}
