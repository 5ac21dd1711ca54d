//! Service contract generation.
//!
//! The contract is an async trait with one method per endpoint, to be
//! implemented by whatever stores or computes the data. Methods fail with
//! the generated `ServiceError`, which carries the HTTP status to answer with.

use std::collections::BTreeSet;

use blueprint_define::Application;
use proc_macro2::TokenStream;
use quote::quote;

use super::{doc_attr, ident, rust_type};
use crate::errors::GeneratorError;
use crate::inference::{ReturnShape, method_params, return_shape};
use crate::naming::{method_name, title_words, to_snake_case};
use crate::type_mapper::reference_type;

/// Trait name used when the application sets no `interface` attribute.
pub const DEFAULT_SERVICE_NAME: &str = "Storer";

/// Returns the service trait name for `app`.
pub fn service_trait_name(app: &Application) -> String {
    app.attr("interface")
        .map(title_words)
        .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string())
}

/// Generates the `ServiceError` type returned by service methods.
pub fn generate_service_error() -> TokenStream {
    quote! {
        /// Error returned by service methods.
        ///
        /// `status` is the HTTP status code the REST layer responds with;
        /// values that are not valid status codes are answered with 500.
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        #[error("{message} (status {status})")]
        pub struct ServiceError {
            pub status: u16,
            pub message: String,
        }

        impl ServiceError {
            pub fn new(status: u16, message: impl Into<String>) -> Self {
                Self {
                    status,
                    message: message.into(),
                }
            }

            pub fn bad_request(message: impl Into<String>) -> Self {
                Self::new(400, message)
            }

            pub fn not_found(message: impl Into<String>) -> Self {
                Self::new(404, message)
            }

            pub fn internal(message: impl Into<String>) -> Self {
                Self::new(500, message)
            }
        }
    }
}

/// Generates the service trait with one method per endpoint in `order`.
pub fn generate_service_trait(
    app: &Application,
    order: &[&str],
) -> Result<TokenStream, GeneratorError> {
    let trait_name = ident(&service_trait_name(app), "service interface name")?;
    let trait_doc = doc_attr(app.attr("interface_doc"));

    let mut seen = BTreeSet::new();
    let mut methods = Vec::with_capacity(order.len());
    for name in order {
        let Some(endpoint) = app.endpoints.get(*name) else {
            continue;
        };
        let fn_name = to_snake_case(&method_name(endpoint));
        if !seen.insert(fn_name.clone()) {
            return Err(GeneratorError::CodeGenError(format!(
                "endpoint '{}' duplicates service method '{}'",
                endpoint.name, fn_name
            )));
        }
        let fn_ident = ident(&fn_name, &format!("method of '{}'", endpoint.name))?;

        let params = method_params(endpoint)?
            .into_iter()
            .map(|param| {
                let name = ident(&to_snake_case(&param.name), &format!("parameter of '{}'", endpoint.name))?;
                let ty = rust_type(&param.ty)?;
                Ok(quote! { #name: #ty })
            })
            .collect::<Result<Vec<_>, GeneratorError>>()?;

        let ret = match return_shape(endpoint)? {
            ReturnShape::Nothing => quote! { () },
            ReturnShape::Value(payload) => {
                let ty = rust_type(&reference_type(&payload)?)?;
                quote! { #ty }
            }
        };

        let doc = doc_attr(endpoint.attr("method_doc"));
        methods.push(quote! {
            #doc
            async fn #fn_ident(&self, #(#params),*) -> Result<#ret, ServiceError>;
        });
    }

    Ok(quote! {
        #trait_doc
        #[async_trait::async_trait]
        pub trait #trait_name: Send + Sync {
            #(#methods)*
        }
    })
}
