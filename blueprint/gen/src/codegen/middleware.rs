//! Middleware contract generation.
//!
//! Endpoints name a middleware hook through their `middleware` attribute.
//! Each distinct hook becomes an accessor on the generated `Middleware`
//! trait returning the interceptors for the routes that use it. A `root`
//! accessor for interceptors around the whole router is always present.

use blueprint_define::Application;
use proc_macro2::TokenStream;
use quote::quote;

use super::ident;
use crate::errors::GeneratorError;
use crate::naming::to_snake_case;

/// Accessor for interceptors wrapping every route.
pub const ROOT_ACCESSOR: &str = "root";

/// Distinct middleware hook names in first-seen endpoint order.
pub fn middleware_hooks<'a>(app: &'a Application, order: &[&str]) -> Vec<&'a str> {
    let mut hooks: Vec<&str> = Vec::new();
    for name in order {
        if let Some(hook) = app.endpoints.get(*name).and_then(|ep| ep.attr("middleware"))
            && !hooks.contains(&hook)
        {
            hooks.push(hook);
        }
    }
    hooks
}

/// Accessor method name for a hook.
///
/// The hook must itself be an identifier, so that a malformed value in
/// the schema is reported rather than silently rewritten.
pub fn hook_accessor(hook: &str) -> Result<String, GeneratorError> {
    ident(hook, "middleware hook")?;
    Ok(to_snake_case(hook))
}

/// Generates the `Interceptor` alias and the `Middleware` trait.
pub fn generate_middleware(
    app: &Application,
    order: &[&str],
) -> Result<TokenStream, GeneratorError> {
    let mut accessors: Vec<String> = Vec::new();
    for hook in middleware_hooks(app, order) {
        let accessor = hook_accessor(hook)?;
        if accessor != ROOT_ACCESSOR && !accessors.contains(&accessor) {
            accessors.push(accessor);
        }
    }

    let methods = accessors
        .iter()
        .map(|accessor| {
            let name = ident(accessor, "middleware hook")?;
            let doc = format!(" Interceptors for routes using the `{}` hook.", accessor);
            Ok(quote! {
                #[doc = #doc]
                fn #name(&self) -> Vec<Interceptor>;
            })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    Ok(quote! {
        use std::future::Future;
        use std::pin::Pin;
        use std::sync::Arc;

        use axum::extract::Request;
        use axum::middleware::Next;
        use axum::response::Response;

        /// The response future produced by an [`Interceptor`].
        pub type InterceptorFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

        /// A request interceptor: inspects or rewrites the request, then
        /// either answers directly or hands it on to `next`.
        pub type Interceptor = Arc<dyn Fn(Request, Next) -> InterceptorFuture + Send + Sync>;

        /// Supplies the interceptors applied to the REST routes.
        pub trait Middleware: Send + Sync {
            #(#methods)*

            /// Interceptors wrapping every route.
            fn root(&self) -> Vec<Interceptor>;
        }
    })
}
