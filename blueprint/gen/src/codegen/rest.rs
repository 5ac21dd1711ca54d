//! REST wiring generation for axum.
//!
//! Produces, for the routes in a [`RouteTable`]:
//!
//! - a `ContextKey` enum with one variant per distinct path parameter
//! - `context_saver`, an interceptor copying a path value into the
//!   request's `RequestContext`
//! - `new_rest_handler`, building a `Router` with one block per path:
//!   context savers, then the path's middleware hook, then the verb routes;
//!   `root()` interceptors wrap the whole router
//! - one handler per endpoint calling the matching service method
//!
//! Handlers answer 201 for a successful Post with a value, 200 for other
//! values, 204 when the method returns nothing, 400 for an undecodable
//! body, and the `ServiceError` status (500 if invalid) on failure.

use blueprint_define::{Application, EndpointDef, HttpVerb};
use proc_macro2::{Ident, TokenStream};
use quote::quote;

use super::middleware::{ROOT_ACCESSOR, hook_accessor};
use super::{ident, rust_type, service_trait_name};
use crate::errors::GeneratorError;
use crate::inference::{
    Binding, MethodParam, ReturnShape, binding_of, method_params, return_shape,
};
use crate::naming::{context_key, method_name, to_snake_case};
use crate::routes::{RouteEntry, RouteTable, VerbRoute};
use crate::type_mapper::reference_type;

/// Distinct path-bound parameter names across endpoints in `order`.
pub fn context_params<'a>(
    app: &'a Application,
    order: &[&str],
) -> Result<Vec<&'a str>, GeneratorError> {
    let mut params: Vec<&str> = Vec::new();
    for name in order {
        let Some(endpoint) = app.endpoints.get(*name) else {
            continue;
        };
        for param in &endpoint.rest_params {
            if binding_of(endpoint, param)? == Binding::Path
                && !params.contains(&param.name.as_str())
            {
                params.push(&param.name);
            }
        }
    }
    Ok(params)
}

/// Generates the complete Rest artifact body.
pub fn generate_rest(
    app: &Application,
    order: &[&str],
    routes: &RouteTable,
    package: &str,
) -> Result<TokenStream, GeneratorError> {
    let package = ident(package, "package")?;
    let service = ident(&service_trait_name(app), "service interface name")?;

    let key_variants = context_params(app, order)?
        .into_iter()
        .map(context_variant)
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    let endpoints: Vec<&EndpointDef> = order
        .iter()
        .filter_map(|name| app.endpoints.get(*name))
        .collect();
    let uses_params = endpoints.iter().any(|ep| !ep.rest_params.is_empty());
    let uses_body = routes
        .iter()
        .flat_map(|entry| &entry.verbs)
        .any(|route| !route.payload_type.is_empty());

    let router = generate_router(routes)?;

    let mut handlers = TokenStream::new();
    for entry in routes.iter() {
        for route in &entry.verbs {
            let Some(endpoint) = app.endpoints.get(&route.endpoint) else {
                continue;
            };
            handlers.extend(generate_handler(endpoint, route)?);
        }
    }

    let parse_param = if uses_params {
        quote! {
            /// Parses a captured path or query value, falling back to the
            /// type's default when it is absent or malformed.
            fn parse_param<T: FromStr + Default>(raw: Option<&str>) -> T {
                raw.and_then(|value| value.parse().ok()).unwrap_or_default()
            }
        }
    } else {
        TokenStream::new()
    };

    let decode_json = if uses_body {
        quote! {
            /// Reads and decodes a JSON request body, answering 400 on failure.
            async fn decode_json<T: serde::de::DeserializeOwned>(request: Request) -> Result<T, Response> {
                let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
                    .await
                    .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()).into_response())?;
                serde_json::from_slice(&bytes)
                    .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()).into_response())
            }
        }
    } else {
        TokenStream::new()
    };

    Ok(quote! {
        use std::collections::HashMap;
        use std::str::FromStr;
        use std::sync::Arc;

        use axum::extract::{Request, State};
        use axum::http::StatusCode;
        use axum::middleware::{Next, from_fn};
        use axum::response::{IntoResponse, Response};
        use axum::{RequestExt, Router};

        use crate::#package::interface::*;
        use crate::#package::middleware::{Interceptor, InterceptorFuture, Middleware};

        type SharedService = Arc<dyn #service>;

        /// Keys for values captured from the request path.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ContextKey {
            #(#key_variants,)*
        }

        /// Path values captured by the context savers of a route.
        #[derive(Debug, Clone, Default)]
        pub struct RequestContext(HashMap<ContextKey, String>);

        impl RequestContext {
            pub fn get(&self, key: ContextKey) -> Option<&str> {
                self.0.get(&key).map(String::as_str)
            }

            fn insert(&mut self, key: ContextKey, value: String) {
                self.0.insert(key, value);
            }
        }

        /// Returns an interceptor storing the path parameter `url_param`
        /// in the request context under `key`.
        pub fn context_saver(key: ContextKey, url_param: &'static str) -> Interceptor {
            Arc::new(move |mut request: Request, next: Next| -> InterceptorFuture {
                Box::pin(async move {
                    if let Ok(params) = request.extract_parts::<axum::extract::RawPathParams>().await {
                        if let Some((_, value)) = params.iter().find(|(name, _)| *name == url_param) {
                            let value = value.to_string();
                            let mut context = request
                                .extensions()
                                .get::<RequestContext>()
                                .cloned()
                                .unwrap_or_default();
                            context.insert(key, value);
                            request.extensions_mut().insert(context);
                        }
                    }
                    next.run(request).await
                })
            })
        }

        /// Applies `interceptors` to the routes of `router`, first one outermost.
        fn with_interceptors(
            mut router: Router<SharedService>,
            interceptors: Vec<Interceptor>,
        ) -> Router<SharedService> {
            for interceptor in interceptors.into_iter().rev() {
                router = router.route_layer(from_fn(move |request: Request, next: Next| {
                    interceptor(request, next)
                }));
            }
            router
        }

        fn with_root(mut router: Router, interceptors: Vec<Interceptor>) -> Router {
            for interceptor in interceptors.into_iter().rev() {
                router = router.layer(from_fn(move |request: Request, next: Next| {
                    interceptor(request, next)
                }));
            }
            router
        }

        fn error_response(err: ServiceError) -> Response {
            let status = StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, err.message).into_response()
        }

        #parse_param

        #decode_json

        #router

        #handlers
    })
}

fn context_variant(param: &str) -> Result<Ident, GeneratorError> {
    ident(&context_key(param), &format!("context key of path parameter '{}'", param))
}

fn handler_name(route: &VerbRoute) -> Result<Ident, GeneratorError> {
    ident(
        &format!("handle_{}", to_snake_case(&route.method_name)),
        &format!("handler of '{}'", route.endpoint),
    )
}

fn generate_router(routes: &RouteTable) -> Result<TokenStream, GeneratorError> {
    let blocks = routes
        .iter()
        .map(generate_route_block)
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    Ok(quote! {
        /// Builds the REST router, dispatching to `service` and applying
        /// the interceptors supplied by `middleware`.
        pub fn new_rest_handler(service: SharedService, middleware: Arc<dyn Middleware>) -> Router {
            let mut router: Router<SharedService> = Router::new();
            #(#blocks)*
            with_root(router.with_state(service), middleware.root())
        }
    })
}

fn generate_route_block(entry: &RouteEntry) -> Result<TokenStream, GeneratorError> {
    let path = &entry.path;

    let mut method_router = TokenStream::new();
    for (i, route) in entry.verbs.iter().enumerate() {
        let handler = handler_name(route)?;
        let verb = verb_fn(route.verb);
        if i == 0 {
            method_router = quote! { axum::routing::#verb(#handler) };
        } else {
            method_router = quote! { #method_router.#verb(#handler) };
        }
    }

    let mut interceptors = Vec::new();
    for param in &entry.path_params {
        let variant = context_variant(param)?;
        interceptors.push(quote! {
            interceptors.push(context_saver(ContextKey::#variant, #param));
        });
    }
    if !entry.middleware.is_empty() {
        let accessor = hook_accessor(&entry.middleware)?;
        // root() already wraps the whole router
        if accessor != ROOT_ACCESSOR {
            let accessor = ident(&accessor, "middleware hook")?;
            interceptors.push(quote! {
                interceptors.extend(middleware.#accessor());
            });
        }
    }

    if interceptors.is_empty() {
        return Ok(quote! {
            router = router.route(#path, #method_router);
        });
    }

    Ok(quote! {
        {
            let routes = Router::new().route(#path, #method_router);
            let mut interceptors: Vec<Interceptor> = Vec::new();
            #(#interceptors)*
            router = router.merge(with_interceptors(routes, interceptors));
        }
    })
}

fn verb_fn(verb: HttpVerb) -> Ident {
    let name = match verb {
        HttpVerb::Get => "get",
        HttpVerb::Put => "put",
        HttpVerb::Post => "post",
        HttpVerb::Delete => "delete",
    };
    Ident::new(name, proc_macro2::Span::call_site())
}

fn generate_handler(endpoint: &EndpointDef, route: &VerbRoute) -> Result<TokenStream, GeneratorError> {
    let handler = handler_name(route)?;
    let method = ident(
        &to_snake_case(&method_name(endpoint)),
        &format!("method of '{}'", endpoint.name),
    )?;
    let params = method_params(endpoint)?;

    let has_path = params.iter().any(|p| p.binding == Binding::Path);
    let has_query = !route.query_params.is_empty();
    let has_body = !route.payload_type.is_empty();

    let mut extractors = vec![quote! { State(service): State<SharedService> }];
    if has_query {
        extractors.push(quote! {
            axum::extract::Query(query): axum::extract::Query<HashMap<String, String>>
        });
    }
    if has_path || has_body {
        extractors.push(quote! { request: Request });
    }

    let context = if has_path {
        quote! {
            let context = request
                .extensions()
                .get::<RequestContext>()
                .cloned()
                .unwrap_or_default();
        }
    } else {
        TokenStream::new()
    };

    let payload = if has_body {
        let ty = rust_type(&route.payload_type)?;
        quote! {
            let payload: #ty = match decode_json(request).await {
                Ok(payload) => payload,
                Err(response) => return response,
            };
        }
    } else {
        TokenStream::new()
    };

    let args = params
        .iter()
        .map(|param| argument(param, route))
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    let success = match return_shape(endpoint)? {
        ReturnShape::Nothing => quote! {
            Ok(()) => StatusCode::NO_CONTENT.into_response(),
        },
        ReturnShape::Value(payload) => {
            let ty = rust_type(&reference_type(&payload)?)?;
            let status = if route.verb == HttpVerb::Post {
                quote! { StatusCode::CREATED }
            } else {
                quote! { StatusCode::OK }
            };
            quote! {
                Ok(result) => {
                    let result: #ty = result;
                    (#status, axum::Json(result)).into_response()
                }
            }
        }
    };

    let doc = format!(" Handles `{}`.", endpoint.name);
    Ok(quote! {
        #[doc = #doc]
        async fn #handler(#(#extractors),*) -> Response {
            #context
            #payload
            match service.#method(#(#args),*).await {
                #success
                Err(err) => error_response(err),
            }
        }
    })
}

fn argument(param: &MethodParam, route: &VerbRoute) -> Result<TokenStream, GeneratorError> {
    let source = &param.source;
    let unrouted = || {
        GeneratorError::CodeGenError(format!(
            "parameter '{}' of '{}' has no source in its route",
            source, route.endpoint
        ))
    };
    Ok(match param.binding {
        Binding::Path => {
            let variant = context_variant(source)?;
            quote! { parse_param(context.get(ContextKey::#variant)) }
        }
        Binding::Query if route.query_params.contains(source) => {
            quote! { parse_param(query.get(#source).map(String::as_str)) }
        }
        Binding::Body if !route.payload_type.is_empty() => quote! { payload },
        Binding::Query | Binding::Body => return Err(unrouted()),
    })
}
