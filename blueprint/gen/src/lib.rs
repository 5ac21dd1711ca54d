//! Blueprint code generator library.
//!
//! This crate turns one application from a `blueprint-define` schema into
//! server scaffolding for axum. The generated package contains:
//!
//! - One serde record struct per schema type
//! - A `ServiceError` type and an async service trait with one method per endpoint
//! - A `Middleware` trait exposing one interceptor list per hook name
//! - A `new_rest_handler()` constructor wiring every route to its handler
//!
//! ## Modules
//!
//! - [`codegen`] - Token generation for records, service, middleware and routes
//! - [`output`] - Final assembly, validation, and file writing
//! - [`validation`] - Schema checks that run before generation
//! - [`ordering`] - Declaration order of types and endpoints
//! - [`routes`] - Grouping endpoints into per-path route entries
//! - [`inference`] - Parameter bindings and return shapes
//! - [`naming`] - Method names, serialization keys and context keys
//! - [`type_mapper`] - Schema types to Rust types
//! - [`parser`] - Endpoint name and path template parsing
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use blueprint_define::Schema;
//! use blueprint_gen::output::generate_and_write;
//!
//! let schema = Schema::from_path(Path::new("refdata.json")).unwrap();
//!
//! // Writes interface.rs, middleware.rs, rest.rs and mod.rs
//! let code = generate_and_write(&schema, Path::new("src/refdata"), None, false).unwrap();
//! println!("{}", code.interface);
//! ```
//!
//! ## Generated Code Structure
//!
//! For an application with a `RefData` record and the endpoints
//! `GET /refdata/{key}` and `PUT /refdata/{key}`:
//!
//! ```text
//! // interface.rs
//! pub struct RefData { ... }
//! pub struct ServiceError { pub status: u16, pub message: String }
//!
//! #[async_trait::async_trait]
//! pub trait Storer: Send + Sync {
//!     async fn get_refdata_key(&self, key: String) -> Result<RefData, ServiceError>;
//!     async fn put_refdata_key(&self, key: String, data: RefData) -> Result<(), ServiceError>;
//! }
//!
//! // rest.rs
//! pub fn new_rest_handler(service: SharedService, middleware: Arc<dyn Middleware>) -> Router;
//! ```

pub mod codegen;
pub mod errors;
pub mod inference;
pub mod naming;
pub mod ordering;
pub mod output;
pub mod parser;
pub mod routes;
pub mod type_mapper;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_utils;
