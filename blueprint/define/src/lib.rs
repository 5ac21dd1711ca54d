//! Blueprint Definition Library
//!
//! This crate provides the schema data model consumed by `blueprint-gen`:
//! one application with its data types and HTTP-style endpoints.
//!
//! ## Core Types
//!
//! - [`Schema`] - The loaded description, holding applications by name
//! - [`Application`] - Types, endpoints and configuration attributes
//! - [`TypeDef`] / [`TypeKind`] - Primitive, reference, list, set and tuple types
//! - [`Primitive`] - Primitive kinds (`string`, `int`, `datetime`, ...)
//! - [`EndpointDef`] - An endpoint named `"<VERB> <path>"` with its parameters
//! - [`HttpVerb`] - The verbs an endpoint may use
//! - [`Statement`] - Endpoint statements used to infer the return shape
//!
//! ## Examples
//!
//! ```
//! use blueprint_define::{Application, EndpointDef, Primitive, Schema, TypeDef};
//!
//! let app = Application::new("People")
//!     .with_attr("json_property_separator", "-")
//!     .with_type(
//!         "Person",
//!         TypeDef::tuple([
//!             ("FirstName", TypeDef::primitive(Primitive::String).at(2)),
//!             ("LastName", TypeDef::primitive(Primitive::String).at(3)),
//!         ]),
//!     )
//!     .with_endpoint(
//!         EndpointDef::new("GET /people/{id}")
//!             .rest_param("id", TypeDef::reference("string").at(10))
//!             .returns("Person"),
//!     );
//!
//! let schema = Schema::single(app);
//! assert_eq!(schema.apps["People"].endpoints.len(), 1);
//! ```
//!
//! Schemas can also be loaded from JSON with [`Schema::from_json_str`] or
//! [`Schema::from_path`].

use std::collections::BTreeMap;

pub mod endpoint;
pub mod prelude;
pub mod schema;
pub mod types;

pub use endpoint::{EndpointDef, HttpVerb, Param, Statement};
pub use schema::{Application, LoadError, Schema};
pub use types::{Primitive, TypeDef, TypeKind};

/// Free-form key/value attributes attached to applications, types and endpoints.
pub type Attributes = BTreeMap<String, String>;
