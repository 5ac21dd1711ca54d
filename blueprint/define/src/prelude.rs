//! Convenient re-exports for building schemas.
//!
//! ```
//! use blueprint_define::prelude::*;
//!
//! let app = Application::new("Shop")
//!     .with_type("Item", TypeDef::tuple([("Name", TypeDef::primitive(Primitive::String).at(1))]))
//!     .with_endpoint(EndpointDef::new("GET /items").returns("Item"));
//! let schema = Schema::single(app);
//! assert_eq!(schema.apps.len(), 1);
//! ```

pub use crate::Attributes;
pub use crate::endpoint::{EndpointDef, HttpVerb, Param, Statement};
pub use crate::schema::{Application, LoadError, Schema};
pub use crate::types::{Primitive, TypeDef, TypeKind};
