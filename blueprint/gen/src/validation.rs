//! Pre-generation checks on a loaded schema.
//!
//! These run before any code is emitted so that a broken schema fails on
//! its first problem without producing partial output.
//!
//! ## Checks
//!
//! - **Single application**: a schema must hold exactly one application
//! - **Package name**: the output package must be a valid identifier
//! - **Endpoint keys**: each endpoint is keyed by its own name, and every
//!   name splits into `"<VERB> <path>"`
//!
//! ## Examples
//!
//! ```
//! use blueprint_define::{Application, EndpointDef, Schema};
//! use blueprint_gen::validation::{select_application, validate_application};
//!
//! let schema = Schema::single(
//!     Application::new("Notes").with_endpoint(EndpointDef::new("GET /notes").returns("Notes")),
//! );
//!
//! let app = select_application(&schema).unwrap();
//! assert!(validate_application(app).is_ok());
//! ```

use blueprint_define::{Application, Schema};
use tracing::debug;

use crate::codegen::ident;
use crate::errors::GeneratorError;
use crate::parser::parse_endpoint_name;

/// Returns the only application in `schema`.
///
/// ## Errors
///
/// - [`GeneratorError::NoApplication`] for an empty schema
/// - [`GeneratorError::MultipleApplications`] when more than one is present
pub fn select_application(schema: &Schema) -> Result<&Application, GeneratorError> {
    let mut apps = schema.apps.values();
    match (apps.next(), apps.next()) {
        (None, _) => Err(GeneratorError::NoApplication),
        (Some(app), None) => Ok(app),
        (Some(_), Some(_)) => Err(GeneratorError::MultipleApplications(schema.apps.len())),
    }
}

/// Checks that `name` can be used as the package module in generated
/// `use crate::<name>::...` paths.
pub fn validate_package(name: &str) -> Result<(), GeneratorError> {
    if name.is_empty() {
        return Err(GeneratorError::ConfigError(
            "package name must not be empty".to_string(),
        ));
    }
    ident(name, "package").map(|_| ())
}

/// Validates the endpoint table of an application.
///
/// ## Errors
///
/// - [`GeneratorError::ConfigError`] when an endpoint is stored under a key
///   other than its own name
/// - [`GeneratorError::MalformedEndpointName`] or
///   [`GeneratorError::InvalidHttpMethod`] for a bad endpoint name
pub fn validate_application(app: &Application) -> Result<(), GeneratorError> {
    for (key, endpoint) in &app.endpoints {
        if key != &endpoint.name {
            return Err(GeneratorError::ConfigError(format!(
                "endpoint stored under '{}' is named '{}'",
                key, endpoint.name
            )));
        }
        parse_endpoint_name(&endpoint.name)?;
    }

    debug!(
        app = %app.name,
        types = app.types.len(),
        endpoints = app.endpoints.len(),
        "application validated"
    );
    Ok(())
}
