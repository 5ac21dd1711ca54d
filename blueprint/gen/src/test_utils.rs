//! Shared test utilities for blueprint-gen tests.
//!
//! Provides the reference-data fixture application and helpers to format
//! generated token streams for assertions.

use blueprint_define::{Application, EndpointDef, Primitive, Schema, TypeDef};
use proc_macro2::TokenStream;

/// A small reference-data service: two records and five endpoints over
/// three paths, with three middleware hooks.
///
/// Endpoint order is `GET /refdata`, `POST /refdata`,
/// `GET /refdata/{key}`, `PUT /refdata/{key}`,
/// `DELETE /refdata/{key}/{startTime}`.
pub fn reference_data_app() -> Application {
    Application::new("RefData")
        .with_attr("json_property_separator", "-")
        .with_attr("interface_doc", "Storer abstracts reference data persistence")
        .with_type(
            "RefData",
            TypeDef::tuple([
                ("Key", TypeDef::primitive(Primitive::String).at(2)),
                ("Value", TypeDef::primitive(Primitive::Any).at(3)),
                ("StartTime", TypeDef::primitive(Primitive::DateTime).at(4)),
            ])
            .with_attr("doc", "RefData holds a value valid from its start time"),
        )
        .with_type(
            "Keys",
            TypeDef::tuple([(
                "Keys",
                TypeDef::list(TypeDef::primitive(Primitive::String).at(7)),
            )])
            .with_attr("doc", "Keys lists every known key"),
        )
        .with_endpoint(
            EndpointDef::new("GET /refdata")
                .with_attr("middleware", "AuthorizeRoot")
                .with_attr("method_doc", "Lists all keys")
                .returns("Keys"),
        )
        .with_endpoint(
            EndpointDef::new("POST /refdata")
                .with_attr("middleware", "AuthorizeRoot")
                .body("data", TypeDef::reference("RefData"))
                .returns("RefData"),
        )
        .with_endpoint(
            EndpointDef::new("GET /refdata/{key}")
                .with_attr("middleware", "AuthorizeData")
                .rest_param("key", TypeDef::reference("string").at(10))
                .rest_param("time", TypeDef::primitive(Primitive::String).at(10))
                .returns("RefData"),
        )
        .with_endpoint(
            EndpointDef::new("PUT /refdata/{key}")
                .with_attr("middleware", "AuthorizeData")
                .rest_param("key", TypeDef::reference("string").at(11))
                .body("data", TypeDef::reference("RefData"))
                .returns_nothing(),
        )
        .with_endpoint(
            EndpointDef::new("DELETE /refdata/{key}/{startTime}")
                .with_attr("middleware", "AuthorizeAdmin")
                .rest_param("key", TypeDef::reference("string").at(12))
                .rest_param("startTime", TypeDef::reference("string").at(12))
                .returns_nothing(),
        )
}

/// [`reference_data_app`] wrapped in a schema.
pub fn reference_data_schema() -> Schema {
    Schema::single(reference_data_app())
}

/// Formats generated code using prettyplease.
///
/// ## Errors
///
/// Returns an error string if the code fails to parse.
pub fn format_generated_code(tokens: &TokenStream) -> Result<String, String> {
    let file = syn::parse2::<syn::File>(tokens.clone()).map_err(|e| e.to_string())?;
    Ok(prettyplease::unparse(&file))
}

/// Removes all whitespace, for assertions that must not depend on line
/// wrapping.
pub fn compact(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_data_app_has_records_and_endpoints() {
        let app = reference_data_app();
        assert_eq!(app.types.len(), 2);
        assert_eq!(app.endpoints.len(), 5);
        assert_eq!(reference_data_schema().apps.len(), 1);
    }

    #[test]
    fn compact_drops_whitespace() {
        assert_eq!(compact("a (\n  b ,\tc )"), "a(b,c)");
    }
}
