//! Module documentation for the generated artifacts.
//!
//! The [`ModuleDocBuilder`] renders `#![doc]` attributes: an introduction
//! naming the application, and for the module root an endpoint overview
//! grouped by HTTP verb with the service method each endpoint maps to.

use std::collections::BTreeMap;

use blueprint_define::Application;
use proc_macro2::TokenStream;
use quote::quote;

use super::service_trait_name;
use crate::naming::{method_name, to_snake_case};
use crate::parser::parse_endpoint_name;

/// Builds module-level documentation for one application.
///
/// ## Examples
///
/// ```
/// use blueprint_define::Application;
/// use blueprint_gen::codegen::ModuleDocBuilder;
///
/// let app = Application::new("RefData");
/// let docs = ModuleDocBuilder::new(&app, &[]).interface();
/// assert!(docs.to_string().contains("RefData"));
/// ```
pub struct ModuleDocBuilder<'a> {
    app: &'a Application,
    order: &'a [&'a str],
}

impl<'a> ModuleDocBuilder<'a> {
    pub fn new(app: &'a Application, order: &'a [&'a str]) -> Self {
        Self { app, order }
    }

    /// Docs for the records and service contract.
    pub fn interface(&self) -> TokenStream {
        let intro = format!(
            " Records and the `{}` service contract for the {} API.",
            service_trait_name(self.app),
            self.app.name
        );
        quote! { #![doc = #intro] }
    }

    /// Docs for the middleware contract.
    pub fn middleware(&self) -> TokenStream {
        let intro = format!(
            " Middleware hooks for the {} API routes.",
            self.app.name
        );
        quote! { #![doc = #intro] }
    }

    /// Docs for the route wiring.
    pub fn rest(&self) -> TokenStream {
        let intro = format!(
            " axum routes and handlers for the {} API.",
            self.app.name
        );
        quote! { #![doc = #intro] }
    }

    /// Docs for the module root, with an endpoint overview.
    pub fn module(&self) -> TokenStream {
        let intro = format!(" Generated server scaffolding for the {} API.", self.app.name);
        let endpoints = self.endpoints_section();
        quote! {
            #![doc = #intro]
            //!
            #![doc = #endpoints]
        }
    }

    /// Groups endpoints by verb, keeping endpoint order within a verb.
    fn categorize_endpoints(&self) -> BTreeMap<String, Vec<(String, String)>> {
        let mut categories: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
        for name in self.order {
            let Some(endpoint) = self.app.endpoints.get(*name) else {
                continue;
            };
            let Ok((verb, path)) = parse_endpoint_name(&endpoint.name) else {
                continue;
            };
            categories
                .entry(verb.to_string().to_uppercase())
                .or_default()
                .push((path.to_string(), to_snake_case(&method_name(endpoint))));
        }
        categories
    }

    fn endpoints_section(&self) -> String {
        let categories = self.categorize_endpoints();
        if categories.is_empty() {
            return " ## Endpoints\n\n No endpoints defined.".to_string();
        }

        let mut lines = vec![" ## Endpoints".to_string(), String::new()];
        for (verb, endpoints) in &categories {
            lines.push(format!(" **{}**:", verb));
            for (path, method) in endpoints {
                lines.push(format!(" - `{}` - `{}`", path, method));
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }
}
