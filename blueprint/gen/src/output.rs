//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of code generation: assembling the
//! generated pieces into complete Rust files, validating each one, formatting
//! it, and writing it to disk atomically.
//!
//! ## Output Structure
//!
//! One application produces one package directory:
//! ```text
//! <output_dir>/
//! ├── mod.rs          # Module declarations, re-exports and endpoint overview
//! ├── interface.rs    # Records, ServiceError and the service trait
//! ├── middleware.rs   # Interceptor alias and the Middleware trait
//! └── rest.rs         # Context keys, router constructor and handlers
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Fail fast**: the first schema problem aborts generation; nothing is written
//! - **Validation**: all generated code is parsed with `syn` before writing
//! - **Formatting**: output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: uses temp file + rename to prevent partial writes

use std::fs;
use std::path::Path;

use blueprint_define::{Application, Schema};
use proc_macro2::TokenStream;
use quote::quote;
use tracing::{debug, info};

use crate::codegen::{
    ModuleDocBuilder, generate_middleware, generate_records, generate_rest, generate_service_error,
    generate_service_trait,
};
use crate::errors::GeneratorError;
use crate::ordering::endpoint_order;
use crate::routes::{RouteTable, build_routes};
use crate::validation::{select_application, validate_application, validate_package};

/// Notice placed at the top of every generated file.
pub const GENERATED_NOTICE: &str = "// Code generated by blueprint-gen. DO NOT EDIT.";

/// The formatted artifacts for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    /// Records, `ServiceError` and the service trait
    pub interface: String,
    /// The `Middleware` trait
    pub middleware: String,
    /// Route wiring and handlers
    pub rest: String,
    /// The package root
    pub module: String,
}

impl GeneratedCode {
    /// File names paired with their contents, in write order.
    pub fn files(&self) -> [(&'static str, &str); 4] {
        [
            ("interface.rs", self.interface.as_str()),
            ("middleware.rs", self.middleware.as_str()),
            ("rest.rs", self.rest.as_str()),
            ("mod.rs", self.module.as_str()),
        ]
    }
}

/// Assembles `interface.rs`: records first, then the service contract.
pub fn assemble_interface(app: &Application, order: &[&str]) -> Result<TokenStream, GeneratorError> {
    let docs = ModuleDocBuilder::new(app, order).interface();
    let serde_use = if app.types.is_empty() {
        TokenStream::new()
    } else {
        quote! { use serde::{Deserialize, Serialize}; }
    };
    let records = generate_records(app)?;
    let service_error = generate_service_error();
    let service = generate_service_trait(app, order)?;

    Ok(quote! {
        #docs

        #serde_use

        #records

        #service_error

        #service
    })
}

/// Assembles `middleware.rs`.
pub fn assemble_middleware(app: &Application, order: &[&str]) -> Result<TokenStream, GeneratorError> {
    let docs = ModuleDocBuilder::new(app, order).middleware();
    let middleware = generate_middleware(app, order)?;

    Ok(quote! {
        #docs

        #middleware
    })
}

/// Assembles `rest.rs`.
pub fn assemble_rest(
    app: &Application,
    order: &[&str],
    routes: &RouteTable,
    package: &str,
) -> Result<TokenStream, GeneratorError> {
    let docs = ModuleDocBuilder::new(app, order).rest();
    let rest = generate_rest(app, order, routes, package)?;

    Ok(quote! {
        #docs

        #rest
    })
}

/// Assembles `mod.rs`, declaring the three artifacts and re-exporting
/// what a server needs to mount the routes.
pub fn assemble_module(app: &Application, order: &[&str]) -> TokenStream {
    let docs = ModuleDocBuilder::new(app, order).module();

    quote! {
        #docs

        pub mod interface;
        pub mod middleware;
        pub mod rest;

        pub use interface::*;
        pub use middleware::{Interceptor, InterceptorFuture, Middleware};
        pub use rest::{ContextKey, RequestContext, context_saver, new_rest_handler};
    }
}

/// Validates generated code using syn.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats a parsed file with prettyplease, prefixed by [`GENERATED_NOTICE`].
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!("{}\n\n{}", GENERATED_NOTICE, formatted)
}

fn render(tokens: &TokenStream, artifact: &str) -> Result<String, GeneratorError> {
    let file = validate_code(tokens)?;
    let formatted = format_code(&file);
    info!(artifact, bytes = formatted.len(), "artifact generated");
    Ok(formatted)
}

/// Writes content to a file atomically using temp file + rename.
///
/// Other processes see either the old or the new content, never a mix.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if parent directories cannot be
/// created, the temp file cannot be written, or the rename fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    debug!(path = %path.display(), "wrote file");
    Ok(())
}

/// Derives the package name from the output directory: its last path
/// segment, ignoring trailing separators.
///
/// ## Examples
///
/// ```
/// use blueprint_gen::output::package_from_output_dir;
///
/// assert_eq!(package_from_output_dir("src/refdata/"), "refdata");
/// assert_eq!(package_from_output_dir("store"), "store");
/// ```
pub fn package_from_output_dir(output_dir: &str) -> String {
    output_dir
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Generates all artifacts for the single application in `schema`.
///
/// Pure: nothing is written. Stops at the first error.
///
/// ## Errors
///
/// Returns any [`GeneratorError`] raised while selecting, validating,
/// ordering or emitting the application.
pub fn generate(schema: &Schema, package: &str) -> Result<GeneratedCode, GeneratorError> {
    let app = select_application(schema)?;
    validate_package(package)?;
    validate_application(app)?;

    let order = endpoint_order(&app.endpoints);
    let routes = build_routes(app, &order)?;
    info!(
        app = %app.name,
        package,
        routes = routes.len(),
        "generating application"
    );

    Ok(GeneratedCode {
        interface: render(&assemble_interface(app, &order)?, "interface")?,
        middleware: render(&assemble_middleware(app, &order)?, "middleware")?,
        rest: render(&assemble_rest(app, &order, &routes, package)?, "rest")?,
        module: render(&assemble_module(app, &order), "module")?,
    })
}

/// Generates all artifacts and writes them to `output_dir`.
///
/// When `package` is `None` it is derived with
/// [`package_from_output_dir`]. In dry-run mode the files are printed to
/// stdout instead of written.
///
/// ## Errors
///
/// Returns an error if generation fails or a file cannot be written.
pub fn generate_and_write(
    schema: &Schema,
    output_dir: &Path,
    package: Option<&str>,
    dry_run: bool,
) -> Result<GeneratedCode, GeneratorError> {
    let package = match package {
        Some(name) => name.to_string(),
        None => package_from_output_dir(&output_dir.to_string_lossy()),
    };
    let code = generate(schema, &package)?;

    if dry_run {
        for (filename, content) in code.files() {
            println!("=== {} ===\n{}\n", filename, content);
        }
    } else {
        for (filename, content) in code.files() {
            write_atomic(&output_dir.join(filename), content)?;
        }
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{reference_data_app, reference_data_schema};
    use blueprint_define::{EndpointDef, Primitive, TypeDef};
    use tempfile::TempDir;

    #[test]
    fn files_are_listed_in_write_order() {
        let code = generate(&reference_data_schema(), "refdata").unwrap();
        let names: Vec<&str> = code.files().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["interface.rs", "middleware.rs", "rest.rs", "mod.rs"]);
    }

    #[test]
    fn every_artifact_carries_the_notice() {
        let code = generate(&reference_data_schema(), "refdata").unwrap();
        for (name, content) in code.files() {
            assert!(
                content.starts_with(GENERATED_NOTICE),
                "{} is missing the notice",
                name
            );
        }
    }

    #[test]
    fn interface_puts_records_before_the_service() {
        let code = generate(&reference_data_schema(), "refdata").unwrap();
        let record = code.interface.find("pub struct RefData").unwrap();
        let service = code.interface.find("pub trait Storer").unwrap();
        assert!(record < service);
        assert!(code.interface.contains("use serde::{Deserialize, Serialize};"));
    }

    #[test]
    fn interface_without_types_skips_serde_import() {
        let schema = Schema::single(
            Application::new("Ping").with_endpoint(EndpointDef::new("GET /ping").returns_nothing()),
        );
        let code = generate(&schema, "ping").unwrap();
        assert!(!code.interface.contains("use serde"));
        assert!(code.interface.contains("async fn get_ping(&self) -> Result<(), ServiceError>;"));
    }

    #[test]
    fn module_declares_artifacts() {
        let code = generate(&reference_data_schema(), "refdata").unwrap();
        assert!(code.module.contains("pub mod interface;"));
        assert!(code.module.contains("pub mod middleware;"));
        assert!(code.module.contains("pub mod rest;"));
        assert!(code.module.contains("## Endpoints"));
    }

    #[test]
    fn rest_imports_from_package() {
        let code = generate(&reference_data_schema(), "refdata").unwrap();
        assert!(code.rest.contains("use crate::refdata::interface::*;"));
    }

    #[test]
    fn first_error_aborts_generation() {
        let app = reference_data_app()
            .with_type("Loose", TypeDef::primitive(Primitive::String).at(1));
        let err = generate(&Schema::single(app), "refdata").unwrap_err();
        assert!(matches!(err, GeneratorError::NotARecord(name) if name == "Loose"));
    }

    #[test]
    fn invalid_package_is_rejected() {
        let err = generate(&reference_data_schema(), "ref-data").unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidIdentifier { .. }));
    }

    #[test]
    fn package_from_output_dir_takes_last_segment() {
        assert_eq!(package_from_output_dir("gen/refdata"), "refdata");
        assert_eq!(package_from_output_dir("gen/refdata///"), "refdata");
        assert_eq!(package_from_output_dir("refdata"), "refdata");
    }

    #[test]
    fn validate_code_rejects_garbage() {
        let tokens = quote! { fn broken };
        assert!(matches!(
            validate_code(&tokens),
            Err(GeneratorError::CodeGenError(_))
        ));
    }

    #[test]
    fn write_atomic_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/out.rs");

        write_atomic(&path, "fn main() {}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fn main() {}");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn generate_and_write_writes_all_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("refdata");

        let code = generate_and_write(&reference_data_schema(), &out, None, false).unwrap();

        for (name, content) in code.files() {
            assert_eq!(fs::read_to_string(out.join(name)).unwrap(), content);
        }
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("refdata");

        generate_and_write(&reference_data_schema(), &out, Some("refdata"), true).unwrap();

        assert!(!out.exists());
    }

    #[test]
    fn failed_generation_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("refdata");
        let schema = Schema::new();

        let err = generate_and_write(&schema, &out, None, false).unwrap_err();

        assert!(matches!(err, GeneratorError::NoApplication));
        assert!(!out.exists());
    }
}
