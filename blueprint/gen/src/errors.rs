//! Error types for the blueprint generator.

use blueprint_define::LoadError;
use thiserror::Error;

/// Errors that can occur during code generation.
///
/// Every failure ends the generation pass; no partial output is produced.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The schema holds no application
    #[error("No application found in schema")]
    NoApplication,

    /// The schema holds more than one application
    #[error("Expected exactly one application in schema, found {0}")]
    MultipleApplications(usize),

    /// A top-level type is not a tuple
    #[error("Top-level type '{0}' must be a record")]
    NotARecord(String),

    /// A list or set wraps another composite type
    #[error("Cannot handle nested composite type: {0}")]
    NestedComposite(String),

    /// A tuple was handed to the type mapper directly
    #[error("A record type cannot be used inline as a field type")]
    RecordAsField,

    /// A reference names a scoped path with more than one segment
    #[error("Cannot handle a multi-segment type reference: {0}")]
    MultiSegmentReference(String),

    /// A `map of K:V` reference without exactly one key/value pair
    #[error("Bad map definition '{0}', expected KeyType:ValueType")]
    BadMapDefinition(String),

    /// The primitive has no target type
    #[error("Unsupported primitive type: {0}")]
    UnsupportedPrimitive(String),

    /// No source line can be recovered for a type or field
    #[error("Cannot find source position for '{0}'")]
    MissingPosition(String),

    /// Endpoint name is not `"<VERB> <path>"`
    #[error("Malformed endpoint name '{0}', expected \"<VERB> <path>\"")]
    MalformedEndpointName(String),

    /// Endpoint verb is not one of Get, Put, Post, Delete
    #[error("Invalid HTTP method '{method}' in endpoint '{endpoint}'")]
    InvalidHttpMethod { endpoint: String, method: String },

    /// Two endpoints bind the same verb on the same path
    #[error("Duplicate route {verb} {path}")]
    DuplicateRoute { verb: String, path: String },

    /// A Get or Delete endpoint declares a body parameter
    #[error("Endpoint '{endpoint}' declares a body, which {verb} requests cannot carry")]
    BodyNotAllowed { endpoint: String, verb: String },

    /// No statement decides the endpoint's return shape
    #[error("Return missing in endpoint '{0}'")]
    MissingReturn(String),

    /// The body parameter is not a named type
    #[error("Body parameter '{param}' of endpoint '{endpoint}' must reference a named type")]
    BodyNotReference { endpoint: String, param: String },

    /// A path/query parameter cannot be parsed from URL text
    #[error("Parameter '{param}' of endpoint '{endpoint}' cannot be read from a URL")]
    UnsupportedParameter { endpoint: String, param: String },

    /// A name derived from the schema is not a valid Rust identifier
    #[error("Invalid identifier '{name}' for {context}")]
    InvalidIdentifier { name: String, context: String },

    /// A type expression derived from the schema does not parse
    #[error("Invalid type '{name}': {reason}")]
    InvalidType { name: String, reason: String },

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load the schema
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
