//! Endpoint name parsing and path parameter extraction.
//!
//! Endpoint names have the form `"<VERB> <path>"`; paths use `{param}`
//! placeholders.

use std::str::FromStr;

use blueprint_define::HttpVerb;

use crate::errors::GeneratorError;

/// Splits an endpoint name into its verb and path template.
///
/// ## Examples
///
/// ```
/// use blueprint_define::HttpVerb;
/// use blueprint_gen::parser::parse_endpoint_name;
///
/// let (verb, path) = parse_endpoint_name("get /api/{key}").unwrap();
/// assert_eq!(verb, HttpVerb::Get);
/// assert_eq!(path, "/api/{key}");
///
/// assert!(parse_endpoint_name("GET").is_err());
/// assert!(parse_endpoint_name("BADMETHOD /x").is_err());
/// ```
pub fn parse_endpoint_name(name: &str) -> Result<(HttpVerb, &str), GeneratorError> {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    let [method, path] = tokens.as_slice() else {
        return Err(GeneratorError::MalformedEndpointName(name.to_string()));
    };
    let verb = HttpVerb::from_str(method).map_err(|_| GeneratorError::InvalidHttpMethod {
        endpoint: name.to_string(),
        method: method.to_string(),
    })?;
    Ok((verb, *path))
}

/// Extracts parameter names from a path template.
///
/// ## Examples
///
/// ```
/// use blueprint_gen::parser::extract_path_params;
///
/// assert_eq!(extract_path_params("/refdata"), vec![] as Vec<&str>);
/// assert_eq!(extract_path_params("/refdata/{key}"), vec!["key"]);
/// assert_eq!(
///     extract_path_params("/api/{key}/versions/{version}"),
///     vec!["key", "version"]
/// );
/// ```
pub fn extract_path_params(path: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut pos = 0;

    for (idx, c) in path.char_indices() {
        if c == '{' {
            pos = idx + 1;
        } else if c == '}' && pos > 0 {
            let param = &path[pos..idx];
            if !param.is_empty() {
                params.push(param);
            }
            pos = 0;
        }
    }

    params
}
