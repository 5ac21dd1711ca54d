//! Identifier synthesis from schema names.
//!
//! Derives method names, serialization keys and context keys from schema
//! text, plus the snake_case forms used for generated Rust items.
//!
//! ## Examples
//!
//! ```
//! use blueprint_gen::naming::{context_key, method_name_from, serialization_key_from, to_snake_case};
//!
//! assert_eq!(
//!     method_name_from("GET /api/admin/{key}/creation-times"),
//!     "GetApiAdminKeyCreationTimes"
//! );
//! assert_eq!(serialization_key_from("LastName", "-"), "last-name");
//! assert_eq!(context_key("startTime"), "StartTimeKey");
//! assert_eq!(to_snake_case("GetApiAdminKeyCreationTimes"), "get_api_admin_key_creation_times");
//! ```

use blueprint_define::{EndpointDef, TypeDef, TypeKind};

/// Characters that separate words in an endpoint name.
const WORD_SEPARATORS: &[char] = &['-', '_', '.', ',', '#'];

/// Suffix appended to a title-cased path parameter to form its context key.
const CONTEXT_KEY_SUFFIX: &str = "Key";

/// Returns the method name for an endpoint.
///
/// The `method_name` attribute wins; otherwise the name is synthesized
/// from the endpoint's `"<VERB> <path>"` text.
pub fn method_name(endpoint: &EndpointDef) -> String {
    match endpoint.attr("method_name") {
        Some(name) => name.to_string(),
        None => method_name_from(&endpoint.name),
    }
}

/// Synthesizes a method name from endpoint text.
///
/// Braces and whitespace are dropped, then every `/ - _ . , #` starts a new
/// segment and each segment is title-cased.
pub fn method_name_from(endpoint_name: &str) -> String {
    endpoint_name
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '{' && *c != '}')
        .map(|c| if WORD_SEPARATORS.contains(&c) { '/' } else { c })
        .collect::<String>()
        .split('/')
        .map(title_case)
        .collect()
}

/// Returns the JSON property name for a record field.
///
/// The field type's `json` attribute wins; for lists and sets the inner
/// type's attribute is consulted.
pub fn serialization_key(field: &str, ty: &TypeDef, separator: &str) -> String {
    let attr_owner = match &ty.kind {
        TypeKind::List(inner) | TypeKind::Set(inner) => inner,
        _ => ty,
    };
    match attr_owner.attr("json") {
        Some(key) => key.to_string(),
        None => serialization_key_from(field, separator),
    }
}

/// Splits `field` at uppercase letters and joins the lowercased parts with
/// `separator`. An empty separator leaves the name untouched.
pub fn serialization_key_from(field: &str, separator: &str) -> String {
    if separator.is_empty() {
        return field.to_string();
    }
    split_uppercase(field).join(separator)
}

/// Context key for a path parameter: `id` becomes `IdKey`.
pub fn context_key(param: &str) -> String {
    format!("{}{}", capitalize(param), CONTEXT_KEY_SUFFIX)
}

/// Capitalizes the first letter of every whitespace-separated word.
///
/// Whitespace is kept, so a multi-word value never becomes a valid
/// identifier by accident.
pub fn title_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

/// Converts a CamelCase, camelCase or separated name to snake_case.
pub fn to_snake_case(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .flat_map(split_camel_case)
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Splits at every uppercase letter; the first character always starts a
/// segment. Segments are lowercased.
fn split_uppercase(s: &str) -> Vec<String> {
    let mut bounds: Vec<usize> = s
        .char_indices()
        .filter(|(pos, c)| *pos == 0 || c.is_uppercase())
        .map(|(pos, _)| pos)
        .collect();
    bounds.push(s.len());
    bounds
        .windows(2)
        .map(|w| s[w[0]..w[1]].to_lowercase())
        .collect()
}

/// Splits a CamelCase string into words, keeping acronyms together.
///
/// - "CreationTimes" -> ["Creation", "Times"]
/// - "userID" -> ["user", "ID"]
/// - "HTTPServer" -> ["HTTP", "Server"]
fn split_camel_case(s: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut word_start = 0;
    let chars: Vec<(usize, char)> = s.char_indices().collect();

    for i in 1..chars.len() {
        let (idx, current) = chars[i];
        let prev = chars[i - 1].1;

        let is_new_word = current.is_uppercase()
            && (prev.is_lowercase()
                || prev.is_ascii_digit()
                || (i + 1 < chars.len() && chars[i + 1].1.is_lowercase() && prev.is_uppercase()));

        if is_new_word {
            if idx > word_start {
                words.push(&s[word_start..idx]);
            }
            word_start = idx;
        }
    }

    if word_start < s.len() {
        words.push(&s[word_start..]);
    }

    words
}

fn title_case(segment: &str) -> String {
    capitalize(&segment.to_lowercase())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
