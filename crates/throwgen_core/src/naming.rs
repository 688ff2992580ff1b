//! Naming laws for generated members.
//!
//! ## Notes
//! - Suffix stripping is exact, case-sensitive and applied once.
//! - Identifier checks follow the C# identifier shape (letter or `_` first, then letters, digits or `_`),
//!   using Unicode alphabetic/alphanumeric classes.

use crate::conventions::{EXCEPTION_SUFFIX, VERBATIM_PREFIX, WRAPPER_PREFIX};
use crate::keywords;

/// Remove `suffix` from the end of `name` once, if present.
///
/// An empty suffix leaves the name untouched.
///
/// ## Examples
/// ```rust
/// use throwgen_core::naming::strip_suffix;
///
/// assert_eq!(strip_suffix("TimeoutException", "Exception"), "Timeout");
/// assert_eq!(strip_suffix("ExceptionException", "Exception"), "Exception");
/// assert_eq!(strip_suffix("Fault", "Exception"), "Fault");
/// ```
pub fn strip_suffix<'a>(name: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() {
        return name;
    }
    name.strip_suffix(suffix).unwrap_or(name)
}

/// Derive the wrapper method name for an exception type's simple name.
pub fn wrapper_method_name(exception_simple_name: &str) -> String {
    format!("{WRAPPER_PREFIX}{}", strip_suffix(exception_simple_name, EXCEPTION_SUFFIX))
}

/// Check whether `name` is a well-formed identifier, optionally written in verbatim (`@name`) form.
pub fn is_identifier(name: &str) -> bool {
    let bare = name.strip_prefix(VERBATIM_PREFIX).unwrap_or(name);
    let mut chars = bare.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Spell an identifier for emission, prefixing reserved words with `@`.
pub fn escape_identifier(name: &str) -> String {
    if keywords::is_reserved(name) {
        format!("{VERBATIM_PREFIX}{name}")
    } else {
        name.to_string()
    }
}
