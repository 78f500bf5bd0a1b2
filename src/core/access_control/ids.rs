//! Identifier derivation
//!
//! Roles and principals are looked up by ids derived from their names, the
//! same ids the UI uses for its elements.

/// Sanitise free text into an id
///
/// Splits on `-` and whitespace, drops everything outside `[A-Za-z0-9-_]`,
/// turns `_` into `-`, lower-cases and joins the parts with `-`. Returns
/// `None` if nothing is left.
pub fn as_id(text: &str) -> Option<String> {
    let parts: Vec<String> = text
        .split(|c: char| c == '-' || c.is_whitespace())
        .map(|part| {
            part.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .map(|c| if c == '_' { '-' } else { c.to_ascii_lowercase() })
                .collect::<String>()
        })
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("-"))
    }
}

/// Join several names into one id, skipping empty ones
pub fn build_id(parts: &[&str]) -> String {
    parts
        .iter()
        .filter_map(|part| as_id(part))
        .collect::<Vec<_>>()
        .join("-")
}

/// Id of a role
pub fn role_id(name: &str) -> String {
    as_id(name).unwrap_or_default()
}

/// Id of a principal, e.g. `user-john`
pub fn principal_id(type_name: &str, name: &str) -> String {
    build_id(&[type_name, name])
}
