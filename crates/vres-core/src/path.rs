//! # Fallback Path Resolution
//!
//! Resume payloads arrive in several shapes: VC-shaped
//! (`credentialSubject.person.contact.fullName`), editor-shaped
//! (`contact.fullName`), or something in between. Every field read goes
//! through an ordered list of dotted paths; the first path that resolves to
//! a meaningful value wins and a missing field falls back to an empty
//! default. None of these functions fail.
//!
//! Path syntax: segments separated by `.`; a segment that parses as an
//! integer indexes into an array.

use serde_json::Value;

/// Resolve a single dotted path against a JSON value.
///
/// An empty path returns the value itself.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// First path that resolves to a non-null value.
pub fn first_of<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|p| lookup(value, p))
        .find(|v| !v.is_null())
}

/// First path that resolves to a non-empty string, or `""`.
///
/// Numbers are accepted and rendered with `to_string()`, since legacy
/// payloads sometimes carry numeric ids and years.
pub fn first_str(value: &Value, paths: &[&str]) -> String {
    paths
        .iter()
        .filter_map(|p| lookup(value, p))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// First path that resolves to a non-empty array, or an empty slice.
pub fn first_array<'a>(value: &'a Value, paths: &[&str]) -> &'a [Value] {
    paths
        .iter()
        .filter_map(|p| lookup(value, p))
        .find_map(|v| match v {
            Value::Array(items) if !items.is_empty() => Some(items.as_slice()),
            _ => None,
        })
        .unwrap_or(&[])
}

/// First path that resolves to a boolean (or `"true"`/`"false"`), or `false`.
pub fn first_bool(value: &Value, paths: &[&str]) -> bool {
    paths
        .iter()
        .filter_map(|p| lookup(value, p))
        .find_map(|v| match v {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        })
        .unwrap_or(false)
}
