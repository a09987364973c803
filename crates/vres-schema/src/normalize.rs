//! # Section Item Normalizer
//!
//! Turns whatever was persisted or imported for a section into canonical
//! [`SectionItem`]s. Accepted shapes, per entry:
//!
//! - a plain string (lands in the section's primary field),
//! - `{ "text": ... }` (same),
//! - a typed object in editor or VC field names,
//! - a nested array (flattened one level).
//!
//! A whole section may also arrive as `{ "items": [...] }`, or, for skills
//! and hobbies, as one comma/newline separated string.
//!
//! Every table field is present on output with its kind's empty default.
//! When an item carries a `credentialLink` but no `selectedCredentials`,
//! the selection is rebuilt through the link codec; this is the single
//! place legacy link strings re-enter the model.

use serde_json::{Map, Value};

use vres_core::{first_array, first_bool, first_str};
use vres_link::{decode_with_report, SelectedCredential};

use crate::item::{SectionItem, VerificationStatus, VERIFICATION_KEYS};
use crate::section::{FieldKind, FieldSpec, SectionKind};
use crate::warning::{record, TransformWarning, Transformed};

/// Keys produced by the forward transform that never flow back as fields.
const DERIVED_KEYS: [&str; 2] = ["text", "attachedFiles"];

/// Which naming convention to try first when reading a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrder {
    /// Editor name, then legacy aliases, then the VC name.
    EditorFirst,
    /// VC name, then the editor name, then legacy aliases.
    VcFirst,
}

/// Read one table field from a raw item object, defaulting when absent.
pub fn read_field(source: &Value, spec: &FieldSpec, order: FieldOrder) -> Value {
    let mut paths: Vec<&str> = Vec::with_capacity(spec.aliases.len() + 2);
    match order {
        FieldOrder::EditorFirst => {
            paths.push(spec.editor);
            paths.extend_from_slice(spec.aliases);
            paths.push(spec.vc);
        }
        FieldOrder::VcFirst => {
            paths.push(spec.vc);
            paths.push(spec.editor);
            paths.extend_from_slice(spec.aliases);
        }
    }
    match spec.kind {
        FieldKind::Text => Value::String(first_str(source, &paths)),
        FieldKind::Flag => Value::Bool(first_bool(source, &paths)),
        FieldKind::List => Value::Array(read_list(source, &paths)),
    }
}

fn read_list(source: &Value, paths: &[&str]) -> Vec<Value> {
    let items = first_array(source, paths);
    if !items.is_empty() {
        return items.iter().filter_map(list_entry).collect();
    }
    split_plain_text(&first_str(source, paths))
        .into_iter()
        .map(Value::String)
        .collect()
}

fn list_entry(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(Value::String(s.trim().to_string())),
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Object(_) => {
            let name = first_str(value, &["name", "text"]);
            (!name.is_empty()).then_some(Value::String(name))
        }
        _ => None,
    }
}

/// Split a comma or newline separated string into trimmed, non-empty parts.
pub fn split_plain_text(s: &str) -> Vec<String> {
    s.split([',', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Normalize a raw section value into canonical items.
pub fn normalize_section(kind: SectionKind, raw: &Value) -> Transformed<Vec<SectionItem>> {
    normalize_entries(kind, &section_entries(kind, raw), FieldOrder::EditorFirst)
}

/// Normalize a list of raw entries, reading fields in `order`.
pub fn normalize_entries(
    kind: SectionKind,
    entries: &[Value],
    order: FieldOrder,
) -> Transformed<Vec<SectionItem>> {
    let mut warnings = Vec::new();
    let mut items = Vec::with_capacity(entries.len());
    for entry in flatten_entries(entries) {
        let index = items.len();
        if let Some(item) = normalize_entry(kind, entry, index, order, &mut warnings) {
            items.push(item);
        }
    }
    Transformed {
        value: items,
        warnings,
    }
}

/// Normalize one raw item. Returns `None` for values that hold no item
/// (null, booleans, blank strings).
pub fn normalize_item(kind: SectionKind, raw: &Value) -> Transformed<Option<SectionItem>> {
    let mut warnings = Vec::new();
    let item = normalize_entry(kind, raw, 0, FieldOrder::EditorFirst, &mut warnings);
    Transformed {
        value: item,
        warnings,
    }
}

/// The entries of a raw section value, before per-item normalization.
pub(crate) fn section_entries(kind: SectionKind, raw: &Value) -> Vec<Value> {
    match raw {
        Value::Array(items) => items.clone(),
        Value::Object(map) => match map.get("items") {
            Some(items) => section_entries(kind, items),
            None if map.is_empty() => Vec::new(),
            None => vec![raw.clone()],
        },
        Value::String(s) if kind.splits_plain_text() => split_plain_text(s)
            .into_iter()
            .map(Value::String)
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![raw.clone()],
        _ => Vec::new(),
    }
}

fn flatten_entries(entries: &[Value]) -> impl Iterator<Item = &Value> {
    entries.iter().flat_map(|entry| match entry {
        Value::Array(inner) => inner.iter().collect::<Vec<_>>(),
        other => vec![other],
    })
}

fn normalize_entry(
    kind: SectionKind,
    raw: &Value,
    index: usize,
    order: FieldOrder,
    warnings: &mut Vec<TransformWarning>,
) -> Option<SectionItem> {
    match raw {
        Value::String(s) if !s.trim().is_empty() => Some(primary_only(kind, s.trim())),
        Value::Number(n) => Some(primary_only(kind, &n.to_string())),
        Value::Object(map) => Some(typed_item(kind, raw, map, index, order, warnings)),
        _ => None,
    }
}

fn defaults(kind: SectionKind) -> Map<String, Value> {
    kind.fields()
        .iter()
        .map(|f| (f.editor.to_string(), f.kind.default_value()))
        .collect()
}

fn primary_only(kind: SectionKind, text: &str) -> SectionItem {
    let mut fields = defaults(kind);
    fields.insert(kind.primary_field().to_string(), Value::String(text.to_string()));
    SectionItem::from_fields(fields)
}

fn typed_item(
    kind: SectionKind,
    raw: &Value,
    map: &Map<String, Value>,
    index: usize,
    order: FieldOrder,
    warnings: &mut Vec<TransformWarning>,
) -> SectionItem {
    let mut fields: Map<String, Value> = kind
        .fields()
        .iter()
        .map(|spec| (spec.editor.to_string(), read_field(raw, spec, order)))
        .collect();

    let primary = kind.primary_field();
    if fields.get(primary).and_then(Value::as_str) == Some("") {
        let text = first_str(raw, &["text"]);
        if !text.is_empty() {
            fields.insert(primary.to_string(), Value::String(text));
        }
    }

    for (key, value) in map {
        if !kind.knows_field(key)
            && !VERIFICATION_KEYS.contains(&key.as_str())
            && !DERIVED_KEYS.contains(&key.as_str())
        {
            fields.insert(key.clone(), value.clone());
        }
    }

    let mut item = SectionItem::from_fields(fields);
    item.verification_status = VerificationStatus::parse(&first_str(raw, &["verificationStatus"]));
    let selection = stored_selection(kind, map, index, warnings);
    item.with_selection(selection)
}

/// The credential selection an item carries, rebuilding it from the
/// stored link when the explicit list is missing.
fn stored_selection(
    kind: SectionKind,
    map: &Map<String, Value>,
    index: usize,
    warnings: &mut Vec<TransformWarning>,
) -> Vec<SelectedCredential> {
    let listed: Vec<SelectedCredential> = map
        .get("selectedCredentials")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|v| serde_json::from_value::<SelectedCredential>(v.clone()).ok())
                .filter(|c| !c.id.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if !listed.is_empty() {
        return listed;
    }

    let link = match map.get("credentialLink") {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Array(_) | Value::Object(_))) => v.to_string(),
        _ => String::new(),
    };
    if link.trim().is_empty() {
        return Vec::new();
    }
    let report = decode_with_report(&link);
    for bad in &report.malformed {
        record(
            warnings,
            TransformWarning::MalformedToken {
                section: kind,
                index,
                position: bad.position,
                detail: bad.error.to_string(),
            },
        );
    }
    report.credentials
}
