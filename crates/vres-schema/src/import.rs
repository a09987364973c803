//! # Drive / Import Payload Mapper
//!
//! Imported resumes arrive in whatever envelope the source produced. The
//! real content is located by trying a fixed list of nesting conventions
//! in order; every field is then read through the fallback path resolver,
//! VC-shaped path first and editor-shaped path second. Nothing here fails:
//! a payload that matches no convention yields an empty document plus a
//! `SchemaMismatch` warning.

use serde_json::Value;

use vres_core::{first_of, first_str, lookup};

use crate::document::{Contact, ResumeDocument, Section, SocialLinks};
use crate::item::SectionItem;
use crate::normalize::{normalize_entries, section_entries, FieldOrder};
use crate::section::SectionKind;
use crate::warning::{record, TransformWarning, Transformed};

/// Nesting conventions, tried in order.
const CONTENT_PATHS: [&str; 4] = [
    "credentialSubject",
    "content.credentialSubject",
    "data.credentialSubject",
    "data.content.credentialSubject",
];

/// Top-level keys that mark a value as resume content.
const CONTENT_MARKERS: [&str; 5] = ["person", "contact", "narrative", "summary", "name"];

/// Map an imported payload onto the editor document.
pub fn from_imported_payload(payload: &Value) -> Transformed<ResumeDocument> {
    let mut warnings = Vec::new();
    let content = locate_content(payload);
    if !looks_like_resume(content) {
        record(
            &mut warnings,
            TransformWarning::SchemaMismatch {
                detail: "no resume content found under any known nesting".to_string(),
            },
        );
    }

    let mut doc = ResumeDocument {
        id: first_str(content, &["id"]),
        name: first_non_empty([first_str(content, &["name", "title"]), first_str(payload, &["name"])]),
        contact: read_contact(content),
        summary: first_str(
            content,
            &["narrative.text", "summary", "professionalSummary", "about"],
        ),
        last_updated: first_non_empty([
            first_str(content, &["lastUpdated", "updatedAt"]),
            first_str(payload, &["lastUpdated", "modifiedTime", "updatedAt"]),
        ]),
        ..ResumeDocument::default()
    };

    for kind in SectionKind::ALL {
        let entries = raw_section(content, kind);
        let normalized = normalize_entries(kind, &entries, FieldOrder::VcFirst);
        warnings.extend(normalized.warnings);
        let items = if kind == SectionKind::Experience {
            dedupe_experience(normalized.value)
        } else {
            normalized.value
        };
        *doc.section_mut(kind) = Section::new(items);
    }

    Transformed {
        value: doc,
        warnings,
    }
}

/// The object holding the resume, by the first matching convention.
fn locate_content(payload: &Value) -> &Value {
    if let Some((path, content)) = CONTENT_PATHS
        .iter()
        .find_map(|path| lookup(payload, path).filter(|v| v.is_object()).map(|v| (*path, v)))
    {
        tracing::debug!(convention = path, "located import content");
        return content;
    }
    match payload.get("data") {
        Some(data) if data.is_object() => {
            tracing::debug!(convention = "data", "located import content");
            data
        }
        _ => payload,
    }
}

pub(crate) fn looks_like_resume(content: &Value) -> bool {
    let Some(map) = content.as_object() else {
        return false;
    };
    CONTENT_MARKERS.iter().any(|key| map.contains_key(*key))
        || SectionKind::ALL
            .iter()
            .any(|kind| map.contains_key(kind.vc_key()) || map.contains_key(kind.editor_key()))
}

fn first_non_empty<const N: usize>(candidates: [String; N]) -> String {
    candidates
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn contact_field(content: &Value, field: &str) -> String {
    let vc_path = format!("person.contact.{field}");
    let editor_path = format!("contact.{field}");
    first_str(content, &[vc_path.as_str(), editor_path.as_str()])
}

pub(crate) fn read_contact(content: &Value) -> Contact {
    let read = |field: &str| contact_field(content, field);
    let mut full_name = read("fullName");
    if full_name.is_empty() {
        full_name = first_str(content, &["person.name.formattedName"]);
    }
    Contact {
        full_name,
        email: read("email"),
        phone: read("phone"),
        location: read("location"),
        website: read("website"),
        social_links: SocialLinks {
            linkedin: read("socialLinks.linkedin"),
            github: read("socialLinks.github"),
            portfolio: read("socialLinks.portfolio"),
            twitter: read("socialLinks.twitter"),
        },
    }
}

/// Raw entries for one section, VC array first, then the editor section.
fn raw_section(content: &Value, kind: SectionKind) -> Vec<Value> {
    let vc = entries_at(content, kind.vc_key(), kind);
    if kind != SectionKind::Experience && !vc.is_empty() {
        return vc;
    }
    let editor = if kind.vc_key() == kind.editor_key() {
        Vec::new()
    } else {
        entries_at(content, kind.editor_key(), kind)
    };
    // Experience may be split across both arrays; they are merged and
    // deduplicated afterwards.
    vc.into_iter().chain(editor).collect()
}

fn entries_at(content: &Value, key: &str, kind: SectionKind) -> Vec<Value> {
    first_of(content, &[key])
        .map(|raw| section_entries(kind, raw))
        .unwrap_or_default()
}

/// Drop experience items equal to an earlier one by non-empty `id`, or by
/// (title, company, startDate, endDate). The first occurrence wins.
pub fn dedupe_experience(items: Vec<SectionItem>) -> Vec<SectionItem> {
    let mut kept: Vec<SectionItem> = Vec::with_capacity(items.len());
    for item in items {
        if !kept.iter().any(|seen| same_experience(seen, &item)) {
            kept.push(item);
        }
    }
    kept
}

fn same_experience(a: &SectionItem, b: &SectionItem) -> bool {
    let id = a.text("id");
    if !id.is_empty() && id == b.text("id") {
        return true;
    }
    ["title", "company", "startDate", "endDate"]
        .iter()
        .all(|field| a.text(field) == b.text(field))
}
