//! # Editor ⇄ VC Transform
//!
//! [`to_vc`] maps every section through its field table into
//! `credentialSubject`, attaches evidence URLs, fills derived durations and
//! wraps the result in the credential envelope. Before an item is emitted
//! its credential link is **inlined**: every reference without a body is
//! looked up in the credential store and replaced by the full body, so the
//! signed document can be verified without further lookups. A reference the
//! store cannot resolve is kept as-is and reported.
//!
//! [`from_vc`] maps the sections back; [`from_vc_value`] does the same for
//! any JSON value without requiring the typed envelope. Both reset every item to
//! `unverified` with an empty link: attachment state is not reconstructed
//! from the inlined bodies.

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};

use vres_core::{first_of, first_str};

use vres_link::{decode_with_report, encode, CredentialStore, SelectedCredential};

use crate::document::{ResumeDocument, Section};
use crate::duration::calculate_duration_at;
use crate::evidence::{EvidenceMap, FileResolver};
use crate::import::{looks_like_resume, read_contact};
use crate::item::{SectionItem, VerificationStatus, VERIFICATION_KEYS};
use crate::normalize::{normalize_entries, read_field, section_entries, FieldOrder};
use crate::section::SectionKind;
use crate::vc::{EnvelopeOptions, Narrative, Person, PersonName, ResumeSubject, VcDocument};
use crate::warning::{record, TransformWarning, Transformed};

/// Everything [`to_vc`] reads besides the document itself.
pub struct VcContext<'a> {
    credentials: &'a dyn CredentialStore,
    files: FileResolver<'a>,
    evidence: Option<&'a EvidenceMap>,
    envelope: EnvelopeOptions,
    today: Option<NaiveDate>,
}

impl std::fmt::Debug for VcContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VcContext")
            .field("files", &self.files)
            .field("evidence", &self.evidence)
            .field("envelope", &self.envelope)
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}

impl<'a> VcContext<'a> {
    pub fn new(credentials: &'a dyn CredentialStore, files: FileResolver<'a>) -> Self {
        Self {
            credentials,
            files,
            evidence: None,
            envelope: EnvelopeOptions::default(),
            today: None,
        }
    }

    pub fn with_evidence(mut self, evidence: &'a EvidenceMap) -> Self {
        self.evidence = Some(evidence);
        self
    }

    pub fn with_envelope(mut self, envelope: EnvelopeOptions) -> Self {
        self.envelope = envelope;
        self
    }

    /// Fix the date ongoing durations are measured to.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today
            .or_else(|| self.envelope.issued_at.map(|at| at.date()))
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Build the resume credential for `doc`.
pub fn to_vc(doc: &ResumeDocument, ctx: &VcContext<'_>) -> Transformed<VcDocument> {
    let mut warnings = Vec::new();
    let mut subject = ResumeSubject {
        person: Person {
            name: PersonName {
                formatted_name: doc.contact.full_name.clone(),
            },
            contact: doc.contact.clone(),
        },
        narrative: Narrative {
            text: doc.summary.clone(),
        },
        ..ResumeSubject::default()
    };

    for kind in SectionKind::ALL {
        let items = &doc.section(kind).items;
        if kind == SectionKind::HobbiesAndInterests {
            subject.hobbies_and_interests = items
                .iter()
                .map(|item| item.text(kind.primary_field()).trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
            continue;
        }
        let emitted: Vec<Map<String, Value>> = items
            .iter()
            .enumerate()
            .map(|(index, item)| vc_item(kind, index, item, ctx, &mut warnings))
            .collect();
        if let Some(out) = subject.items_mut(kind) {
            *out = emitted;
        }
    }

    tracing::debug!(warnings = warnings.len(), "built resume credential");
    Transformed {
        value: ctx.envelope.wrap(subject),
        warnings,
    }
}

fn vc_item(
    kind: SectionKind,
    index: usize,
    item: &SectionItem,
    ctx: &VcContext<'_>,
    warnings: &mut Vec<TransformWarning>,
) -> Map<String, Value> {
    let source = Value::Object(item.fields.clone());
    let mut out: Map<String, Value> = kind
        .fields()
        .iter()
        .map(|spec| (spec.vc.to_string(), read_field(&source, spec, FieldOrder::EditorFirst)))
        .collect();

    if kind.has_duration() && item.text("duration").trim().is_empty() {
        let ongoing = kind.ongoing_field().is_some_and(|flag| item.flag(flag));
        let duration = calculate_duration_at(
            item.text("startDate"),
            Some(item.text("endDate")),
            ongoing,
            ctx.today(),
        );
        out.insert("duration".to_string(), Value::String(duration));
    }

    let selection = inline_selection(kind, index, item, ctx.credentials, warnings);
    let status = match (selection.is_empty(), item.verification_status) {
        (false, _) => VerificationStatus::Verified,
        (true, VerificationStatus::Pending) => VerificationStatus::Pending,
        (true, _) => VerificationStatus::Unverified,
    };
    out.insert(
        "verificationStatus".to_string(),
        Value::String(status.as_str().to_string()),
    );
    out.insert("credentialLink".to_string(), Value::String(encode(&selection)));

    if let Some(evidence) = ctx.evidence {
        let files = ctx.files.attached_files(evidence, kind, index);
        if !files.is_empty() {
            out.insert(
                "attachedFiles".to_string(),
                Value::Array(files.into_iter().map(Value::String).collect()),
            );
        }
    }
    out
}

/// The item's credentials with every resolvable reference replaced by its
/// full body from `store`.
pub fn inline_selection(
    kind: SectionKind,
    index: usize,
    item: &SectionItem,
    store: &dyn CredentialStore,
    warnings: &mut Vec<TransformWarning>,
) -> Vec<SelectedCredential> {
    let selection = if !item.selected_credentials.is_empty() {
        item.selected_credentials.clone()
    } else if !item.credential_link.trim().is_empty() {
        let report = decode_with_report(&item.credential_link);
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
    } else {
        Vec::new()
    };

    selection
        .into_iter()
        .filter(SelectedCredential::is_encodable)
        .map(|credential| inline_one(kind, index, credential, store, warnings))
        .collect()
}

fn inline_one(
    kind: SectionKind,
    index: usize,
    credential: SelectedCredential,
    store: &dyn CredentialStore,
    warnings: &mut Vec<TransformWarning>,
) -> SelectedCredential {
    if credential.credential.is_some() {
        return credential;
    }
    let body = [credential.file_id.as_str(), credential.id.as_str()]
        .into_iter()
        .filter(|key| !key.is_empty())
        .find_map(|key| store.lookup(key));
    match body {
        Some(body) => {
            let mut inlined = SelectedCredential::new(
                credential.id.clone(),
                credential.file_id.clone(),
                Some(body),
            );
            if !credential.name.is_empty() && credential.name != credential.id {
                inlined.name = credential.name;
            }
            inlined
        }
        None => {
            record(
                warnings,
                TransformWarning::UnresolvableReference {
                    section: kind,
                    index,
                    reference: credential
                        .resolved_file_id()
                        .unwrap_or(credential.id.as_str())
                        .to_string(),
                },
            );
            credential
        }
    }
}

/// Map a resume credential back to the editor document.
///
/// Attachment state is not carried back. Every item comes out unverified
/// with an empty credential link, even when the credential inlined bodies.
/// Durations come back as emitted, so an item whose `duration` was empty
/// before [`to_vc`] returns with the computed value.
pub fn from_vc(vc: &VcDocument) -> ResumeDocument {
    from_vc_subject(&vc.credential_subject)
}

/// Map a bare `credentialSubject` back to the editor document.
pub fn from_vc_subject(subject: &ResumeSubject) -> ResumeDocument {
    match serde_json::to_value(subject) {
        Ok(value) => from_vc_value(&value).value,
        Err(e) => {
            tracing::warn!(error = %e, "resume subject did not serialize");
            ResumeDocument::default()
        }
    }
}

/// Map any JSON credential, or a bare `credentialSubject`, back to the
/// editor document.
///
/// Nothing about the envelope is required. Odd section shapes (plain
/// strings, `{ "items": [...] }`, a string `narrative`) are read the way
/// imports are; a value with no resume content yields an empty document
/// and a `SchemaMismatch` warning.
pub fn from_vc_value(raw: &Value) -> Transformed<ResumeDocument> {
    let mut warnings = Vec::new();
    let subject = match raw.get("credentialSubject") {
        Some(subject) if subject.is_object() => subject,
        _ => raw,
    };
    if !looks_like_resume(subject) {
        record(
            &mut warnings,
            TransformWarning::SchemaMismatch {
                detail: "no credentialSubject with resume content".to_string(),
            },
        );
    }

    let mut doc = ResumeDocument {
        contact: read_contact(subject),
        summary: first_str(subject, &["narrative.text", "narrative", "summary"]),
        ..ResumeDocument::default()
    };

    for kind in SectionKind::ALL {
        let entries: Vec<Value> = first_of(subject, &[kind.vc_key(), kind.editor_key()])
            .map(|raw| section_entries(kind, raw))
            .unwrap_or_default()
            .into_iter()
            .map(without_verification)
            .collect();
        let normalized = normalize_entries(kind, &entries, FieldOrder::VcFirst);
        warnings.extend(normalized.warnings);
        let items = normalized.value.into_iter().map(unverified).collect();
        *doc.section_mut(kind) = Section::new(items);
    }

    Transformed {
        value: doc,
        warnings,
    }
}

fn without_verification(entry: Value) -> Value {
    match entry {
        Value::Object(item) => Value::Object(
            item.into_iter()
                .filter(|(key, _)| !VERIFICATION_KEYS.contains(&key.as_str()))
                .collect(),
        ),
        other => other,
    }
}

fn unverified(mut item: SectionItem) -> SectionItem {
    item.verification_status = VerificationStatus::Unverified;
    item.credential_link.clear();
    item.selected_credentials.clear();
    item
}
