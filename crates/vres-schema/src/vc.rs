//! # Resume Verifiable Credential
//!
//! [`VcDocument`] is the wire contract with the signing service. Its field
//! names and nesting are fixed: external verifiers read them directly.
//!
//! The envelope (`@context`, `id`, `type`, `issuer`, `issuanceDate`) is
//! scaffolding filled from [`EnvelopeOptions`]; the resume itself lives in
//! `credentialSubject` as a [`ResumeSubject`]. No proof is attached here;
//! signing happens downstream on the canonical bytes of this document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use vres_core::Timestamp;

use crate::document::Contact;
use crate::section::SectionKind;

/// The W3C credentials v1 context.
pub const CREDENTIALS_V1_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
/// The HR Open resume vocabulary context.
pub const RESUME_CONTEXT: &str = "https://schema.hropenstandards.org/4.4/context.jsonld";
/// `type` of the resume credential subject.
pub const RESUME_SUBJECT_TYPE: &str = "Resume";

/// JSON-LD `@context` value, either a single string or an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Single(String),
    Array(Vec<Value>),
}

impl Default for ContextValue {
    fn default() -> Self {
        Self::Array(vec![
            Value::String(CREDENTIALS_V1_CONTEXT.to_string()),
            Value::String(RESUME_CONTEXT.to_string()),
        ])
    }
}

/// Credential `type` value, either a single string or an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialTypeValue {
    Single(String),
    Array(Vec<String>),
}

impl CredentialTypeValue {
    /// Check whether `"VerifiableCredential"` is included in the type.
    pub fn contains_vc_type(&self) -> bool {
        match self {
            Self::Single(s) => s == "VerifiableCredential",
            Self::Array(types) => types.iter().any(|s| s == "VerifiableCredential"),
        }
    }
}

impl Default for CredentialTypeValue {
    fn default() -> Self {
        Self::Array(vec![
            "VerifiableCredential".to_string(),
            "LERRSCredential".to_string(),
        ])
    }
}

/// `person.name`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonName {
    pub formatted_name: String,
}

/// `credentialSubject.person`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub name: PersonName,
    pub contact: Contact,
}

/// `credentialSubject.narrative`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Narrative {
    pub text: String,
}

/// The resume carried in `credentialSubject`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeSubject {
    #[serde(rename = "type")]
    pub subject_type: String,
    pub person: Person,
    pub narrative: Narrative,
    pub employment_history: Vec<Map<String, Value>>,
    pub education_and_learning: Vec<Map<String, Value>>,
    pub skills: Vec<Map<String, Value>>,
    pub certifications: Vec<Map<String, Value>>,
    pub projects: Vec<Map<String, Value>>,
    pub professional_affiliations: Vec<Map<String, Value>>,
    pub volunteer_work: Vec<Map<String, Value>>,
    pub hobbies_and_interests: Vec<String>,
}

impl Default for ResumeSubject {
    fn default() -> Self {
        Self {
            subject_type: RESUME_SUBJECT_TYPE.to_string(),
            person: Person::default(),
            narrative: Narrative::default(),
            employment_history: Vec::new(),
            education_and_learning: Vec::new(),
            skills: Vec::new(),
            certifications: Vec::new(),
            projects: Vec::new(),
            professional_affiliations: Vec::new(),
            volunteer_work: Vec::new(),
            hobbies_and_interests: Vec::new(),
        }
    }
}

impl ResumeSubject {
    /// The object-item array for `kind`. Hobbies are plain strings and have
    /// none.
    pub fn items(&self, kind: SectionKind) -> &[Map<String, Value>] {
        match kind {
            SectionKind::Experience => &self.employment_history,
            SectionKind::Education => &self.education_and_learning,
            SectionKind::Skills => &self.skills,
            SectionKind::Certifications => &self.certifications,
            SectionKind::Projects => &self.projects,
            SectionKind::ProfessionalAffiliations => &self.professional_affiliations,
            SectionKind::VolunteerWork => &self.volunteer_work,
            SectionKind::HobbiesAndInterests => &[],
        }
    }

    pub(crate) fn items_mut(&mut self, kind: SectionKind) -> Option<&mut Vec<Map<String, Value>>> {
        match kind {
            SectionKind::Experience => Some(&mut self.employment_history),
            SectionKind::Education => Some(&mut self.education_and_learning),
            SectionKind::Skills => Some(&mut self.skills),
            SectionKind::Certifications => Some(&mut self.certifications),
            SectionKind::Projects => Some(&mut self.projects),
            SectionKind::ProfessionalAffiliations => Some(&mut self.professional_affiliations),
            SectionKind::VolunteerWork => Some(&mut self.volunteer_work),
            SectionKind::HobbiesAndInterests => None,
        }
    }
}

/// A resume credential ready for signing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VcDocument {
    #[serde(rename = "@context")]
    pub context: ContextValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub credential_type: CredentialTypeValue,

    /// DID of the issuer.
    pub issuer: String,

    #[serde(rename = "issuanceDate")]
    pub issuance_date: Timestamp,

    #[serde(rename = "credentialSubject")]
    pub credential_subject: ResumeSubject,
}

/// Envelope settings for [`crate::to_vc`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeOptions {
    pub issuer: String,
    /// Credential id; a fresh `urn:uuid:` when `None`.
    pub credential_id: Option<String>,
    /// Issuance time; now when `None`.
    pub issued_at: Option<Timestamp>,
    pub context: ContextValue,
    pub credential_type: CredentialTypeValue,
}

impl Default for EnvelopeOptions {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            credential_id: None,
            issued_at: None,
            context: ContextValue::default(),
            credential_type: CredentialTypeValue::default(),
        }
    }
}

impl EnvelopeOptions {
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn issued_at(mut self, at: Timestamp) -> Self {
        self.issued_at = Some(at);
        self
    }

    pub fn with_credential_id(mut self, id: impl Into<String>) -> Self {
        self.credential_id = Some(id.into());
        self
    }

    /// Build the envelope around `subject`.
    pub(crate) fn wrap(&self, subject: ResumeSubject) -> VcDocument {
        VcDocument {
            context: self.context.clone(),
            id: Some(
                self.credential_id
                    .clone()
                    .unwrap_or_else(|| format!("urn:uuid:{}", uuid::Uuid::new_v4())),
            ),
            credential_type: self.credential_type.clone(),
            issuer: self.issuer.clone(),
            issuance_date: self.issued_at.unwrap_or_else(Timestamp::now),
            credential_subject: subject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed() -> EnvelopeOptions {
        EnvelopeOptions::default()
            .with_issuer("did:key:z6Mk")
            .with_credential_id("urn:uuid:00000000-0000-4000-8000-000000000000")
            .issued_at(Timestamp::parse("2026-01-15T12:00:00Z").unwrap())
    }

    #[test]
    fn envelope_wire_names() {
        let vc = fixed().wrap(ResumeSubject::default());
        let v = serde_json::to_value(&vc).unwrap();
        assert_eq!(v["@context"][0], CREDENTIALS_V1_CONTEXT);
        assert_eq!(v["type"], json!(["VerifiableCredential", "LERRSCredential"]));
        assert_eq!(v["issuer"], "did:key:z6Mk");
        assert_eq!(v["issuanceDate"], "2026-01-15T12:00:00Z");
        assert_eq!(v["credentialSubject"]["type"], "Resume");
        assert_eq!(v["credentialSubject"]["person"]["name"]["formattedName"], "");
        assert_eq!(v["credentialSubject"]["narrative"]["text"], "");
        assert_eq!(v["credentialSubject"]["employmentHistory"], json!([]));
        assert_eq!(v["credentialSubject"]["educationAndLearning"], json!([]));
    }

    #[test]
    fn fresh_credential_ids_are_urn_uuids() {
        let a = EnvelopeOptions::default().wrap(ResumeSubject::default());
        let b = EnvelopeOptions::default().wrap(ResumeSubject::default());
        assert!(a.id.as_deref().unwrap().starts_with("urn:uuid:"));
        assert_ne!(a.id, b.id);
        assert!(a.credential_type.contains_vc_type());
    }

    #[test]
    fn deserializes_single_context_and_type() {
        let vc: VcDocument = serde_json::from_value(json!({
            "@context": "https://www.w3.org/2018/credentials/v1",
            "type": "VerifiableCredential",
            "issuer": "did:web:x",
            "issuanceDate": "2025-05-01T00:00:00Z",
            "credentialSubject": {"skills": [{"name": "Rust"}]}
        }))
        .unwrap();
        assert!(vc.id.is_none());
        assert!(matches!(vc.context, ContextValue::Single(_)));
        assert!(vc.credential_type.contains_vc_type());
        assert_eq!(vc.credential_subject.items(SectionKind::Skills).len(), 1);
        assert_eq!(vc.credential_subject.subject_type, RESUME_SUBJECT_TYPE);
    }
}
