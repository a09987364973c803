//! # Credentials attached to resume items
//!
//! [`RawCredential`] is the verbatim JSON-LD credential as issued. It is
//! never reduced or summarized, so re-encoding a link is lossless. The
//! handful of fields read here (identifiers, `type`, a few subject fields)
//! serve only to derive a locator and a display name.
//!
//! [`SelectedCredential`] is the in-memory attachment record: the dedup key
//! `id`, the store locator `fileId`, a display `name`, and the body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use vres_core::first_str;

/// A raw verifiable credential, kept exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCredential(Value);

impl RawCredential {
    /// Wrap a JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume into the underlying JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Compact JSON text of the body.
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }

    /// The credential's own identifier: `id`, else `credentialId`.
    pub fn identifier(&self) -> Option<&str> {
        ["id", "credentialId"]
            .iter()
            .find_map(|k| self.0.get(*k).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
    }

    /// `originalItem.id`, present on credentials imported from a file store.
    pub fn original_item_id(&self) -> Option<&str> {
        self.0
            .get("originalItem")
            .and_then(|o| o.get("id"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The `credentialSubject` object, if any.
    pub fn subject(&self) -> Option<&Value> {
        self.0.get("credentialSubject")
    }

    /// Classify the credential by its `type` list, then by subject fields.
    pub fn kind(&self) -> CredentialKind {
        CredentialKind::detect(self)
    }

    /// Human-readable name for pickers and attachment chips.
    ///
    /// Returns `None` when nothing in the body is suitable; callers fall back
    /// to the credential's id.
    pub fn display_name(&self) -> Option<String> {
        let explicit = first_str(
            &self.0,
            &["credentialSubject.credentialName", "name"],
        );
        if !explicit.is_empty() {
            return Some(explicit);
        }

        let subject = self.subject().unwrap_or(&Value::Null);
        let name = match self.kind() {
            CredentialKind::Employment => at_phrase(
                first_str(subject, &["role", "title", "position"]),
                first_str(subject, &["company", "employer", "organization"]),
            ),
            CredentialKind::Volunteering => at_phrase(
                first_str(subject, &["volunteerRole", "role"]),
                first_str(subject, &["volunteerOrg", "organization"]),
            ),
            CredentialKind::PerformanceReview => {
                let title = first_str(subject, &["reviewTitle", "jobTitle"]);
                if title.is_empty() {
                    "Performance review".to_string()
                } else {
                    title
                }
            }
            CredentialKind::Skill => first_str(
                subject,
                &["achievement.0.name", "achievement.name", "skill", "skillName", "name"],
            ),
            CredentialKind::Recommendation => {
                let author = first_str(subject, &["fullName", "name"]);
                if author.is_empty() {
                    "Recommendation".to_string()
                } else {
                    format!("Recommendation from {author}")
                }
            }
            CredentialKind::Other => first_str(subject, &["name", "title"]),
        };
        (!name.is_empty()).then_some(name)
    }
}

fn at_phrase(role: String, org: String) -> String {
    match (role.is_empty(), org.is_empty()) {
        (false, false) => format!("{role} at {org}"),
        (false, true) => role,
        (true, false) => org,
        (true, true) => String::new(),
    }
}

/// The credential families a resume item can be backed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialKind {
    Employment,
    Volunteering,
    PerformanceReview,
    Skill,
    Recommendation,
    Other,
}

impl CredentialKind {
    fn detect(raw: &RawCredential) -> Self {
        let types: Vec<&str> = match raw.as_value().get("type") {
            Some(Value::String(s)) => vec![s.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        let by_type = [
            ("Volunteer", Self::Volunteering),
            ("PerformanceReview", Self::PerformanceReview),
            ("Recommendation", Self::Recommendation),
            ("Employment", Self::Employment),
            ("Skill", Self::Skill),
            ("OpenBadge", Self::Skill),
            ("Achievement", Self::Skill),
        ];
        for (needle, kind) in by_type {
            if types.iter().any(|t| t.contains(needle)) {
                return kind;
            }
        }

        let Some(subject) = raw.subject() else {
            return Self::Other;
        };
        let has = |key: &str| subject.get(key).is_some_and(|v| !v.is_null());
        if has("volunteerOrg") || has("volunteerRole") {
            Self::Volunteering
        } else if has("reviewTitle") || has("reviewDuration") {
            Self::PerformanceReview
        } else if has("howKnow") || has("recommendationText") {
            Self::Recommendation
        } else if has("company") || has("role") {
            Self::Employment
        } else if has("achievement") || has("skill") {
            Self::Skill
        } else {
            Self::Other
        }
    }
}

/// A credential attached to a resume item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCredential {
    /// Stable dedup key.
    pub id: String,
    /// The credential store's locator for this credential.
    #[serde(default)]
    pub file_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// The verbatim body. Absent when only a reference is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<RawCredential>,
}

impl SelectedCredential {
    /// Build a selection, deriving `name` from the body (or the id).
    pub fn new(
        id: impl Into<String>,
        file_id: impl Into<String>,
        credential: Option<RawCredential>,
    ) -> Self {
        let id = id.into();
        let name = credential
            .as_ref()
            .and_then(RawCredential::display_name)
            .unwrap_or_else(|| id.clone());
        Self {
            id,
            file_id: file_id.into(),
            name,
            credential,
        }
    }

    /// A reference to a credential whose body is not at hand.
    pub fn reference(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(id.clone(), id, None)
    }

    /// The locator written in front of the body when encoding.
    ///
    /// Priority: the explicit `fileId`; the body's `originalItem.id`; the
    /// body's own id; the dedup `id`. Body identifiers starting with `urn:`
    /// are skipped, as they name the credential rather than a stored file.
    pub fn resolved_file_id(&self) -> Option<&str> {
        if !self.file_id.is_empty() {
            return Some(&self.file_id);
        }
        let body_ids = self
            .credential
            .as_ref()
            .map(|c| [c.original_item_id(), c.identifier()])
            .unwrap_or([None, None]);
        body_ids
            .into_iter()
            .flatten()
            .find(|id| !id.starts_with("urn:"))
            .or_else(|| (!self.id.is_empty()).then_some(self.id.as_str()))
    }

    /// Whether this credential survives [`crate::encode`]: it needs a
    /// locator or a body.
    pub fn is_encodable(&self) -> bool {
        self.credential.is_some() || self.resolved_file_id().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> RawCredential {
        RawCredential::new(v)
    }

    #[test]
    fn employment_name_combines_role_and_company() {
        let c = raw(json!({
            "type": ["VerifiableCredential", "EmploymentCredential"],
            "credentialSubject": {"role": "Engineer", "company": "Acme"}
        }));
        assert_eq!(c.kind(), CredentialKind::Employment);
        assert_eq!(c.display_name().as_deref(), Some("Engineer at Acme"));
    }

    #[test]
    fn volunteering_detected_from_subject_fields() {
        let c = raw(json!({
            "type": ["VerifiableCredential"],
            "credentialSubject": {"volunteerOrg": "Food Bank"}
        }));
        assert_eq!(c.kind(), CredentialKind::Volunteering);
        assert_eq!(c.display_name().as_deref(), Some("Food Bank"));
    }

    #[test]
    fn skill_name_from_achievement_array() {
        let c = raw(json!({
            "type": ["VerifiableCredential", "OpenBadgeCredential"],
            "credentialSubject": {"achievement": [{"name": "Rust"}]}
        }));
        assert_eq!(c.kind(), CredentialKind::Skill);
        assert_eq!(c.display_name().as_deref(), Some("Rust"));
    }

    #[test]
    fn recommendation_and_review_names() {
        let rec = raw(json!({
            "type": "RecommendationCredential",
            "credentialSubject": {"fullName": "Grace Hopper"}
        }));
        assert_eq!(rec.display_name().as_deref(), Some("Recommendation from Grace Hopper"));

        let review = raw(json!({
            "type": ["PerformanceReviewCredential"],
            "credentialSubject": {}
        }));
        assert_eq!(review.display_name().as_deref(), Some("Performance review"));
    }

    #[test]
    fn explicit_credential_name_wins() {
        let c = raw(json!({
            "type": ["EmploymentCredential"],
            "credentialSubject": {"credentialName": "My job", "role": "Engineer"}
        }));
        assert_eq!(c.display_name().as_deref(), Some("My job"));
    }

    #[test]
    fn new_falls_back_to_id_for_name() {
        let sc = SelectedCredential::new("abc", "abc", Some(raw(json!({"id": "abc"}))));
        assert_eq!(sc.name, "abc");
        assert_eq!(SelectedCredential::reference("xyz").name, "xyz");
    }

    #[test]
    fn file_id_priority_prefers_explicit() {
        let sc = SelectedCredential {
            id: "dedup".into(),
            file_id: "explicit".into(),
            name: String::new(),
            credential: Some(raw(json!({"id": "body", "originalItem": {"id": "orig"}}))),
        };
        assert_eq!(sc.resolved_file_id(), Some("explicit"));
    }

    #[test]
    fn file_id_priority_skips_urn_identifiers() {
        let mut sc = SelectedCredential {
            id: "dedup".into(),
            file_id: String::new(),
            name: String::new(),
            credential: Some(raw(json!({"id": "urn:uuid:1", "originalItem": {"id": "orig"}}))),
        };
        assert_eq!(sc.resolved_file_id(), Some("orig"));

        sc.credential = Some(raw(json!({"id": "urn:uuid:1", "originalItem": {"id": "urn:x"}})));
        assert_eq!(sc.resolved_file_id(), Some("dedup"));

        sc.credential = Some(raw(json!({"id": "drive-file-9"})));
        assert_eq!(sc.resolved_file_id(), Some("drive-file-9"));
    }

    #[test]
    fn file_id_unresolvable_without_any_identifier() {
        let sc = SelectedCredential {
            id: String::new(),
            file_id: String::new(),
            name: String::new(),
            credential: None,
        };
        assert_eq!(sc.resolved_file_id(), None);
        assert!(!sc.is_encodable());
    }

    #[test]
    fn body_alone_is_encodable() {
        let sc = SelectedCredential {
            id: String::new(),
            file_id: String::new(),
            name: String::new(),
            credential: Some(raw(json!({"id": "urn:uuid:only"}))),
        };
        assert_eq!(sc.resolved_file_id(), None);
        assert!(sc.is_encodable());
        assert!(SelectedCredential::reference("abc").is_encodable());
    }
}
