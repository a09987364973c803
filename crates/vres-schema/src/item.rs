//! # Section Items
//!
//! A [`SectionItem`] is one entry in a resume section: the section's own
//! fields (kept as a JSON object keyed by editor field names) plus the
//! verification state shared by every section.
//!
//! The verification state obeys one invariant: `selected_credentials` is
//! non-empty exactly when the status is `verified`, and `credential_link`
//! is the stored encoding of `selected_credentials`. Every constructor and
//! update below re-establishes it, and every update returns a new item.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use vres_link::{dedupe, encode, SelectedCredential};

/// Verification state of a section item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Pending,
    Verified,
}

impl VerificationStatus {
    /// Lenient parse; anything unknown is `Unverified`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "verified" => Self::Verified,
            "pending" => Self::Pending,
            _ => Self::Unverified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Pending => "pending",
            Self::Verified => "verified",
        }
    }
}

/// Keys owned by the verification state; never stored in `fields`.
pub(crate) const VERIFICATION_KEYS: [&str; 3] =
    ["verificationStatus", "credentialLink", "selectedCredentials"];

/// One entry of a resume section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionItem {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub credential_link: String,
    #[serde(default)]
    pub selected_credentials: Vec<SelectedCredential>,
}

impl SectionItem {
    /// An unverified item with the given fields.
    pub fn from_fields(mut fields: Map<String, Value>) -> Self {
        for key in VERIFICATION_KEYS {
            fields.remove(key);
        }
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Raw field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field as text; `""` when absent or not a string.
    pub fn text(&self, field: &str) -> &str {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Field as a flag; `false` when absent or not a boolean.
    pub fn flag(&self, field: &str) -> bool {
        self.fields
            .get(field)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }

    /// A copy with one field replaced.
    pub fn with_field(&self, field: &str, value: Value) -> Self {
        let mut next = self.clone();
        if !VERIFICATION_KEYS.contains(&field) {
            next.fields.insert(field.to_string(), value);
        }
        next
    }

    /// A copy with `credentials` merged onto the current selection.
    ///
    /// The merged list is deduplicated, so re-attaching a credential
    /// refreshes it in place.
    pub fn with_credentials(&self, credentials: &[SelectedCredential]) -> Self {
        let merged: Vec<SelectedCredential> = self
            .selected_credentials
            .iter()
            .chain(credentials)
            .cloned()
            .collect();
        self.with_selection(merged)
    }

    /// A copy with the credential `id` detached. Removing the last one
    /// returns the item to `unverified`.
    pub fn without_credential(&self, id: &str) -> Self {
        let rest: Vec<SelectedCredential> = self
            .selected_credentials
            .iter()
            .filter(|c| c.id != id)
            .cloned()
            .collect();
        self.with_selection(rest)
    }

    /// A copy awaiting verification. Pending only applies to items with no
    /// attached credential.
    pub fn mark_pending(&self) -> Self {
        let mut next = self.clone();
        if next.selected_credentials.is_empty() {
            next.verification_status = VerificationStatus::Pending;
        }
        next
    }

    /// Replace the whole selection and re-derive status and link.
    ///
    /// Credentials with neither a locator nor a body cannot be written to
    /// the link and are dropped, so the link always encodes the selection.
    pub fn with_selection(&self, selection: Vec<SelectedCredential>) -> Self {
        let mut next = self.clone();
        let (kept, dropped): (Vec<_>, Vec<_>) = selection
            .into_iter()
            .partition(SelectedCredential::is_encodable);
        if !dropped.is_empty() {
            tracing::debug!(dropped = dropped.len(), "dropped credentials without a locator or body");
        }
        next.selected_credentials = dedupe(&kept);
        next.credential_link = encode(&next.selected_credentials);
        next.verification_status = if next.selected_credentials.is_empty() {
            match self.verification_status {
                VerificationStatus::Pending => VerificationStatus::Pending,
                _ => VerificationStatus::Unverified,
            }
        } else {
            VerificationStatus::Verified
        };
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sc(id: &str) -> SelectedCredential {
        SelectedCredential::reference(id)
    }

    fn item() -> SectionItem {
        let Value::Object(fields) = json!({"title": "Engineer", "company": "Acme"}) else {
            unreachable!()
        };
        SectionItem::from_fields(fields)
    }

    #[test]
    fn attaching_verifies_and_encodes() {
        let verified = item().with_credentials(&[sc("a"), sc("b")]);
        assert!(verified.is_verified());
        assert_eq!(verified.credential_link, r#"["a","b"]"#);
        assert_eq!(verified.text("title"), "Engineer");
    }

    #[test]
    fn reattaching_refreshes_in_place() {
        let mut renamed = sc("a");
        renamed.name = "Renamed".into();
        let next = item()
            .with_credentials(&[sc("a"), sc("b")])
            .with_credentials(&[renamed.clone()]);
        assert_eq!(next.selected_credentials, vec![renamed, sc("b")]);
    }

    #[test]
    fn detaching_last_credential_unverifies() {
        let next = item().with_credentials(&[sc("a")]).without_credential("a");
        assert_eq!(next.verification_status, VerificationStatus::Unverified);
        assert!(next.selected_credentials.is_empty());
        assert_eq!(next.credential_link, "");
    }

    #[test]
    fn unencodable_credentials_are_not_selected() {
        let blank = SelectedCredential {
            id: String::new(),
            file_id: String::new(),
            name: String::new(),
            credential: None,
        };
        let next = item().with_credentials(&[blank.clone()]);
        assert_eq!(next.verification_status, VerificationStatus::Unverified);
        assert!(next.selected_credentials.is_empty());
        assert_eq!(next.credential_link, "");

        let mixed = item().with_credentials(&[blank, sc("a")]);
        assert!(mixed.is_verified());
        assert_eq!(mixed.selected_credentials, vec![sc("a")]);
        assert_eq!(vres_link::decode(&mixed.credential_link), mixed.selected_credentials);
    }

    #[test]
    fn pending_only_without_credentials() {
        assert_eq!(
            item().mark_pending().verification_status,
            VerificationStatus::Pending
        );
        let verified = item().with_credentials(&[sc("a")]);
        assert_eq!(verified.mark_pending(), verified);
    }

    #[test]
    fn updates_leave_original_untouched() {
        let original = item();
        let _ = original.with_credentials(&[sc("a")]);
        let _ = original.with_field("title", json!("Lead"));
        assert_eq!(original, item());
    }

    #[test]
    fn serializes_flat_camel_case() {
        let v = serde_json::to_value(item().with_credentials(&[sc("a")])).unwrap();
        assert_eq!(v["title"], "Engineer");
        assert_eq!(v["verificationStatus"], "verified");
        assert_eq!(v["credentialLink"], r#"["a"]"#);
        assert_eq!(v["selectedCredentials"][0]["fileId"], "a");
    }

    #[test]
    fn deserialize_separates_verification_keys() {
        let parsed: SectionItem = serde_json::from_value(json!({
            "name": "Rust",
            "verificationStatus": "pending",
            "credentialLink": ""
        }))
        .unwrap();
        assert_eq!(parsed.verification_status, VerificationStatus::Pending);
        assert_eq!(parsed.fields.len(), 1);
    }

    #[test]
    fn status_parse_is_lenient() {
        assert_eq!(VerificationStatus::parse(" Verified "), VerificationStatus::Verified);
        assert_eq!(VerificationStatus::parse("???"), VerificationStatus::Unverified);
    }
}
