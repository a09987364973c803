//! # Document Fingerprint
//!
//! A digest of the fields that make a resume different from another one:
//! `name`, `contact`, `summary`, `experience`, `education` and `skills`.
//! Timestamps and every other section are left out, so saving the same
//! content twice yields the same fingerprint. The subset is canonicalized
//! with JCS before hashing, which fixes key order.

use serde_json::{json, Value};

use vres_core::{sha256_digest, CanonicalBytes, ContentDigest, VresError};

use crate::document::ResumeDocument;

/// The fingerprinted subset of `doc`.
pub fn fingerprint_subset(doc: &ResumeDocument) -> Result<Value, VresError> {
    Ok(json!({
        "name": doc.name,
        "contact": serde_json::to_value(&doc.contact)?,
        "summary": doc.summary,
        "experience": serde_json::to_value(&doc.experience)?,
        "education": serde_json::to_value(&doc.education)?,
        "skills": serde_json::to_value(&doc.skills)?,
    }))
}

/// SHA-256 digest of the canonical subset.
pub fn fingerprint_digest(doc: &ResumeDocument) -> Result<ContentDigest, VresError> {
    let canonical = CanonicalBytes::from_value(fingerprint_subset(doc)?)?;
    Ok(sha256_digest(&canonical))
}

/// Fingerprint as `sha256:<hex>`.
pub fn fingerprint(doc: &ResumeDocument) -> Result<String, VresError> {
    Ok(fingerprint_digest(doc)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    use crate::item::SectionItem;
    use crate::section::SectionKind;

    fn doc() -> ResumeDocument {
        let mut fields = Map::new();
        fields.insert("title".into(), json!("Engineer"));
        ResumeDocument {
            name: "Main".into(),
            summary: "Hello".into(),
            ..Default::default()
        }
        .with_appended_item(SectionKind::Experience, SectionItem::from_fields(fields))
    }

    #[test]
    fn format_is_prefixed_hex() {
        let fp = fingerprint(&doc()).unwrap();
        assert!(fp.starts_with("sha256:"));
        assert_eq!(fp.len(), "sha256:".len() + 64);
    }

    #[test]
    fn excluded_fields_do_not_matter() {
        let base = doc();
        let mut touched = base.with_appended_item(
            SectionKind::Projects,
            SectionItem::default(),
        );
        touched.last_updated = "2030-01-01T00:00:00Z".into();
        touched.id = "other".into();
        assert_eq!(fingerprint(&base).unwrap(), fingerprint(&touched).unwrap());
    }

    #[test]
    fn included_fields_change_it() {
        let base = doc();
        let a = fingerprint(&base).unwrap();
        let mut renamed = base.clone();
        renamed.contact.email = "x@example.org".into();
        assert_ne!(a, fingerprint(&renamed).unwrap());
        let verified = base.with_item(
            SectionKind::Experience,
            0,
            base.experience.items[0].mark_pending(),
        );
        assert_ne!(a, fingerprint(&verified).unwrap());
    }

    #[test]
    fn subset_has_fixed_keys() {
        let subset = fingerprint_subset(&doc()).unwrap();
        let mut keys: Vec<_> = subset.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["contact", "education", "experience", "name", "skills", "summary"]
        );
    }
}
