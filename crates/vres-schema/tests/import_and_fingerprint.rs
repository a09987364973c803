//! Import dedup, fingerprint stability, and duration edge cases through the
//! public API.

use serde_json::{json, Map};

use vres_core::Timestamp;
use vres_schema::{
    calculate_duration, fingerprint, from_imported_payload, ResumeDocument, SectionItem,
    SectionKind,
};

#[test]
fn import_merges_overlapping_experience() {
    let payload = json!({
        "data": {
            "content": {
                "credentialSubject": {
                    "person": {"contact": {"fullName": "Grace Hopper"}},
                    "employmentHistory": [
                        {"title": "Rear Admiral", "company": "US Navy", "startDate": "1983-01-01", "endDate": "1986-08-14"},
                        {"title": "Researcher", "company": "Harvard", "startDate": "1944-01-01", "endDate": "1949-01-01"}
                    ],
                    "experience": {"items": [
                        {"title": "Rear Admiral", "company": "US Navy", "startDate": "1983-01-01", "endDate": "1986-08-14"},
                        {"title": "Senior Mathematician", "company": "Eckert-Mauchly", "startDate": "1949-01-01", "endDate": "1950-01-01"}
                    ]}
                }
            }
        }
    });
    let out = from_imported_payload(&payload);
    assert!(out.is_clean());
    let titles: Vec<_> = out
        .value
        .experience
        .items
        .iter()
        .map(|i| i.text("title").to_string())
        .collect();
    assert_eq!(titles, vec!["Rear Admiral", "Researcher", "Senior Mathematician"]);
}

#[test]
fn import_keeps_two_when_one_overlaps() {
    let payload = json!({
        "employmentHistory": [
            {"title": "A", "company": "X", "startDate": "2020-01", "endDate": "2021-01"},
            {"title": "B", "company": "Y"}
        ],
        "experience": {"items": [
            {"title": "A", "company": "X", "startDate": "2020-01", "endDate": "2021-01"}
        ]}
    });
    let items = from_imported_payload(&payload).value.experience.items;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].text("title"), "A");
    assert_eq!(items[1].text("title"), "B");
}

fn doc() -> ResumeDocument {
    let mut fields = Map::new();
    fields.insert("title".into(), json!("Engineer"));
    ResumeDocument {
        name: "Resume".into(),
        ..Default::default()
    }
    .with_appended_item(SectionKind::Experience, SectionItem::from_fields(fields))
}

#[test]
fn fingerprint_ignores_last_updated() {
    let base = doc();
    let touched = base.touched(&Timestamp::now());
    assert_eq!(fingerprint(&base).unwrap(), fingerprint(&touched).unwrap());
}

#[test]
fn fingerprint_changes_after_appending_experience() {
    let base = doc();
    let grown = base.with_appended_item(SectionKind::Experience, SectionItem::default());
    assert_ne!(fingerprint(&base).unwrap(), fingerprint(&grown).unwrap());
}

#[test]
fn fingerprint_is_deterministic() {
    let a = fingerprint(&doc()).unwrap();
    let b = fingerprint(&doc()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn duration_edge_cases() {
    assert_eq!(
        calculate_duration("2020-01-01", Some("2020-01-15"), false),
        "Less than a month"
    );
    assert_eq!(calculate_duration("", Some("2020-01-15"), false), "");
    assert_eq!(calculate_duration("", None, true), "");
}
