//! # Document Conversion Subcommands
//!
//! `to-vc`, `from-vc`, `import`, `fingerprint` and `duration`. Resume
//! inputs are read through the import mapper, so any layout the editor
//! has ever persisted is accepted. Transform warnings are logged; they do
//! not change the exit code.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{json, Value};

use vres_core::Timestamp;
use vres_link::CredentialIndex;
use vres_schema::{
    calculate_duration, fingerprint, from_imported_payload, from_vc_value, to_vc, EvidenceMap,
    FileEntry, FileResolver, ResumeDocument, VcContext,
};

use crate::config::CliConfig;
use crate::read_json;

/// Arguments for `vres to-vc`.
#[derive(Args, Debug)]
pub struct ToVcArgs {
    /// Editor resume JSON.
    #[arg(value_name = "RESUME")]
    pub resume: PathBuf,
    /// Credentials owned by the user: an object keyed by fileId, or an array.
    #[arg(long)]
    pub credentials: Option<PathBuf>,
    /// File registry: fileId -> {url, driveId, name}.
    #[arg(long)]
    pub files: Option<PathBuf>,
    /// Evidence map: section -> item index -> [fileId].
    #[arg(long)]
    pub evidence: Option<PathBuf>,
    /// Credential id (default: fresh urn:uuid).
    #[arg(long)]
    pub credential_id: Option<String>,
    /// Issuance time, RFC 3339 (default: now).
    #[arg(long)]
    pub issued_at: Option<String>,
}

/// Arguments for subcommands taking a single JSON document.
#[derive(Args, Debug)]
pub struct DocumentArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for `vres duration`.
#[derive(Args, Debug)]
pub struct DurationArgs {
    /// Start date.
    pub start: String,
    /// End date (default: today).
    #[arg(long)]
    pub end: Option<String>,
    /// The range is still ongoing.
    #[arg(long)]
    pub ongoing: bool,
}

/// Read a resume in any persisted layout.
pub fn load_resume(path: &Path) -> Result<ResumeDocument> {
    let raw = read_json(path)?;
    Ok(from_imported_payload(&raw).value)
}

/// `vres to-vc`.
pub fn run_to_vc(args: &ToVcArgs, config: &CliConfig) -> Result<Value> {
    let resume = load_resume(&args.resume)?;
    let store = match &args.credentials {
        Some(path) => CredentialIndex::from_json(&read_json(path)?),
        None => CredentialIndex::new(),
    };
    let files: BTreeMap<String, FileEntry> = match &args.files {
        Some(path) => serde_json::from_value(read_json(path)?).with_context(|| {
            format!(
                "{}: file registry must map fileIds to {{url, driveId, name}}",
                path.display()
            )
        })?,
        None => BTreeMap::new(),
    };
    let evidence = match &args.evidence {
        Some(path) => EvidenceMap::from_json(&read_json(path)?),
        None => EvidenceMap::new(),
    };

    let mut envelope = config.envelope();
    if let Some(id) = &args.credential_id {
        envelope = envelope.with_credential_id(id.clone());
    }
    if let Some(at) = &args.issued_at {
        envelope = envelope.issued_at(Timestamp::parse(at).context("invalid --issued-at")?);
    }

    let resolver = FileResolver::new(&files).with_drive_content_url(config.drive_content_url.clone());
    let ctx = VcContext::new(&store, resolver)
        .with_evidence(&evidence)
        .with_envelope(envelope);
    let out = to_vc(&resume, &ctx);
    tracing::info!(warnings = out.warnings.len(), "generated resume credential");
    Ok(serde_json::to_value(out.value)?)
}

/// `vres from-vc`. Accepts a full credential or a bare `credentialSubject`,
/// in whatever shape it was saved.
pub fn run_from_vc(args: &DocumentArgs) -> Result<Value> {
    let raw = read_json(&args.file)?;
    let out = from_vc_value(&raw);
    tracing::info!(warnings = out.warnings.len(), "mapped resume credential");
    Ok(serde_json::to_value(out.value)?)
}

/// `vres import`.
pub fn run_import(args: &DocumentArgs) -> Result<Value> {
    let raw = read_json(&args.file)?;
    let out = from_imported_payload(&raw);
    tracing::info!(warnings = out.warnings.len(), "imported resume");
    Ok(serde_json::to_value(out.value)?)
}

/// `vres fingerprint`.
pub fn run_fingerprint(args: &DocumentArgs) -> Result<Value> {
    let resume = load_resume(&args.file)?;
    Ok(json!({ "fingerprint": fingerprint(&resume)? }))
}

/// `vres duration`.
pub fn run_duration(args: &DurationArgs) -> Result<Value> {
    Ok(Value::String(calculate_duration(
        &args.start,
        args.end.as_deref(),
        args.ongoing,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, value: &Value) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn resume() -> Value {
        json!({
            "name": "Main",
            "contact": {"fullName": "Ada Lovelace"},
            "summary": "Analyst",
            "experience": {"items": [{
                "title": "Engineer", "company": "Acme",
                "startDate": "2020-01-01", "endDate": "2021-01-01",
                "credentialLink": "[\"drive-1\"]"
            }]},
            "education": {"items": [{"type": "BSc", "programName": "Maths"}]}
        })
    }

    #[test]
    fn to_vc_inlines_and_attaches_files() {
        let dir = tempfile::tempdir().unwrap();
        let args = ToVcArgs {
            resume: write(dir.path(), "resume.json", &resume()),
            credentials: Some(write(
                dir.path(),
                "creds.json",
                &json!({"drive-1": {"id": "urn:uuid:1", "type": ["VerifiableCredential", "EmploymentCredential"], "credentialSubject": {"role": "Engineer", "company": "Acme"}}}),
            )),
            files: Some(write(dir.path(), "files.json", &json!({"f1": {"driveId": "D1"}}))),
            evidence: Some(write(dir.path(), "evidence.json", &json!({"experience": {"0": ["f1"]}}))),
            credential_id: Some("urn:uuid:test".into()),
            issued_at: Some("2024-01-01T00:00:00Z".into()),
        };
        let config = CliConfig {
            issuer: "did:web:example.org".into(),
            ..Default::default()
        };
        let vc = run_to_vc(&args, &config).unwrap();
        assert_eq!(vc["id"], "urn:uuid:test");
        assert_eq!(vc["issuer"], "did:web:example.org");
        assert_eq!(vc["issuanceDate"], "2024-01-01T00:00:00Z");
        let job = &vc["credentialSubject"]["employmentHistory"][0];
        assert_eq!(job["verificationStatus"], "verified");
        assert!(job["credentialLink"].as_str().unwrap().contains("urn:uuid:1"));
        assert_eq!(
            job["attachedFiles"],
            json!(["https://drive.google.com/uc?export=view&id=D1"])
        );
        assert_eq!(job["duration"], "1 year");
        assert_eq!(vc["credentialSubject"]["educationAndLearning"][0]["degree"], "BSc");
    }

    #[test]
    fn to_vc_rejects_bad_issued_at() {
        let dir = tempfile::tempdir().unwrap();
        let args = ToVcArgs {
            resume: write(dir.path(), "resume.json", &resume()),
            credentials: None,
            files: None,
            evidence: None,
            credential_id: None,
            issued_at: Some("yesterday".into()),
        };
        assert!(run_to_vc(&args, &CliConfig::default()).is_err());
    }

    #[test]
    fn from_vc_accepts_envelope_or_subject() {
        let dir = tempfile::tempdir().unwrap();
        let subject = json!({"educationAndLearning": [{"degree": "BSc", "fieldOfStudy": "Maths"}]});
        for (name, input) in [
            ("vc.json", json!({"credentialSubject": subject.clone()})),
            ("subject.json", subject.clone()),
        ] {
            let args = DocumentArgs {
                file: write(dir.path(), name, &input),
            };
            let doc = run_from_vc(&args).unwrap();
            assert_eq!(doc["education"]["items"][0]["type"], "BSc");
            assert_eq!(doc["education"]["items"][0]["verificationStatus"], "unverified");
        }
    }

    #[test]
    fn from_vc_tolerates_loose_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let input = json!({
            "issuer": {"id": "did:web:example.org"},
            "issuanceDate": "2024-06-15",
            "credentialSubject": {"narrative": "Analyst", "skills": ["Rust", "Go"]}
        });
        let args = DocumentArgs {
            file: write(dir.path(), "loose.json", &input),
        };
        let doc = run_from_vc(&args).unwrap();
        assert_eq!(doc["summary"], "Analyst");
        assert_eq!(doc["skills"]["items"][0]["name"], "Rust");
        assert_eq!(doc["skills"]["items"][1]["name"], "Go");
    }

    #[test]
    fn import_and_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "drive.json", &json!({"data": resume()}));
        let imported = run_import(&DocumentArgs { file: file.clone() }).unwrap();
        assert_eq!(imported["contact"]["fullName"], "Ada Lovelace");
        let fp = run_fingerprint(&DocumentArgs { file }).unwrap();
        assert!(fp["fingerprint"].as_str().unwrap().starts_with("sha256:"));
    }

    #[test]
    fn duration_subcommand() {
        let out = run_duration(&DurationArgs {
            start: "2020-01-01".into(),
            end: Some("2020-01-15".into()),
            ongoing: false,
        })
        .unwrap();
        assert_eq!(out, json!("Less than a month"));
    }
}
