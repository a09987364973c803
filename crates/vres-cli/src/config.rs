//! CLI configuration.
//!
//! Loaded from an optional YAML file, then overridden from the
//! environment:
//!
//! - `VRES_ISSUER`: issuer DID written into generated credentials.
//! - `VRES_DRIVE_CONTENT_URL`: prefix for Drive content URLs.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use vres_schema::{ContextValue, CredentialTypeValue, EnvelopeOptions, DRIVE_CONTENT_URL};

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub issuer: String,
    /// `@context` entries; the resume defaults when empty.
    pub contexts: Vec<Value>,
    /// Credential `type` entries; the resume defaults when empty.
    pub credential_types: Vec<String>,
    pub drive_content_url: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            contexts: Vec::new(),
            credential_types: Vec::new(),
            drive_content_url: DRIVE_CONTENT_URL.to_string(),
        }
    }
}

impl CliConfig {
    /// Load the config file (if given) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?;
                Self::from_yaml(&content)
                    .with_context(|| format!("invalid config: {}", path.display()))?
            }
            None => Self::default(),
        };
        Ok(config.with_env(|var| std::env::var(var).ok()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides from `lookup` (the process environment in
    /// production).
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(issuer) = lookup("VRES_ISSUER").filter(|v| !v.is_empty()) {
            self.issuer = issuer;
        }
        if let Some(url) = lookup("VRES_DRIVE_CONTENT_URL").filter(|v| !v.is_empty()) {
            self.drive_content_url = url;
        }
        self
    }

    /// Envelope settings for generated credentials.
    pub fn envelope(&self) -> EnvelopeOptions {
        let mut envelope = EnvelopeOptions::default().with_issuer(self.issuer.clone());
        if !self.contexts.is_empty() {
            envelope.context = ContextValue::Array(self.contexts.clone());
        }
        if !self.credential_types.is_empty() {
            envelope.credential_type = CredentialTypeValue::Array(self.credential_types.clone());
        }
        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_fields_and_defaults() {
        let config = CliConfig::from_yaml("issuer: did:web:example.org\ncredential_types: [VerifiableCredential, ResumeCredential]\n").unwrap();
        assert_eq!(config.issuer, "did:web:example.org");
        assert_eq!(config.drive_content_url, DRIVE_CONTENT_URL);
        let envelope = config.envelope();
        assert_eq!(
            envelope.credential_type,
            CredentialTypeValue::Array(vec!["VerifiableCredential".into(), "ResumeCredential".into()])
        );
        assert_eq!(envelope.context, ContextValue::default());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(CliConfig::from_yaml("  \n").unwrap(), CliConfig::default());
    }

    #[test]
    fn env_overrides_file() {
        let config = CliConfig::from_yaml("issuer: did:web:file\n")
            .unwrap()
            .with_env(|var| match var {
                "VRES_ISSUER" => Some("did:web:env".to_string()),
                "VRES_DRIVE_CONTENT_URL" => Some(String::new()),
                _ => None,
            });
        assert_eq!(config.issuer, "did:web:env");
        assert_eq!(config.drive_content_url, DRIVE_CONTENT_URL);
    }

    #[test]
    fn custom_contexts() {
        let config = CliConfig {
            contexts: vec![json!("https://www.w3.org/2018/credentials/v1"), json!({"@vocab": "https://example.org/"})],
            ..Default::default()
        };
        assert!(matches!(config.envelope().context, ContextValue::Array(ref c) if c.len() == 2));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vres.yaml");
        std::fs::write(&path, "drive_content_url: https://files.test/\n").unwrap();
        let config = CliConfig::load(Some(&path)).unwrap();
        // The environment may still override it.
        if std::env::var("VRES_DRIVE_CONTENT_URL").is_err() {
            assert_eq!(config.drive_content_url, "https://files.test/");
        }
    }

    #[test]
    fn bad_yaml_is_an_error() {
        assert!(CliConfig::from_yaml("issuer: [unterminated").is_err());
    }
}
