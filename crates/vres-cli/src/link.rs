//! # Link Subcommand
//!
//! Direct access to the stored `credentialLink` format: decode any legacy
//! or current link string, or encode a credential list.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use vres_link::{decode_with_report, encode, SelectedCredential};

use crate::read_json;

/// Arguments for `vres link`.
#[derive(Args, Debug)]
pub struct LinkArgs {
    #[command(subcommand)]
    pub command: LinkCommand,
}

#[derive(Subcommand, Debug)]
pub enum LinkCommand {
    /// Decode a stored credential link into its credential list.
    Decode {
        /// The stored link string.
        #[arg(value_name = "STRING")]
        stored: String,
        /// Also list the tokens that failed to parse.
        #[arg(long)]
        report: bool,
    },
    /// Encode a JSON array of credentials into a stored link.
    Encode {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

pub fn run_link(args: &LinkArgs) -> Result<Value> {
    match &args.command {
        LinkCommand::Decode { stored, report } => Ok(decode_link(stored, *report)),
        LinkCommand::Encode { file } => {
            let raw = read_json(file)?;
            if !raw.is_array() {
                bail!("{}: expected a JSON array of credentials", file.display());
            }
            let items: Vec<SelectedCredential> = serde_json::from_value(raw)
                .with_context(|| format!("{}: not a credential list", file.display()))?;
            Ok(Value::String(encode(&items)))
        }
    }
}

fn decode_link(stored: &str, with_report: bool) -> Value {
    let report = decode_with_report(stored);
    for bad in &report.malformed {
        tracing::warn!(position = bad.position, error = %bad.error, "dropped malformed token");
    }
    let credentials = json!(report.credentials);
    if !with_report {
        return credentials;
    }
    let malformed: Vec<Value> = report
        .malformed
        .iter()
        .map(|bad| {
            json!({
                "position": bad.position,
                "token": bad.token,
                "error": bad.error.to_string(),
            })
        })
        .collect();
    json!({ "credentials": credentials, "malformed": malformed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_plain_ids() {
        let args = LinkArgs {
            command: LinkCommand::Decode {
                stored: r#"["a","b"]"#.into(),
                report: false,
            },
        };
        let out = run_link(&args).unwrap();
        assert_eq!(out[0]["id"], "a");
        assert_eq!(out[1]["fileId"], "b");
    }

    #[test]
    fn decode_with_report_lists_failures() {
        let out = decode_link(r#"["ok","x,{bad"]"#, true);
        assert_eq!(out["credentials"].as_array().unwrap().len(), 1);
        assert_eq!(out["malformed"][0]["position"], 1);
        assert_eq!(out["malformed"][0]["token"], "x,{bad");
    }

    #[test]
    fn encode_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(
            &path,
            r#"[{"id":"a","fileId":"a","name":"A"},{"id":"a","fileId":"a","name":"A2"},{"id":"b","fileId":"b"}]"#,
        )
        .unwrap();
        let out = run_link(&LinkArgs {
            command: LinkCommand::Encode { file: path },
        })
        .unwrap();
        assert_eq!(out, Value::String(r#"["a","b"]"#.into()));
    }

    #[test]
    fn encode_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(&path, r#"{"id":"a"}"#).unwrap();
        assert!(run_link(&LinkArgs {
            command: LinkCommand::Encode { file: path },
        })
        .is_err());
    }
}
