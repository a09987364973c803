//! # vres-cli
//!
//! The `vres` command-line interface. Every subcommand reads JSON from
//! files, runs one engine operation and returns a JSON value, which the
//! binary prints to stdout (or `--output`). Logs go to stderr.
//!
//! ## Subcommands
//!
//! - `vres to-vc` / `vres from-vc`: editor document to resume credential
//!   and back.
//! - `vres import`: map an arbitrary import payload onto the editor shape.
//! - `vres fingerprint`: change-detection digest of a resume.
//! - `vres link decode` / `vres link encode`: the stored credential link
//!   format.
//! - `vres duration`: the human-readable duration used on date ranges.

pub mod config;
pub mod convert;
pub mod link;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Write `value` as pretty JSON to `path`, or to stdout when `None`.
pub fn write_json(value: &Value, path: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => std::fs::write(path, format!("{text}\n"))
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
