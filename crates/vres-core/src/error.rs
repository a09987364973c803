//! # Error Types — Structured Error Hierarchy
//!
//! Error types shared across the workspace. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! Malformed resume data is not an error in this system. Transforms are
//! total over any JSON value and report data-shape problems as warnings
//! next to their output. The variants here cover the failures that remain:
//! serialization and invalid timestamps. File I/O belongs to the CLI.

use thiserror::Error;

/// Top-level error type for the verified resume engine.
#[derive(Error, Debug)]
pub enum VresError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A timestamp string could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
