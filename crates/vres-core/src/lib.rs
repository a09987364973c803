//! # vres-core — Foundational Types for the Verified Resume Engine
//!
//! The leaf crate of the workspace. It defines the primitives every other
//! `vres-*` crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Every digest (document fingerprints in
//!    particular) is computed over JCS-canonical bytes. The only way to get
//!    such bytes is `CanonicalBytes::new()`, so two equal documents can never
//!    hash differently because of key order.
//!
//! 2. **UTC-only timestamps.** [`Timestamp`] renders as
//!    `YYYY-MM-DDTHH:MM:SSZ`, the form used for `issuanceDate`.
//!
//! 3. **Declarative fallback reads.** Imported payloads come in several
//!    nesting conventions. [`path::first_of`] and friends resolve a field by
//!    trying an ordered list of dotted paths, so call sites read as data
//!    rather than nested `if let` chains.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vres-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod path;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, VresError};
pub use path::{first_array, first_bool, first_of, first_str, lookup};
pub use temporal::{parse_calendar_date, Timestamp};
