//! # vres-link — Credential Links
//!
//! A resume item (a job, a degree, a skill) can be backed by one or more
//! verifiable credentials. The attachment is persisted as a single opaque
//! string, the item's `credentialLink`. This crate owns that string:
//!
//! - **Codec** ([`encode`], [`decode`]) packs a list of
//!   [`SelectedCredential`]s into one string and unpacks it again, accepting
//!   every historical encoding still found in stored resumes.
//! - **Deduplication** ([`dedupe`]) keeps a credential list unique by `id`.
//! - **Naming** ([`CredentialKind`], [`RawCredential::display_name`]) derives
//!   the label shown next to an attached credential.
//! - **Credential Store** ([`CredentialStore`]) is the read-only lookup used
//!   when references must be replaced by inline credential bodies.
//!
//! Decoding never fails as a whole. A token that cannot be parsed is
//! dropped and reported through [`DecodeReport::malformed`].

pub mod codec;
pub mod credential;
pub mod dedupe;
pub mod store;

pub use codec::{
    decode, decode_with_report, encode, parse_token, DecodeReport, DecodedLink, Grammar,
    LinkError, MalformedToken,
};
pub use credential::{CredentialKind, RawCredential, SelectedCredential};
pub use dedupe::dedupe;
pub use store::{CredentialIndex, CredentialStore};

/// Alias for [`encode`], under the name the persistence layer uses.
pub fn credentials_to_storage_format(items: &[SelectedCredential]) -> String {
    encode(items)
}

/// Alias for [`decode`], under the name the persistence layer uses.
pub fn parse_stored_credentials(stored: &str) -> Vec<SelectedCredential> {
    decode(stored)
}
