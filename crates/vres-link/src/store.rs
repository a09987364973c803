//! # Credential Store
//!
//! The set of credentials a user owns, read-only from this crate's point of
//! view. Transforms receive a store explicitly; nothing here reaches into
//! ambient application state.
//!
//! [`CredentialIndex`] is the in-memory store used by the CLI and tests. It
//! indexes every credential under each identifier it carries: its `id` or
//! `credentialId`, its `originalItem.id`, and the key it was listed under.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::Value;

use crate::credential::RawCredential;

/// Read-only lookup of raw credentials by identifier.
pub trait CredentialStore {
    /// Fetch the credential stored under `id`, if any.
    fn lookup(&self, id: &str) -> Option<RawCredential>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for &T {
    fn lookup(&self, id: &str) -> Option<RawCredential> {
        (**self).lookup(id)
    }
}

impl<S: BuildHasher> CredentialStore for HashMap<String, RawCredential, S> {
    fn lookup(&self, id: &str) -> Option<RawCredential> {
        self.get(id).cloned()
    }
}

impl CredentialStore for BTreeMap<String, RawCredential> {
    fn lookup(&self, id: &str) -> Option<RawCredential> {
        self.get(id).cloned()
    }
}

/// In-memory credential store indexed by every known identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialIndex {
    by_id: BTreeMap<String, RawCredential>,
}

impl CredentialIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a credential under `key` and under each identifier it carries.
    pub fn insert(&mut self, key: Option<&str>, credential: RawCredential) {
        let keys: Vec<String> = [key, credential.identifier(), credential.original_item_id()]
            .into_iter()
            .flatten()
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .collect();
        for k in keys {
            self.by_id.insert(k, credential.clone());
        }
    }

    /// Build an index from JSON: either an object mapping keys to
    /// credentials, or an array of credentials. Non-object entries are
    /// ignored.
    pub fn from_json(value: &Value) -> Self {
        let mut index = Self::new();
        match value {
            Value::Object(map) => {
                for (key, credential) in map.iter().filter(|(_, v)| v.is_object()) {
                    index.insert(Some(key.as_str()), RawCredential::new(credential.clone()));
                }
            }
            Value::Array(items) => {
                for credential in items.iter().filter(|v| v.is_object()) {
                    index.insert(None, RawCredential::new(credential.clone()));
                }
            }
            _ => {}
        }
        index
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True when nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl CredentialStore for CredentialIndex {
    fn lookup(&self, id: &str) -> Option<RawCredential> {
        self.by_id.get(id).cloned()
    }
}
