//! # Evidence and File Resolution
//!
//! Supporting files are attached to resume items through an evidence map
//! (`section -> item index -> [fileId]`). A [`FileResolver`] turns each
//! fileId into the URL a reader of the credential can open, using a
//! caller-supplied [`FileRegistry`]. Resolution is pure: the registry is
//! only read.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::section::SectionKind;

/// Default prefix for Drive content URLs.
pub const DRIVE_CONTENT_URL: &str = "https://drive.google.com/uc?export=view&id=";

/// What the file registry knows about one stored file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Read-only lookup of stored files by fileId.
pub trait FileRegistry {
    fn resolve(&self, file_id: &str) -> Option<FileEntry>;
}

impl<T: FileRegistry + ?Sized> FileRegistry for &T {
    fn resolve(&self, file_id: &str) -> Option<FileEntry> {
        (**self).resolve(file_id)
    }
}

impl<S: BuildHasher> FileRegistry for HashMap<String, FileEntry, S> {
    fn resolve(&self, file_id: &str) -> Option<FileEntry> {
        self.get(file_id).cloned()
    }
}

impl FileRegistry for BTreeMap<String, FileEntry> {
    fn resolve(&self, file_id: &str) -> Option<FileEntry> {
        self.get(file_id).cloned()
    }
}

/// Files attached to each item, keyed by section editor key then index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceMap(BTreeMap<String, BTreeMap<usize, Vec<String>>>);

impl EvidenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `file_id` to item `index` of `section`.
    pub fn attach(&mut self, section: SectionKind, index: usize, file_id: impl Into<String>) {
        self.0
            .entry(section.editor_key().to_string())
            .or_default()
            .entry(index)
            .or_default()
            .push(file_id.into());
    }

    /// FileIds attached to one item.
    pub fn files_for(&self, section: SectionKind, index: usize) -> &[String] {
        self.0
            .get(section.editor_key())
            .and_then(|items| items.get(&index))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Lenient read of a JSON evidence map.
    ///
    /// Each section may map item indexes (as object keys) or positions (as
    /// an array) to fileId lists. Unreadable entries are skipped.
    pub fn from_json(value: &Value) -> Self {
        let mut map = Self::new();
        let Some(sections) = value.as_object() else {
            return map;
        };
        for (section, items) in sections {
            let Some(kind) = SectionKind::from_editor_key(section) else {
                tracing::debug!(section = %section, "skipping evidence for unknown section");
                continue;
            };
            let indexed: Vec<(usize, &Value)> = match items {
                Value::Object(by_index) => by_index
                    .iter()
                    .filter_map(|(k, v)| k.parse::<usize>().ok().map(|i| (i, v)))
                    .collect(),
                Value::Array(by_position) => by_position.iter().enumerate().collect(),
                _ => Vec::new(),
            };
            for (index, files) in indexed {
                let ids: Vec<&str> = match files {
                    Value::Array(ids) => ids.iter().filter_map(Value::as_str).collect(),
                    Value::String(id) => vec![id.as_str()],
                    _ => Vec::new(),
                };
                for id in ids.into_iter().filter(|id| !id.is_empty()) {
                    map.attach(kind, index, id);
                }
            }
        }
        map
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|items| items.values().all(Vec::is_empty))
    }
}

/// Resolves fileIds to display URLs through a [`FileRegistry`].
pub struct FileResolver<'a> {
    registry: &'a dyn FileRegistry,
    drive_content_url: String,
}

impl<'a> FileResolver<'a> {
    pub fn new(registry: &'a dyn FileRegistry) -> Self {
        Self {
            registry,
            drive_content_url: DRIVE_CONTENT_URL.to_string(),
        }
    }

    /// Use a different Drive content URL prefix.
    pub fn with_drive_content_url(mut self, prefix: impl Into<String>) -> Self {
        self.drive_content_url = prefix.into();
        self
    }

    /// Display URL for one file: the Drive content URL when the registry
    /// has a `driveId`, else its stored `url`, else the bare fileId.
    pub fn url_for(&self, file_id: &str) -> String {
        let entry = self.registry.resolve(file_id).unwrap_or_default();
        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        if let Some(drive_id) = non_empty(entry.drive_id) {
            return format!("{}{drive_id}", self.drive_content_url);
        }
        non_empty(entry.url).unwrap_or_else(|| file_id.to_string())
    }

    /// Display URLs for every file attached to one item.
    pub fn attached_files(
        &self,
        evidence: &EvidenceMap,
        section: SectionKind,
        index: usize,
    ) -> Vec<String> {
        evidence
            .files_for(section, index)
            .iter()
            .map(|id| self.url_for(id))
            .collect()
    }
}

impl std::fmt::Debug for FileResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileResolver")
            .field("drive_content_url", &self.drive_content_url)
            .finish_non_exhaustive()
    }
}
