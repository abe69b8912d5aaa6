//! Aggregated outcome of one scan.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use super::extensions::extension_key;

/// Totals for everything a recursive removal of the scanned root would destroy.
///
/// Built only by the scanner; callers receive it read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    total_files: u64,
    total_directories: u64,
    total_size: u64,
    largest_file_size: u64,
    #[serde(serialize_with = "path_or_empty")]
    largest_file_path: Option<PathBuf>,
    file_types: BTreeMap<String, u64>,
    unmeasured_files: u64,
    skipped_entries: u64,
    other_entries: u64,
}

impl ScanResult {
    /// Regular files whose size was measured.
    #[must_use]
    pub const fn total_files(&self) -> u64 {
        self.total_files
    }

    /// Subdirectories below the root (the root itself is not counted).
    #[must_use]
    pub const fn total_directories(&self) -> u64 {
        self.total_directories
    }

    /// Sum of measured file sizes in bytes.
    #[must_use]
    pub const fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Size of the largest measured file; `0` when there is none.
    #[must_use]
    pub const fn largest_file_size(&self) -> u64 {
        self.largest_file_size
    }

    /// First file (in traversal order) that reached the largest size.
    #[must_use]
    pub fn largest_file_path(&self) -> Option<&Path> {
        self.largest_file_path.as_deref()
    }

    /// Count of measured files per extension bucket.
    #[must_use]
    pub const fn file_types(&self) -> &BTreeMap<String, u64> {
        &self.file_types
    }

    /// Files found whose size could not be read; excluded from every other total.
    #[must_use]
    pub const fn unmeasured_files(&self) -> u64 {
        self.unmeasured_files
    }

    /// Entries or directory listings that could not be read.
    #[must_use]
    pub const fn skipped_entries(&self) -> u64 {
        self.skipped_entries
    }

    /// Entries that are neither regular files nor directories.
    #[must_use]
    pub const fn other_entries(&self) -> u64 {
        self.other_entries
    }

    /// Whether any part of the tree went unaccounted for.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.unmeasured_files > 0 || self.skipped_entries > 0
    }

    pub(crate) fn record_file(&mut self, path: &Path, size: u64) {
        self.total_files += 1;
        self.total_size = self.total_size.saturating_add(size);
        if size > self.largest_file_size {
            self.largest_file_size = size;
            self.largest_file_path = Some(path.to_path_buf());
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        *self
            .file_types
            .entry(extension_key(&name).to_string())
            .or_insert(0) += 1;
    }

    pub(crate) fn record_directory(&mut self) {
        self.total_directories += 1;
    }

    pub(crate) fn record_unmeasured(&mut self) {
        self.unmeasured_files += 1;
    }

    pub(crate) fn record_skipped(&mut self) {
        self.skipped_entries += 1;
    }

    pub(crate) fn record_other(&mut self) {
        self.other_entries += 1;
    }
}

fn path_or_empty<S: Serializer>(path: &Option<PathBuf>, serializer: S) -> Result<S::Ok, S::Error> {
    match path {
        Some(path) => serializer.serialize_str(&path.to_string_lossy()),
        None => serializer.serialize_str(""),
    }
}
