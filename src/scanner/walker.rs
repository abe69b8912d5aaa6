//! Single-threaded recursive walker that feeds per-entry outcomes into a [`ScanResult`].
//!
//! Every entry resolves to an explicit [`EntryOutcome`]. Failures below the
//! root become [`EntryOutcome::Skipped`] and never abort the traversal; only
//! resolving the root itself can fail the scan.

use std::collections::HashSet;
use std::fs::{self, DirEntry};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, info};

use super::result::ScanResult;
use crate::core::config::ScannerConfig;
use crate::core::errors::{AdvisorError, Result};

/// Why an entry contributed nothing but a skip counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Listing or inspecting the entry was refused.
    PermissionDenied,
    /// A regular file whose size could not be read (vanished, unreadable).
    SizeUnavailable(io::ErrorKind),
    /// Any other I/O failure on the entry.
    Io(io::ErrorKind),
}

impl SkipReason {
    fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            kind => Self::Io(kind),
        }
    }
}

/// Classification of one visited entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Regular file with a measured size.
    File { path: PathBuf, size: u64 },
    /// Directory to descend into.
    Directory { path: PathBuf },
    /// Followed symlink to a directory already visited (a cycle or a second
    /// link to the same target); its contents are counted once.
    Revisited { path: PathBuf },
    /// Symlink, socket, FIFO, or device node.
    Other { path: PathBuf },
    /// Entry that could not be read.
    Skipped { path: PathBuf, reason: SkipReason },
}

/// Traversal policy.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Resolve symlinks and descend through them.
    pub follow_symlinks: bool,
    /// Checked before every directory and entry; once set the scan stops.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ScanOptions {
    /// Policy from the `[scanner]` config table, without cancellation.
    #[must_use]
    pub fn from_config(config: &ScannerConfig) -> Self {
        Self {
            follow_symlinks: config.follow_symlinks,
            cancel: None,
        }
    }

    /// Attach a flag that interrupts the scan once raised.
    #[must_use]
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
}

/// Recursive tree scanner.
#[derive(Debug, Clone, Default)]
pub struct TreeScanner {
    options: ScanOptions,
}

impl TreeScanner {
    /// Scanner with the given traversal policy.
    #[must_use]
    pub const fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan `root` and aggregate everything below it.
    ///
    /// Fails only when `root` does not exist, is not a directory, or its
    /// metadata cannot be read.
    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        let metadata = fs::metadata(root).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                AdvisorError::PathNotFound {
                    path: root.to_path_buf(),
                }
            } else {
                AdvisorError::io(root, source)
            }
        })?;
        if !metadata.is_dir() {
            return Err(AdvisorError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let started = Instant::now();
        debug!(root = %root.display(), follow_symlinks = self.options.follow_symlinks, "scan started");

        let mut result = ScanResult::default();
        let mut visited = HashSet::<PathBuf>::new();
        if self.options.follow_symlinks {
            if let Ok(canonical) = fs::canonicalize(root) {
                visited.insert(canonical);
            }
        }

        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            self.check_cancel(root)?;
            self.visit(root, dir, &mut result, &mut visited, &mut pending)?;
        }

        info!(
            root = %root.display(),
            files = result.total_files(),
            directories = result.total_directories(),
            bytes = result.total_size(),
            skipped = result.skipped_entries(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "scan completed"
        );
        Ok(result)
    }

    /// List one directory, absorbing each entry and queueing subdirectories.
    fn visit(
        &self,
        root: &Path,
        dir: PathBuf,
        result: &mut ScanResult,
        visited: &mut HashSet<PathBuf>,
        pending: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let listing = match fs::read_dir(&dir) {
            Ok(listing) => listing,
            Err(err) => {
                let reason = SkipReason::from_io(&err);
                absorb(result, EntryOutcome::Skipped { path: dir, reason });
                return Ok(());
            }
        };

        for entry in listing {
            self.check_cancel(root)?;
            let outcome = match entry {
                Ok(entry) => self.classify(&entry, visited),
                Err(err) => EntryOutcome::Skipped {
                    path: dir.clone(),
                    reason: SkipReason::from_io(&err),
                },
            };
            if let Some(subdir) = absorb(result, outcome) {
                pending.push(subdir);
            }
        }
        Ok(())
    }

    fn check_cancel(&self, root: &Path) -> Result<()> {
        let cancelled = self
            .options
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        if cancelled {
            info!(root = %root.display(), "scan interrupted");
            return Err(AdvisorError::ScanInterrupted {
                path: root.to_path_buf(),
            });
        }
        Ok(())
    }

    fn classify(&self, entry: &DirEntry, visited: &mut HashSet<PathBuf>) -> EntryOutcome {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                let reason = SkipReason::from_io(&err);
                return EntryOutcome::Skipped { path, reason };
            }
        };

        if file_type.is_symlink() {
            if !self.options.follow_symlinks {
                return EntryOutcome::Other { path };
            }
            return match fs::metadata(&path) {
                Ok(target) if target.is_dir() => self.enter_directory(path, visited),
                Ok(target) if target.is_file() => EntryOutcome::File {
                    path,
                    size: target.len(),
                },
                Ok(_) => EntryOutcome::Other { path },
                Err(err) => EntryOutcome::Skipped {
                    path,
                    reason: SkipReason::from_io(&err),
                },
            };
        }

        if file_type.is_dir() {
            return self.enter_directory(path, visited);
        }

        if file_type.is_file() {
            return match entry.metadata() {
                Ok(metadata) => EntryOutcome::File {
                    path,
                    size: metadata.len(),
                },
                Err(err) => EntryOutcome::Skipped {
                    path,
                    reason: SkipReason::SizeUnavailable(err.kind()),
                },
            };
        }

        EntryOutcome::Other { path }
    }

    fn enter_directory(&self, path: PathBuf, visited: &mut HashSet<PathBuf>) -> EntryOutcome {
        if !self.options.follow_symlinks {
            return EntryOutcome::Directory { path };
        }
        match fs::canonicalize(&path) {
            Ok(canonical) => {
                if visited.insert(canonical) {
                    EntryOutcome::Directory { path }
                } else {
                    EntryOutcome::Revisited { path }
                }
            }
            Err(err) => EntryOutcome::Skipped {
                path,
                reason: SkipReason::from_io(&err),
            },
        }
    }
}

/// Scan `root` with the default policy (symlinks not followed, no cancellation).
pub fn scan(root: &Path) -> Result<ScanResult> {
    TreeScanner::default().scan(root)
}

/// Fold one outcome into the running totals; returns a directory still to visit.
fn absorb(result: &mut ScanResult, outcome: EntryOutcome) -> Option<PathBuf> {
    match outcome {
        EntryOutcome::File { path, size } => {
            result.record_file(&path, size);
            None
        }
        EntryOutcome::Directory { path } => {
            result.record_directory();
            Some(path)
        }
        EntryOutcome::Revisited { path } => {
            debug!(path = %path.display(), "directory already visited");
            result.record_other();
            None
        }
        EntryOutcome::Other { .. } => {
            result.record_other();
            None
        }
        EntryOutcome::Skipped { path, reason } => {
            debug!(path = %path.display(), ?reason, "entry skipped");
            match reason {
                SkipReason::SizeUnavailable(_) => result.record_unmeasured(),
                SkipReason::PermissionDenied | SkipReason::Io(_) => result.record_skipped(),
            }
            None
        }
    }
}
