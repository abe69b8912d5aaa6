//! JSONL journal writer: one self-contained JSON object per advisory.

#![allow(missing_docs)]

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::advisor::{Assessment, TargetImpact};
use crate::core::errors::{AdvisorError, Result};

/// One journal line.
#[derive(Debug, Clone, Serialize)]
pub struct JournalRecord {
    pub timestamp: DateTime<Utc>,
    pub command: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<JournalTarget>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JournalTarget {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_files: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_directories: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

impl JournalRecord {
    #[must_use]
    pub fn from_assessment(assessment: &Assessment, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            command: assessment.command_line.clone(),
            kind: assessment.advisory.kind(),
            targets: assessment.targets.iter().map(JournalTarget::from).collect(),
        }
    }
}

impl From<&TargetImpact> for JournalTarget {
    fn from(target: &TargetImpact) -> Self {
        match &target.outcome {
            Ok(scan) => Self {
                path: target.path.clone(),
                total_files: Some(scan.total_files()),
                total_directories: Some(scan.total_directories()),
                total_size: Some(scan.total_size()),
                error_code: None,
            },
            Err(err) => Self {
                path: target.path.clone(),
                total_files: None,
                total_directories: None,
                total_size: None,
                error_code: Some(err.code()),
            },
        }
    }
}

/// Append-only JSONL file.
#[derive(Debug, Clone)]
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file and its parent directory as needed.
    pub fn append(&self, record: &JournalRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AdvisorError::io(parent, e))?;
        }
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AdvisorError::io(&self.path, e))?;
        file.write_all(&line)
            .map_err(|e| AdvisorError::io(&self.path, e))?;
        Ok(())
    }
}
