//! TOML configuration: scanner policy, report shape, journal, and custom advisory rules.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{AdvisorError, Result};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "ADVISOR_CONFIG";

/// Number of extension buckets shown in the removal report by default.
pub const DEFAULT_TOP_EXTENSIONS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub report: ReportConfig,
    pub journal: JournalConfig,
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScannerConfig {
    /// Resolve symlinks during traversal (with cycle detection).
    pub follow_symlinks: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub top_extensions: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_extensions: DEFAULT_TOP_EXTENSIONS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JournalConfig {
    pub enabled: bool,
    /// Journal file; defaults to `<data dir>/advisor/advisories.jsonl`.
    pub path: Option<PathBuf>,
}

/// A user-defined dangerous-command rule, matched against the space-joined command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub name: String,
    pub pattern: String,
    pub warning: String,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `ADVISOR_CONFIG`, then the user
    /// config directory, are tried; a missing implicit file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
            return Self::from_file(Path::new(&path));
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AdvisorError::MissingConfig {
                    path: path.to_path_buf(),
                }
            } else {
                AdvisorError::io(path, source)
            }
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.report.top_extensions == 0 {
            return Err(AdvisorError::InvalidConfig {
                details: "report.top_extensions must be at least 1".to_string(),
            });
        }
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(AdvisorError::InvalidConfig {
                    details: format!("rules[{index}].name must not be empty"),
                });
            }
            regex::Regex::new(&rule.pattern).map_err(|e| AdvisorError::InvalidConfig {
                details: format!("rules[{index}] ({}) has an invalid pattern: {e}", rule.name),
            })?;
        }
        Ok(())
    }

    /// Journal location, honoring the configured override.
    #[must_use]
    pub fn journal_path(&self) -> Option<PathBuf> {
        self.journal
            .path
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("advisor").join("advisories.jsonl")))
    }
}

fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("advisor").join("config.toml"))
}

fn config_dir() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|home| home.join(".config")))
}

fn data_dir() -> Option<PathBuf> {
    env::var_os("XDG_DATA_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|home| home.join(".local").join("share")))
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
