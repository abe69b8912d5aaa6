//! ADV-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Top-level error type for the destructive-command advisor.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("[ADV-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[ADV-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[ADV-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[ADV-1101] no command given")]
    MissingCommand,

    #[error("[ADV-1102] {command}: missing required argument {argument}")]
    MissingArgument {
        command: String,
        argument: &'static str,
    },

    #[error("[ADV-2001] path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    #[error("[ADV-2002] path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("[ADV-2003] scan of {path} interrupted")]
    ScanInterrupted { path: PathBuf },

    #[error("[ADV-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[ADV-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AdvisorError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "ADV-1001",
            Self::MissingConfig { .. } => "ADV-1002",
            Self::ConfigParse { .. } => "ADV-1003",
            Self::MissingCommand => "ADV-1101",
            Self::MissingArgument { .. } => "ADV-1102",
            Self::PathNotFound { .. } => "ADV-2001",
            Self::NotADirectory { .. } => "ADV-2002",
            Self::ScanInterrupted { .. } => "ADV-2003",
            Self::Serialization { .. } => "ADV-2101",
            Self::Io { .. } => "ADV-3002",
        }
    }

    /// Whether the failure came from the user's invocation rather than the environment.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::MissingCommand | Self::MissingArgument { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for AdvisorError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for AdvisorError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<regex::Error> for AdvisorError {
    fn from(value: regex::Error) -> Self {
        Self::InvalidConfig {
            details: format!("invalid rule pattern: {value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AdvisorError;
    use std::path::PathBuf;

    #[test]
    fn message_carries_code_prefix() {
        let err = AdvisorError::NotADirectory {
            path: PathBuf::from("/etc/hosts"),
        };
        let rendered = err.to_string();
        assert!(rendered.starts_with(&format!("[{}]", err.code())));
        assert!(rendered.contains("/etc/hosts"));
    }

    #[test]
    fn only_invocation_errors_are_usage() {
        let missing = AdvisorError::PathNotFound {
            path: PathBuf::from("/nope"),
        };
        assert!(!missing.is_usage());

        let usage = AdvisorError::MissingArgument {
            command: "rm".to_string(),
            argument: "<path>",
        };
        assert!(usage.is_usage());
        assert!(AdvisorError::MissingCommand.is_usage());
    }

    #[test]
    fn toml_errors_map_to_config_parse() {
        let parse = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err = AdvisorError::from(parse);
        assert_eq!(err.code(), "ADV-1003");
    }
}
