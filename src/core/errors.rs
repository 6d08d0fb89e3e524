//! DAP-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Top-level error type for dapsweep.
///
/// Only `InvalidRoot` and the config errors abort a run. Per-entry traversal
/// failures are recorded as risk flags on findings, never raised here.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("[DAP-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[DAP-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[DAP-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[DAP-2001] invalid scan root {path}: {details}")]
    InvalidRoot { path: PathBuf, details: String },

    #[error("[DAP-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[DAP-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SweepError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "DAP-1001",
            Self::MissingConfig { .. } => "DAP-1002",
            Self::ConfigParse { .. } => "DAP-1003",
            Self::InvalidRoot { .. } => "DAP-2001",
            Self::Serialization { .. } => "DAP-2101",
            Self::Io { .. } => "DAP-3002",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
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

impl From<serde_json::Error> for SweepError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for SweepError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
