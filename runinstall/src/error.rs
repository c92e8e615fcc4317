//! Error types for runinstall.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while deriving tool constraints from repository files.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {field} in {path}: expected {expected}")]
    InvalidField {
        path: PathBuf,
        field: String,
        expected: String,
    },
}

/// Result type for constraint resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;
