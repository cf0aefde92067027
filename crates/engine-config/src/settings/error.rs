use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating run settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A settings file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file is not valid JSON for its schema.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An environment override could not be parsed.
    #[error("Invalid value '{value}' for environment variable {key}")]
    InvalidEnv { key: String, value: String },

    /// One or more settings are out of range.
    #[error("Settings validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),
}
