use connectors::error::{ConnectorError, DbError};
use engine_config::settings::error::SettingsError;
use engine_runtime::error::MigrationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to load settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Invalid environment file: {0}")]
    EnvFile(String),

    #[error("Connection failed: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Source query failed: {0}")]
    Source(#[from] DbError),

    #[error("Migration failed in phase '{phase}': {0}", phase = .0.phase())]
    Runner(MigrationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Invalid connection target provided: {0}")]
    InvalidConnectionTarget(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Shutdown requested")]
    ShutdownRequested,
}

impl From<MigrationError> for CliError {
    fn from(err: MigrationError) -> Self {
        match err {
            MigrationError::Cancelled => CliError::ShutdownRequested,
            other => CliError::Runner(other),
        }
    }
}
