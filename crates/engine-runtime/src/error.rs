use connectors::error::DbError;
use engine_processing::error::WorkerError;
use thiserror::Error;

/// Terminal error of a migration run, naming the phase that failed.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Nothing was written: one side did not answer before the reset.
    #[error("Cannot reach the {side}: {source}")]
    Connect {
        side: &'static str,
        #[source]
        source: DbError,
    },

    #[error("Failed to reset destination collection: {0}")]
    Reset(#[source] DbError),

    #[error("Failed to count source records: {0}")]
    Count(#[source] DbError),

    /// The first worker failure; siblings were cancelled.
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// Index creation failed, typically on duplicate tax ids.
    #[error("Failed to create destination indexes: {0}")]
    Index(#[source] DbError),

    /// A worker task panicked or was aborted.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// The caller cancelled the run before it completed.
    #[error("Migration cancelled")]
    Cancelled,
}

impl MigrationError {
    pub fn phase(&self) -> &'static str {
        match self {
            MigrationError::Connect { .. } => "connect",
            MigrationError::Reset(_) => "reset",
            MigrationError::Count(_) => "count",
            MigrationError::Worker(_) | MigrationError::TaskJoin(_) => "worker",
            MigrationError::Index(_) => "index",
            MigrationError::Cancelled => "cancelled",
        }
    }
}
