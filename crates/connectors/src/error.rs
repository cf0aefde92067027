use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to the source or destination store.
#[derive(Debug, Error)]
pub enum DbError {
    /// Any MySQL driver error.
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// Any MongoDB driver error.
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The result set exposed no columns.
    #[error("Query returned no columns")]
    NoColumns,

    /// The row reader stopped before the result set was exhausted.
    #[error("Row reader stopped unexpectedly: {0}")]
    ReaderStopped(String),

    #[error("No reply within {0:?}")]
    Timeout(Duration),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Errors happening while setting up a connection.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("MySQL connection failed: {0}")]
    MySql(#[from] mysql_async::Error),

    #[error("MongoDB connection failed: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Table names are interpolated into SQL and must be plain identifiers.
    #[error("Invalid table name: '{0}'")]
    InvalidTable(String),

    #[error("Ping to {target} returned an unexpected result: {detail}")]
    UnexpectedPing { target: &'static str, detail: String },
}

impl From<ConnectorError> for DbError {
    fn from(err: ConnectorError) -> Self {
        match err {
            ConnectorError::MySql(e) => DbError::MySql(e),
            ConnectorError::Mongo(e) => DbError::Mongo(e),
            other => DbError::Unknown(other.to_string()),
        }
    }
}
