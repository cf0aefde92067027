use crate::error::CliError;
use async_trait::async_trait;
use connectors::{
    mongo::destination::{MongoDestination, MongoParams},
    sql::mysql::adapter::{MySqlAdapter, MySqlParams},
};
use std::str::FromStr;
use tracing::{error, info};

/// What kind of connection to check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    MySql,
    MongoDb,
}

impl FromStr for ConnectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(ConnectionKind::MySql),
            "mongodb" | "mongo" => Ok(ConnectionKind::MongoDb),
            other => Err(format!("Unknown connection kind: {other}")),
        }
    }
}

/// Trait for "pinging" one side of the migration
#[async_trait]
pub trait ConnectionPinger {
    /// Attempts to ping; returns Err if unreachable
    async fn ping(&self) -> Result<(), CliError>;
}

/// MySQL/MariaDB pinger
pub struct MySqlConnectionPinger {
    pub params: MySqlParams,
}

/// MongoDB pinger
pub struct MongoConnectionPinger {
    pub params: MongoParams,
}

#[async_trait]
impl ConnectionPinger for MySqlConnectionPinger {
    async fn ping(&self) -> Result<(), CliError> {
        let adapter = MySqlAdapter::connect(&self.params)?;
        let result = adapter.ping().await;

        if let Err(e) = adapter.disconnect().await {
            error!("Failed to close MySQL pool: {}", e);
        }

        result?;
        info!("MySQL at '{}' is reachable", self.params.display_target());
        Ok(())
    }
}

#[async_trait]
impl ConnectionPinger for MongoConnectionPinger {
    async fn ping(&self) -> Result<(), CliError> {
        let destination = MongoDestination::connect(&self.params).await?;
        destination.ping().await?;
        info!("MongoDB for '{}' is reachable", destination.namespace());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_targets() {
        assert_eq!("MySQL".parse(), Ok(ConnectionKind::MySql));
        assert_eq!("mariadb".parse(), Ok(ConnectionKind::MySql));
        assert_eq!("mongo".parse(), Ok(ConnectionKind::MongoDb));
        assert!("postgres".parse::<ConnectionKind>().is_err());
    }
}
