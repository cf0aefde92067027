use crate::{
    error::{ConnectorError, DbError},
    sql::is_safe_table_name,
};
use mysql_async::{OptsBuilder, Pool, prelude::*};
use tracing::{error, info};

/// Where the source table lives.
#[derive(Debug, Clone)]
pub struct MySqlParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub table: String,
}

impl MySqlParams {
    /// `host:port/database`, safe to log.
    pub fn display_target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

/// Connection pool bound to one source table.
#[derive(Clone)]
pub struct MySqlAdapter {
    pool: Pool,
    table: String,
    target: String,
}

impl MySqlAdapter {
    /// Builds the pool. Connections are opened lazily on first use.
    pub fn connect(params: &MySqlParams) -> Result<Self, ConnectorError> {
        if !is_safe_table_name(&params.table) {
            return Err(ConnectorError::InvalidTable(params.table.clone()));
        }

        let opts = OptsBuilder::default()
            .ip_or_hostname(params.host.clone())
            .tcp_port(params.port)
            .user(Some(params.user.clone()))
            .pass(Some(params.password.clone()))
            .db_name(Some(params.database.clone()));

        Ok(MySqlAdapter {
            pool: Pool::new(opts),
            table: params.table.clone(),
            target: params.display_target(),
        })
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Runs `SELECT 1` on a fresh connection.
    pub async fn ping(&self) -> Result<(), ConnectorError> {
        info!("Pinging MySQL at '{}'", self.target);

        let mut conn = self.pool.get_conn().await.map_err(|e| {
            error!("MySQL connection to '{}' failed: {}", self.target, e);
            ConnectorError::MySql(e)
        })?;

        let val: Option<i32> = conn.query_first("SELECT 1").await.map_err(|e| {
            error!("MySQL ping query on '{}' failed: {}", self.target, e);
            ConnectorError::MySql(e)
        })?;

        if val != Some(1) {
            return Err(ConnectorError::UnexpectedPing {
                target: "MySQL",
                detail: format!("{val:?}"),
            });
        }

        info!("MySQL ping to '{}' succeeded", self.target);
        Ok(())
    }

    /// Waits for every pooled connection to close.
    pub async fn disconnect(self) -> Result<(), DbError> {
        self.pool.disconnect().await?;
        Ok(())
    }
}
