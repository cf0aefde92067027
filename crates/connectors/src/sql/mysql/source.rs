use crate::{
    error::DbError,
    source::{RecordSource, RowCursor},
    sql::mysql::{adapter::MySqlAdapter, value::from_mysql},
};
use async_trait::async_trait;
use model::{core::value::Value, pagination::range::WorkRange, records::row::SourceRow};
use mysql_async::{Pool, prelude::*};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Rows buffered between the reader task and the worker.
const ROW_BUFFER: usize = 1024;

type ColumnsTx = oneshot::Sender<Result<Vec<String>, DbError>>;
type RowsTx = mpsc::Sender<Result<SourceRow, DbError>>;

#[async_trait]
impl RecordSource for MySqlAdapter {
    async fn check_connection(&self) -> Result<(), DbError> {
        Ok(self.ping().await?)
    }

    async fn count_records(&self, cap: Option<u64>) -> Result<u64, DbError> {
        let sql = count_sql(self.table(), cap);
        debug!("Counting source records: {sql}");

        let mut conn = self.pool().get_conn().await?;
        let count: Option<u64> = conn.query_first(sql).await?;
        Ok(count.unwrap_or(0))
    }

    async fn fetch_range(&self, range: WorkRange) -> Result<Box<dyn RowCursor>, DbError> {
        let (columns_tx, columns_rx) = oneshot::channel();
        let (rows_tx, rows_rx) = mpsc::channel(ROW_BUFFER);

        tokio::spawn(read_rows(
            self.pool().clone(),
            select_sql(self.table()),
            range,
            columns_tx,
            rows_tx,
        ));

        let columns = columns_rx.await.map_err(|_| {
            DbError::ReaderStopped("reader exited before reporting columns".to_string())
        })??;

        Ok(Box::new(MySqlRowCursor {
            columns,
            rows: rows_rx,
        }))
    }
}

fn count_sql(table: &str, cap: Option<u64>) -> String {
    match cap {
        Some(cap) => format!("SELECT COUNT(*) FROM (SELECT 1 FROM {table} LIMIT {cap}) AS t"),
        None => format!("SELECT COUNT(*) FROM {table}"),
    }
}

fn select_sql(table: &str) -> String {
    format!("SELECT * FROM {table} LIMIT ? OFFSET ?")
}

/// Streams one range from a dedicated connection. The column list is sent
/// before any row; a dropped receiver stops the read.
async fn read_rows(
    pool: Pool,
    sql: String,
    range: WorkRange,
    columns_tx: ColumnsTx,
    rows_tx: RowsTx,
) {
    let mut conn = match pool.get_conn().await {
        Ok(conn) => conn,
        Err(e) => {
            let _ = columns_tx.send(Err(e.into()));
            return;
        }
    };

    let mut result = match conn.exec_iter(sql, (range.limit(), range.offset())).await {
        Ok(result) => result,
        Err(e) => {
            let _ = columns_tx.send(Err(e.into()));
            return;
        }
    };

    let columns = result
        .columns_ref()
        .iter()
        .map(|col| col.name_str().into_owned())
        .collect();
    if columns_tx.send(Ok(columns)).is_err() {
        return;
    }

    loop {
        let item = match result.next().await {
            Ok(Some(row)) => Ok(SourceRow::new(
                row.unwrap_raw()
                    .into_iter()
                    .map(|v| v.map(from_mysql).unwrap_or(Value::Null))
                    .collect(),
            )),
            Ok(None) => break,
            Err(e) => Err(DbError::from(e)),
        };

        let failed = item.is_err();
        if rows_tx.send(item).await.is_err() {
            warn!("Row receiver for range {range} dropped, stopping read");
            break;
        }
        if failed {
            break;
        }
    }
}

struct MySqlRowCursor {
    columns: Vec<String>,
    rows: mpsc::Receiver<Result<SourceRow, DbError>>,
}

#[async_trait]
impl RowCursor for MySqlRowCursor {
    fn columns(&self) -> Result<&[String], DbError> {
        if self.columns.is_empty() {
            return Err(DbError::NoColumns);
        }
        Ok(&self.columns)
    }

    async fn next_row(&mut self) -> Result<Option<SourceRow>, DbError> {
        self.rows.recv().await.transpose()
    }
}
