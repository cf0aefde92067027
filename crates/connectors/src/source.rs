use crate::error::DbError;
use async_trait::async_trait;
use model::{pagination::range::WorkRange, records::row::SourceRow};

/// Read side of a migration: a table addressed by 1-based record offsets.
///
/// Ranges are addressed by offset without an `ORDER BY`, so they only stay
/// disjoint while the table's natural scan order is stable, which holds for a
/// table nobody writes to during the run.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Round-trips to the server so a bad address or credentials surface
    /// before anything is written.
    async fn check_connection(&self) -> Result<(), DbError>;

    /// Counts the records to migrate, stopping at `cap` when one is given.
    async fn count_records(&self, cap: Option<u64>) -> Result<u64, DbError>;

    /// Issues one bounded query for `range`.
    async fn fetch_range(&self, range: WorkRange) -> Result<Box<dyn RowCursor>, DbError>;
}

/// Rows of one bounded query, yielded in source order.
#[async_trait]
pub trait RowCursor: Send {
    /// Column names of the result set, in positional order.
    fn columns(&self) -> Result<&[String], DbError>;

    /// Next row, or `None` once the result set is exhausted.
    async fn next_row(&mut self) -> Result<Option<SourceRow>, DbError>;
}
