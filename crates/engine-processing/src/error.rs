use connectors::error::DbError;
use model::{core::error::MappingError, pagination::range::WorkRange};
use thiserror::Error;

/// A failure that ends one worker's range early. Every variant carries the
/// worker id so a single line identifies the culprit.
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Worker {worker_id}: query for range {range} failed: {source}")]
    Query {
        worker_id: usize,
        range: WorkRange,
        #[source]
        source: DbError,
    },

    #[error("Worker {worker_id}: failed to read result columns: {source}")]
    Columns {
        worker_id: usize,
        #[source]
        source: DbError,
    },

    #[error("Worker {worker_id}: failed to read record {record}: {source}")]
    Scan {
        worker_id: usize,
        record: u64,
        #[source]
        source: DbError,
    },

    #[error("Worker {worker_id}: bulk insert of {docs} documents failed: {source}")]
    Insert {
        worker_id: usize,
        docs: usize,
        #[source]
        source: DbError,
    },

    #[error("Worker {worker_id}: {source}")]
    Mapping {
        worker_id: usize,
        #[source]
        source: MappingError,
    },
}

impl WorkerError {
    pub fn worker_id(&self) -> usize {
        match self {
            WorkerError::Query { worker_id, .. }
            | WorkerError::Columns { worker_id, .. }
            | WorkerError::Scan { worker_id, .. }
            | WorkerError::Insert { worker_id, .. }
            | WorkerError::Mapping { worker_id, .. } => *worker_id,
        }
    }

    /// Short operation name for logs and summaries.
    pub fn operation(&self) -> &'static str {
        match self {
            WorkerError::Query { .. } => "query",
            WorkerError::Columns { .. } => "columns",
            WorkerError::Scan { .. } => "scan",
            WorkerError::Insert { .. } => "insert",
            WorkerError::Mapping { .. } => "mapping",
        }
    }
}
