use connectors::{destination::DocumentDestination, error::DbError};
use model::records::document::Document;
use std::{sync::Arc, time::Instant};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct WriteResult {
    pub docs_written: usize,
}

/// Bulk-inserts one batch for one worker. No retries: a failed insert fails
/// the worker.
pub struct BatchWriter {
    destination: Arc<dyn DocumentDestination>,
    worker_id: usize,
}

impl BatchWriter {
    pub fn new(destination: Arc<dyn DocumentDestination>, worker_id: usize) -> Self {
        Self {
            destination,
            worker_id,
        }
    }

    pub async fn write_batch(&self, docs: &[Document]) -> Result<WriteResult, DbError> {
        let start = Instant::now();

        debug!(
            worker_id = self.worker_id,
            docs = docs.len(),
            "Writing batch to destination"
        );

        self.destination.insert_batch(docs).await?;

        let duration = start.elapsed();
        let docs_written = docs.len();
        let docs_per_sec = docs_written as f64 / duration.as_secs_f64().max(f64::EPSILON);

        debug!(
            worker_id = self.worker_id,
            docs = docs_written,
            duration_ms = duration.as_millis(),
            docs_per_sec = %format!("{:.2}", docs_per_sec),
            "Batch written"
        );

        Ok(WriteResult { docs_written })
    }
}
