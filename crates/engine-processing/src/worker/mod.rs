use crate::{
    error::WorkerError,
    transform::mapping::DocumentBuilder,
    worker::writer::BatchWriter,
};
use connectors::{destination::DocumentDestination, source::RecordSource};
use model::{pagination::range::WorkRange, records::document::Document};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub mod writer;

/// Collaborators shared by every worker of a run.
#[derive(Clone)]
pub struct WorkerContext {
    pub source: Arc<dyn RecordSource>,
    pub destination: Arc<dyn DocumentDestination>,
    pub builder: Arc<DocumentBuilder>,
    /// Receives the document count of every successful flush.
    pub progress: mpsc::Sender<u64>,
    pub cancel: CancellationToken,
}

/// What one worker got done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub range: WorkRange,
    pub docs_written: u64,
    pub batches: u64,
    /// The worker stopped early because the run was cancelled.
    pub cancelled: bool,
}

/// Migrates one contiguous range: a single bounded query, rows converted in
/// source order and flushed in batches of at most `batch_size`.
pub struct MigrationWorker {
    id: usize,
    range: WorkRange,
    batch_size: usize,
    ctx: WorkerContext,
    writer: BatchWriter,
}

impl MigrationWorker {
    pub fn new(id: usize, range: WorkRange, batch_size: usize, ctx: WorkerContext) -> Self {
        let writer = BatchWriter::new(ctx.destination.clone(), id);
        Self {
            id,
            range,
            batch_size: batch_size.max(1),
            ctx,
            writer,
        }
    }

    pub async fn run(self) -> Result<WorkerReport, WorkerError> {
        let mut report = WorkerReport {
            worker_id: self.id,
            range: self.range,
            docs_written: 0,
            batches: 0,
            cancelled: false,
        };

        if self.range.is_empty() {
            debug!(worker_id = self.id, range = %self.range, "Empty range, nothing to do");
            return Ok(report);
        }

        info!(
            worker_id = self.id,
            range = %self.range,
            batch_size = self.batch_size,
            "Worker started"
        );

        let cancel = self.ctx.cancel.clone();
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            res = self.ctx.source.fetch_range(self.range) => Some(res),
        };
        let mut cursor = match fetched {
            Some(res) => res.map_err(|source| WorkerError::Query {
                worker_id: self.id,
                range: self.range,
                source,
            })?,
            None => {
                report.cancelled = true;
                return Ok(report);
            }
        };

        let columns = cursor
            .columns()
            .map_err(|source| WorkerError::Columns {
                worker_id: self.id,
                source,
            })?
            .len();
        self.ctx
            .builder
            .check_columns(columns)
            .map_err(|source| WorkerError::Mapping {
                worker_id: self.id,
                source,
            })?;

        let mut batch: Vec<Document> = Vec::with_capacity(self.batch_size);
        let mut record = self.range.start;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                row = cursor.next_row() => Some(row),
            };
            let row = match next {
                Some(row) => row.map_err(|source| WorkerError::Scan {
                    worker_id: self.id,
                    record,
                    source,
                })?,
                None => {
                    report.cancelled = true;
                    break;
                }
            };
            let Some(row) = row else {
                break;
            };

            let doc = self
                .ctx
                .builder
                .build(&row)
                .map_err(|source| WorkerError::Mapping {
                    worker_id: self.id,
                    source,
                })?;
            batch.push(doc);
            record += 1;

            if batch.len() >= self.batch_size {
                self.flush(&mut batch, &mut report).await?;
                if cancel.is_cancelled() {
                    report.cancelled = true;
                    break;
                }
            }
        }

        if report.cancelled {
            debug!(
                worker_id = self.id,
                discarded = batch.len(),
                "Worker cancelled, dropping unflushed documents"
            );
        } else {
            self.flush(&mut batch, &mut report).await?;
        }

        info!(
            worker_id = self.id,
            docs = report.docs_written,
            batches = report.batches,
            cancelled = report.cancelled,
            "Worker finished"
        );
        Ok(report)
    }

    async fn flush(
        &self,
        batch: &mut Vec<Document>,
        report: &mut WorkerReport,
    ) -> Result<(), WorkerError> {
        if batch.is_empty() {
            return Ok(());
        }

        let result = self
            .writer
            .write_batch(batch)
            .await
            .map_err(|source| WorkerError::Insert {
                worker_id: self.id,
                docs: batch.len(),
                source,
            })?;

        report.docs_written += result.docs_written as u64;
        report.batches += 1;
        batch.clear();

        // Progress is observational; a closed aggregator must not fail the run.
        let _ = self.ctx.progress.send(result.docs_written as u64).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
