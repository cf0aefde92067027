use crate::{
    error::MigrationError,
    execution::{summary::MigrationSummary, workers},
    progress::{ProgressSink, TracingSink, spawn_aggregator},
};
use connectors::{destination::DocumentDestination, error::DbError, source::RecordSource};
use engine_core::{
    batch_size::{MemoryProbe, SysinfoProbe, batch_size_for},
    indexes::document_indexes,
    partition::split_work,
    progress::ProgressStage,
};
use engine_processing::{transform::mapping::DocumentBuilder, worker::WorkerContext};
use model::transform::mapping::FieldMapping;
use std::{
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How long each side gets to answer the connection check.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Knobs of a run, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOptions {
    pub num_workers: usize,
    /// Ceiling for the memory-derived batch size.
    pub max_batch_size: usize,
    pub report_threshold: u64,
    /// Upper bound on counted records; `None` migrates everything.
    pub record_cap: Option<u64>,
    pub estimated_doc_size: u64,
}

/// Drives one migration: check both connections, reset the collection,
/// count, split the work, run the workers, then build indexes if and only if
/// every worker succeeded.
pub struct MigrationOrchestrator {
    source: Arc<dyn RecordSource>,
    destination: Arc<dyn DocumentDestination>,
    mapping: Arc<FieldMapping>,
    options: MigrationOptions,
    probe: Arc<dyn MemoryProbe>,
    sink: Arc<dyn ProgressSink>,
    stage: watch::Sender<ProgressStage>,
}

impl MigrationOrchestrator {
    pub fn new(
        source: Arc<dyn RecordSource>,
        destination: Arc<dyn DocumentDestination>,
        mapping: Arc<FieldMapping>,
        options: MigrationOptions,
    ) -> Self {
        let (stage, _) = watch::channel(ProgressStage::Idle);
        Self {
            source,
            destination,
            mapping,
            options,
            probe: Arc::new(SysinfoProbe),
            sink: Arc::new(TracingSink),
            stage,
        }
    }

    pub fn with_memory_probe(mut self, probe: Arc<dyn MemoryProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Follows the stage machine of the run.
    pub fn subscribe(&self) -> watch::Receiver<ProgressStage> {
        self.stage.subscribe()
    }

    /// Runs the migration. Cancelling `cancel` aborts the connection checks,
    /// reset and count immediately and stops workers after their current flush; the run then
    /// ends with [`MigrationError::Cancelled`] and no indexes are built.
    pub async fn run(&self, cancel: CancellationToken) -> Result<MigrationSummary, MigrationError> {
        let result = self.execute(&cancel).await;
        match &result {
            Ok(summary) => {
                self.set_stage(ProgressStage::Done);
                info!(
                    "Migration finished: {} of {} records in {:.1}s ({:.0} records/s)",
                    summary.docs_written,
                    summary.total_records,
                    summary.elapsed_secs,
                    summary.throughput
                );
            }
            Err(err) => {
                self.set_stage(ProgressStage::Failed);
                warn!(phase = err.phase(), "Migration failed: {err}");
            }
        }
        result
    }

    async fn execute(&self, cancel: &CancellationToken) -> Result<MigrationSummary, MigrationError> {
        let started = Instant::now();

        self.set_stage(ProgressStage::Connecting);
        check_connection(cancel, "source", self.source.check_connection()).await?;
        check_connection(cancel, "destination", self.destination.check_connection()).await?;

        self.set_stage(ProgressStage::Resetting);
        until_cancelled(cancel, self.destination.drop_collection())
            .await?
            .map_err(MigrationError::Reset)?;

        self.set_stage(ProgressStage::Counting);
        let total = until_cancelled(cancel, self.source.count_records(self.options.record_cap))
            .await?
            .map_err(MigrationError::Count)?;
        info!("Source records to migrate: {total}");

        self.set_stage(ProgressStage::Running);
        let workers = self.options.num_workers.max(1);
        let ranges = split_work(total, workers);
        for (idx, range) in ranges.iter().enumerate() {
            info!(worker_id = idx + 1, "Assigned range {range} ({} records)", range.len());
        }

        let run_token = cancel.child_token();
        let (progress_tx, progress_rx) = mpsc::channel(workers * 4);
        let aggregator = spawn_aggregator(
            progress_rx,
            total,
            self.options.report_threshold,
            self.sink.clone(),
        );

        let ctx = WorkerContext {
            source: self.source.clone(),
            destination: self.destination.clone(),
            builder: Arc::new(DocumentBuilder::new(self.mapping.clone())),
            progress: progress_tx,
            cancel: run_token.clone(),
        };

        // One memory sample per worker.
        let sizes: Vec<usize> = (1..=ranges.len())
            .map(|worker_id| {
                let size = batch_size_for(
                    self.probe.as_ref(),
                    self.options.max_batch_size,
                    self.options.estimated_doc_size,
                    workers,
                );
                info!(worker_id, batch_size = size, "Batch size computed");
                size
            })
            .collect();
        let batch_size = sizes.iter().copied().min().unwrap_or(1);
        let set = workers::spawn(&ranges, |id| sizes[id - 1], &ctx);
        // Only the workers hold progress senders now, so the aggregator ends
        // with the last of them.
        drop(ctx);

        self.set_stage(ProgressStage::Awaiting);
        let outcome = workers::join_all(set, &run_token).await;
        let observed = aggregator.await.unwrap_or_else(|e| {
            warn!("Progress aggregator stopped abnormally: {e}");
            outcome.docs_written()
        });

        let docs_written = outcome.docs_written();
        let batches = outcome.batches();
        if let Some(err) = outcome.first_error {
            return Err(err);
        }
        if cancel.is_cancelled() {
            info!("Migration cancelled after writing {observed} documents");
            return Err(MigrationError::Cancelled);
        }

        if docs_written != total {
            warn!("Counted {total} records but wrote {docs_written} documents");
        }

        self.set_stage(ProgressStage::Indexing);
        let indexes = document_indexes();
        info!("Creating {} indexes", indexes.len());
        self.destination
            .create_indexes(&indexes)
            .await
            .map_err(MigrationError::Index)?;

        let elapsed = started.elapsed();
        let secs = elapsed.as_secs_f64();
        Ok(MigrationSummary {
            total_records: total,
            docs_written,
            batches,
            workers,
            batch_size,
            elapsed_secs: secs,
            throughput: if secs > 0.0 {
                docs_written as f64 / secs
            } else {
                0.0
            },
        })
    }

    fn set_stage(&self, stage: ProgressStage) {
        info!("Migration stage: {stage}");
        self.stage.send_replace(stage);
    }
}

/// Races `fut` against the caller's token.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = T>,
) -> Result<T, MigrationError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(MigrationError::Cancelled),
        out = fut => Ok(out),
    }
}

/// Bounds one connection check by [`CONNECT_TIMEOUT`] and the caller's token.
async fn check_connection(
    cancel: &CancellationToken,
    side: &'static str,
    check: impl Future<Output = Result<(), DbError>>,
) -> Result<(), MigrationError> {
    until_cancelled(cancel, tokio::time::timeout(CONNECT_TIMEOUT, check))
        .await?
        .unwrap_or(Err(DbError::Timeout(CONNECT_TIMEOUT)))
        .map_err(|source| {
            warn!("Connection check for the {side} failed: {source}");
            MigrationError::Connect { side, source }
        })
}
