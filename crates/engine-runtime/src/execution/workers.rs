use crate::error::MigrationError;
use engine_processing::{
    error::WorkerError,
    worker::{MigrationWorker, WorkerContext, WorkerReport},
};
use model::pagination::range::WorkRange;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub type WorkerSet = JoinSet<Result<WorkerReport, WorkerError>>;

/// Totals collected from every worker of a run.
#[derive(Debug, Default)]
pub struct WorkerOutcome {
    pub reports: Vec<WorkerReport>,
    /// First failure in completion order.
    pub first_error: Option<MigrationError>,
}

impl WorkerOutcome {
    pub fn docs_written(&self) -> u64 {
        self.reports.iter().map(|r| r.docs_written).sum()
    }

    pub fn batches(&self) -> u64 {
        self.reports.iter().map(|r| r.batches).sum()
    }
}

/// One worker per range; worker ids are 1-based.
pub fn spawn(
    ranges: &[WorkRange],
    batch_size_for: impl Fn(usize) -> usize,
    ctx: &WorkerContext,
) -> WorkerSet {
    info!("Launching {} workers", ranges.len());

    let mut set = JoinSet::new();
    for (idx, range) in ranges.iter().enumerate() {
        let id = idx + 1;
        let worker = MigrationWorker::new(id, *range, batch_size_for(id), ctx.clone());
        set.spawn(worker.run());
    }
    set
}

/// Waits for every worker. The first failure cancels the siblings through
/// `run_token`; they finish their current flush and stop.
pub async fn join_all(
    mut set: WorkerSet,
    run_token: &CancellationToken,
) -> WorkerOutcome {
    let mut outcome = WorkerOutcome::default();

    while let Some(joined) = set.join_next().await {
        let failure = match joined {
            Ok(Ok(report)) => {
                outcome.reports.push(report);
                continue;
            }
            Ok(Err(err)) => {
                error!(
                    worker_id = err.worker_id(),
                    operation = err.operation(),
                    "Worker failed: {err}"
                );
                MigrationError::Worker(err)
            }
            Err(join_err) => {
                error!("Worker task aborted: {join_err}");
                MigrationError::TaskJoin(join_err)
            }
        };

        if outcome.first_error.is_none() {
            if !set.is_empty() {
                warn!("Cancelling {} remaining workers", set.len());
            }
            run_token.cancel();
            outcome.first_error = Some(failure);
        }
    }

    outcome
}
