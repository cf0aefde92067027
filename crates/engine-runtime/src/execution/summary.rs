use serde::Serialize;
use std::time::Duration;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationSummary {
    /// Records counted in the source (after the cap).
    pub total_records: u64,
    pub docs_written: u64,
    pub batches: u64,
    pub workers: usize,
    /// Smallest of the per-worker batch sizes. Each worker samples memory on
    /// its own, so the others may have flushed larger batches.
    pub batch_size: usize,
    pub elapsed_secs: f64,
    /// Documents per second over the whole run.
    pub throughput: f64,
}

impl MigrationSummary {
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_secs)
    }
}
