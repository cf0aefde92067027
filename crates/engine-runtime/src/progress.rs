use engine_core::progress::{ProgressReport, ProgressTracker};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::info;

/// Receives human-readable progress. Must not block.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, report: &ProgressReport);
}

/// Writes status lines through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, report: &ProgressReport) {
        info!("{report}");
    }
}

/// Consumes flush counts until every sender is gone, then emits the final
/// summary. Resolves to the total it observed.
pub fn spawn_aggregator(
    mut rx: mpsc::Receiver<u64>,
    total: u64,
    threshold: u64,
    sink: Arc<dyn ProgressSink>,
) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut tracker = ProgressTracker::new(total, threshold);
        while let Some(unit) = rx.recv().await {
            if let Some(report) = tracker.record(unit) {
                sink.emit(&report);
            }
        }
        sink.emit(&tracker.finish());
        tracker.done()
    })
}
