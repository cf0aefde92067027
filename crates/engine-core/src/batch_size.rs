use sysinfo::{System, get_current_pid};
use tracing::warn;

/// Share of the reserved memory a run is allowed to fill with batches.
const USABLE_MEMORY_RATIO: f64 = 0.7;

/// Runtime memory signal used to bound batch sizes.
pub trait MemoryProbe: Send + Sync {
    /// Bytes currently reserved by the process, if known.
    fn reserved_bytes(&self) -> Option<u64>;
}

/// Reads the resident set size of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoProbe;

impl MemoryProbe for SysinfoProbe {
    fn reserved_bytes(&self) -> Option<u64> {
        let pid = get_current_pid().ok()?;
        let mut system = System::new();
        system.refresh_process(pid);
        system.process(pid).map(|process| process.memory())
    }
}

/// A probe reporting a fixed value.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub Option<u64>);

impl MemoryProbe for FixedProbe {
    fn reserved_bytes(&self) -> Option<u64> {
        self.0
    }
}

/// Derives the per-insert batch size.
///
/// `min(0.7 * reserved / (doc_size * workers), max)`, never below one. When
/// the memory signal is unavailable the configured maximum is used.
pub fn compute_batch_size(
    max: usize,
    reserved_bytes: Option<u64>,
    est_doc_size: u64,
    workers: usize,
) -> usize {
    let max = max.max(1);

    let Some(reserved) = reserved_bytes else {
        warn!("Memory signal unavailable, using configured batch size {max}");
        return max;
    };

    let per_batch = est_doc_size.max(1) as f64 * workers.max(1) as f64;
    let candidate = (reserved as f64 * USABLE_MEMORY_RATIO / per_batch) as usize;

    candidate.clamp(1, max)
}

/// Samples the probe and derives the batch size in one step.
pub fn batch_size_for(
    probe: &dyn MemoryProbe,
    max: usize,
    est_doc_size: u64,
    workers: usize,
) -> usize {
    compute_batch_size(max, probe.reserved_bytes(), est_doc_size, workers)
}
