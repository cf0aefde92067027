use serde::Serialize;
use std::{
    fmt,
    time::{Duration, Instant},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressStage {
    Idle,
    Connecting,
    Resetting,
    Counting,
    Running,
    Awaiting,
    Indexing,
    Done,
    Failed,
}

impl ProgressStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStage::Idle => "Idle",
            ProgressStage::Connecting => "Connecting",
            ProgressStage::Resetting => "Resetting",
            ProgressStage::Counting => "Counting",
            ProgressStage::Running => "Running",
            ProgressStage::Awaiting => "Awaiting",
            ProgressStage::Indexing => "Indexing",
            ProgressStage::Done => "Done",
            ProgressStage::Failed => "Failed",
        }
    }
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status line snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub done: u64,
    pub total: u64,
    pub elapsed: Duration,
    /// Records per second since the previous report.
    pub rate: f64,
    /// Projected time to finish at the current rate; `None` when the rate is
    /// zero or the run is complete.
    pub remaining: Option<Duration>,
    pub is_final: bool,
}

impl ProgressReport {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.done as f64 * 100.0 / self.total as f64
        }
    }
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_final {
            return write!(
                f,
                "Finished: {} records in {} ({:.0} records/s)",
                self.done,
                format_duration(self.elapsed),
                self.rate
            );
        }

        write!(
            f,
            "Progress: {}/{} records ({:.1}%) | elapsed {} | {:.0} records/s",
            self.done,
            self.total,
            self.percent(),
            format_duration(self.elapsed),
            self.rate
        )?;
        match self.remaining {
            Some(eta) => write!(f, " | remaining ~{}", format_duration(eta)),
            None => Ok(()),
        }
    }
}

/// Accumulates flush counts and decides when a status line is due.
///
/// A report is produced for the very first flush and then every time the
/// running total crosses the next multiple of `threshold`.
#[derive(Debug)]
pub struct ProgressTracker {
    total: u64,
    threshold: u64,
    done: u64,
    next_report: u64,
    reported_once: bool,
    started: Instant,
    last_report_at: Instant,
    last_report_done: u64,
}

impl ProgressTracker {
    pub fn new(total: u64, threshold: u64) -> Self {
        Self::starting_at(total, threshold, Instant::now())
    }

    pub fn starting_at(total: u64, threshold: u64, started: Instant) -> Self {
        let threshold = threshold.max(1);
        ProgressTracker {
            total,
            threshold,
            done: 0,
            next_report: threshold,
            reported_once: false,
            started,
            last_report_at: started,
            last_report_done: 0,
        }
    }

    pub fn done(&self) -> u64 {
        self.done
    }

    pub fn record(&mut self, count: u64) -> Option<ProgressReport> {
        self.record_at(count, Instant::now())
    }

    pub fn record_at(&mut self, count: u64, now: Instant) -> Option<ProgressReport> {
        self.done += count;

        if self.reported_once && self.done < self.next_report {
            return None;
        }

        self.reported_once = true;
        self.next_report = (self.done / self.threshold + 1) * self.threshold;

        let window = now.saturating_duration_since(self.last_report_at);
        let rate = per_second(self.done - self.last_report_done, window)
            .unwrap_or_else(|| per_second(self.done, self.elapsed(now)).unwrap_or(0.0));
        self.last_report_at = now;
        self.last_report_done = self.done;

        let left = self.total.saturating_sub(self.done);
        let remaining = (rate > 0.0 && left > 0).then(|| Duration::from_secs_f64(left as f64 / rate));

        Some(ProgressReport {
            done: self.done,
            total: self.total,
            elapsed: self.elapsed(now),
            rate,
            remaining,
            is_final: false,
        })
    }

    /// Summary emitted once the progress channel has closed.
    pub fn finish(&self) -> ProgressReport {
        self.finish_at(Instant::now())
    }

    pub fn finish_at(&self, now: Instant) -> ProgressReport {
        let elapsed = self.elapsed(now);
        ProgressReport {
            done: self.done,
            total: self.total,
            elapsed,
            rate: per_second(self.done, elapsed).unwrap_or(0.0),
            remaining: None,
            is_final: true,
        }
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }
}

fn per_second(count: u64, window: Duration) -> Option<f64> {
    let secs = window.as_secs_f64();
    (secs > 0.0).then(|| count as f64 / secs)
}

/// Renders `1h 02m 03s`, `2m 03s` or `3s`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}
