use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct Metrics {
    // Counters
    uploads_accepted: AtomicUsize,
    uploads_rejected: AtomicUsize,
    extractions_succeeded: AtomicUsize,
    extractions_failed: AtomicUsize,
    clears: AtomicUsize,

    // Timing (in microseconds)
    total_extract_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            uploads_accepted: AtomicUsize::new(0),
            uploads_rejected: AtomicUsize::new(0),
            extractions_succeeded: AtomicUsize::new(0),
            extractions_failed: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
            total_extract_time_us: AtomicU64::new(0),
        })
    }

    pub fn record_upload(&self, accepted: bool) {
        if accepted {
            self.uploads_accepted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.uploads_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_extract(&self, duration: Duration, success: bool) {
        self.total_extract_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        if success {
            self.extractions_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.extractions_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, active_sessions: usize) -> MetricsSnapshot {
        let succeeded = self.extractions_succeeded.load(Ordering::Relaxed);
        let failed = self.extractions_failed.load(Ordering::Relaxed);
        let total = succeeded + failed;
        let avg_extract_time_ms = if total > 0 {
            self.total_extract_time_us.load(Ordering::Relaxed) as f64 / total as f64 / 1000.0
        } else {
            0.0
        };

        MetricsSnapshot {
            uploads_accepted: self.uploads_accepted.load(Ordering::Relaxed),
            uploads_rejected: self.uploads_rejected.load(Ordering::Relaxed),
            extractions_succeeded: succeeded,
            extractions_failed: failed,
            clears: self.clears.load(Ordering::Relaxed),
            avg_extract_time_ms,
            active_sessions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub uploads_accepted: usize,
    pub uploads_rejected: usize,
    pub extractions_succeeded: usize,
    pub extractions_failed: usize,
    pub clears: usize,
    pub avg_extract_time_ms: f64,
    pub active_sessions: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
