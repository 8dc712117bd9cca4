//! Capture counters
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Registry of operational counters shared by the server and the writer.
///
/// All counters use `Relaxed` atomics; values are exact once all
/// writers have finished but may lag while requests are in flight.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Requests accepted by the capture route
    requests_received: AtomicU64,
    /// Records fully appended to a log file
    records_written: AtomicU64,
    /// Record bytes appended to log files
    bytes_written: AtomicU64,
    /// Times the writer opened a new target file
    rotations: AtomicU64,
    /// Appends that failed and were dropped
    append_failures: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment requests received
    pub fn increment_requests(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one successful append of `bytes` bytes
    pub fn record_append(&self, bytes: u64) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Increment rotations
    pub fn increment_rotations(&self) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment failed appends
    pub fn increment_append_failures(&self) {
        self.append_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            append_failures: self.append_failures.load(Ordering::Relaxed),
        }
    }

    /// Current snapshot as a JSON object string
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests_received: u64,
    pub records_written: u64,
    pub bytes_written: u64,
    pub rotations: u64,
    pub append_failures: u64,
}
