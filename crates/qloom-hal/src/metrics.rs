//! Per-backend execution metrics.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of a backend's execution counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    /// Total number of `run_once` invocations.
    pub total_executions: u64,
    /// Invocations that returned an outcome.
    pub successful_runs: u64,
    /// Invocations that returned an error.
    pub failed_runs: u64,
    /// Accumulated wall time across all invocations.
    pub total_time: Duration,
    /// `total_time / total_executions`, zero when nothing ran yet.
    pub average_time: Duration,
    /// Message of the most recent error, empty after a success.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_error: String,
    /// Wall-clock time of the most recent invocation.
    pub last_run_time: Option<DateTime<Utc>>,
}

/// Thread-safe counters a backend updates on every run.
///
/// Counters are atomics so concurrent shots never contend; the derived
/// average is computed on read.
#[derive(Debug, Default)]
pub struct RunnerMetrics {
    total_executions: AtomicU64,
    successful_runs: AtomicU64,
    failed_runs: AtomicU64,
    total_time_ns: AtomicU64,
    last_error: Mutex<String>,
    last_run_time: Mutex<Option<DateTime<Utc>>>,
}

impl RunnerMetrics {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a run.
    pub fn begin(&self) {
        self.total_executions.fetch_add(1, Ordering::Relaxed);
        *self
            .last_run_time
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(Utc::now());
    }

    /// Record a successful run.
    pub fn success(&self, elapsed: Duration) {
        self.successful_runs.fetch_add(1, Ordering::Relaxed);
        self.total_time_ns
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
        self.last_error
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }

    /// Record a failed run.
    pub fn failure(&self, elapsed: Duration, error: &str) {
        self.failed_runs.fetch_add(1, Ordering::Relaxed);
        self.total_time_ns
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
        *self
            .last_error
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = error.to_string();
    }

    /// Current snapshot; the average is derived without locking the counters.
    pub fn snapshot(&self) -> ExecutionMetrics {
        let total_executions = self.total_executions.load(Ordering::Relaxed);
        let total_time = Duration::from_nanos(self.total_time_ns.load(Ordering::Relaxed));
        let average_time = if total_executions > 0 {
            total_time / total_executions as u32
        } else {
            Duration::ZERO
        };

        ExecutionMetrics {
            total_executions,
            successful_runs: self.successful_runs.load(Ordering::Relaxed),
            failed_runs: self.failed_runs.load(Ordering::Relaxed),
            total_time,
            average_time,
            last_error: self
                .last_error
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone(),
            last_run_time: *self
                .last_run_time
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        }
    }

    /// Zero every counter.
    pub fn reset(&self) {
        self.total_executions.store(0, Ordering::Relaxed);
        self.successful_runs.store(0, Ordering::Relaxed);
        self.failed_runs.store(0, Ordering::Relaxed);
        self.total_time_ns.store(0, Ordering::Relaxed);
        self.last_error
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
        *self
            .last_run_time
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_average() {
        let metrics = RunnerMetrics::new();
        metrics.begin();
        metrics.success(Duration::from_millis(10));
        metrics.begin();
        metrics.failure(Duration::from_millis(30), "boom");

        let snap = metrics.snapshot();
        assert_eq!(snap.total_executions, 2);
        assert_eq!(snap.successful_runs, 1);
        assert_eq!(snap.failed_runs, 1);
        assert_eq!(snap.total_time, Duration::from_millis(40));
        assert_eq!(snap.average_time, Duration::from_millis(20));
        assert_eq!(snap.last_error, "boom");
        assert!(snap.last_run_time.is_some());
    }

    #[test]
    fn test_success_clears_last_error() {
        let metrics = RunnerMetrics::new();
        metrics.begin();
        metrics.failure(Duration::ZERO, "boom");
        metrics.begin();
        metrics.success(Duration::ZERO);
        assert!(metrics.snapshot().last_error.is_empty());
    }

    #[test]
    fn test_reset() {
        let metrics = RunnerMetrics::new();
        metrics.begin();
        metrics.success(Duration::from_millis(5));
        metrics.reset();

        let snap = metrics.snapshot();
        assert_eq!(snap, ExecutionMetrics::default());
        assert_eq!(snap.average_time, Duration::ZERO);
    }
}
