//! Lock-free counters for a sweep

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Shared run counters, updated from concurrently polled checks
#[derive(Debug, Default)]
pub struct PerformanceMetrics {
    candidates_checked: AtomicU64,
    available_found: AtomicU64,
    errors_encountered: AtomicU64,
    log_failures: AtomicU64,
    total_check_time_ms: AtomicU64,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_checked(&self) {
        self.candidates_checked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_available(&self) {
        self.available_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.errors_encountered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_log_failures(&self) {
        self.log_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_check_time(&self, duration: Duration) {
        self.total_check_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Get a point-in-time copy of all counters
    pub fn get_stats(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            candidates_checked: self.candidates_checked.load(Ordering::Relaxed),
            available_found: self.available_found.load(Ordering::Relaxed),
            errors_encountered: self.errors_encountered.load(Ordering::Relaxed),
            log_failures: self.log_failures.load(Ordering::Relaxed),
            total_check_time_ms: self.total_check_time_ms.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub candidates_checked: u64,
    pub available_found: u64,
    pub errors_encountered: u64,
    pub log_failures: u64,
    pub total_check_time_ms: u64,
}

impl MetricsSnapshot {
    pub fn avg_check_time_ms(&self) -> f64 {
        if self.candidates_checked == 0 {
            0.0
        } else {
            self.total_check_time_ms as f64 / self.candidates_checked as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = PerformanceMetrics::new();
        metrics.increment_checked();
        metrics.increment_checked();
        metrics.increment_available();
        metrics.add_check_time(Duration::from_millis(30));
        metrics.add_check_time(Duration::from_millis(10));

        let stats = metrics.get_stats();
        assert_eq!(stats.candidates_checked, 2);
        assert_eq!(stats.available_found, 1);
        assert_eq!(stats.errors_encountered, 0);
        assert_eq!(stats.avg_check_time_ms(), 20.0);
    }

    #[test]
    fn test_empty_average() {
        assert_eq!(MetricsSnapshot::default().avg_check_time_ms(), 0.0);
    }
}
