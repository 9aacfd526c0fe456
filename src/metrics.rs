//! Load and render counters for one site instance.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct LoadMetrics {
    /// Bundle requests issued
    fetches: AtomicUsize,

    /// Bundle requests that failed (status, transport or parse)
    failures: AtomicUsize,

    /// Times a failed load fell back to the default language
    fallbacks: AtomicUsize,

    /// Render passes that had content to bind
    renders: AtomicUsize,
}

impl LoadMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_render(&self) {
        self.renders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let fetches = self.fetches();
        let failures = self.failures();
        let fetch_success_rate = if fetches > 0 {
            ((fetches - failures) as f64 / fetches as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            fetches,
            failures,
            fallbacks: self.fallbacks(),
            renders: self.renders(),
            fetch_success_rate,
        }
    }
}

/// Snapshot of the counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub fetches: usize,
    pub failures: usize,
    pub fallbacks: usize,
    pub renders: usize,
    /// Percentage of fetches that succeeded (0-100)
    pub fetch_success_rate: f64,
}

impl MetricsReport {
    /// One-line summary for logs.
    pub fn format(&self) -> String {
        format!(
            "fetches={} failures={} fallbacks={} renders={} success_rate={:.1}%",
            self.fetches, self.failures, self.fallbacks, self.renders, self.fetch_success_rate
        )
    }
}
