//! Global atomic counters for run observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single `tracing::info!`
//! event at the end of a run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Relaxed atomic counters.
pub struct Metrics {
    shipments_read: AtomicU64,
    records_rejected: AtomicU64,
    recommendations_emitted: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            shipments_read: AtomicU64::new(0),
            records_rejected: AtomicU64::new(0),
            recommendations_emitted: AtomicU64::new(0),
        }
    }

    pub fn add_shipments_read(&self, n: u64) {
        self.shipments_read.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "shipments_read", n, "counter incremented");
    }

    pub fn inc_records_rejected(&self) {
        self.records_rejected.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "records_rejected", "counter incremented");
    }

    pub fn add_recommendations(&self, n: u64) {
        self.recommendations_emitted.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "recommendations_emitted", n, "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            shipments_read = self.shipments_read(),
            records_rejected = self.records_rejected(),
            recommendations_emitted = self.recommendations_emitted(),
        );
    }

    pub fn shipments_read(&self) -> u64 {
        self.shipments_read.load(Ordering::Relaxed)
    }

    pub fn records_rejected(&self) -> u64 {
        self.records_rejected.load(Ordering::Relaxed)
    }

    pub fn recommendations_emitted(&self) -> u64 {
        self.recommendations_emitted.load(Ordering::Relaxed)
    }
}
