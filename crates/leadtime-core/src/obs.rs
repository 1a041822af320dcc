//! Structured observability hooks for the recommendation run lifecycle.
//!
//! Events are emitted through `tracing`; filter with `RUST_LOG` and switch to
//! JSON lines with the CLI's `--json` flag.

use tracing::{debug, info, warn};

use crate::domain::LeadTimeRecommendation;

/// RAII guard that enters a run-scoped tracing span for the duration of a run.
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    /// Create and enter a span tagged with the run id.
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("leadtime.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: run started over a snapshot of the given size.
pub fn emit_run_started(run_id: &str, as_of: &str, shipments: usize, settings: usize) {
    info!(
        event = "run.started",
        run_id = %run_id,
        as_of = %as_of,
        shipments = shipments,
        settings = settings,
    );
}

/// Emit event: run finished.
pub fn emit_run_finished(run_id: &str, duration_ms: u64, recommendations: usize, rejected: usize) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        recommendations = recommendations,
        rejected = rejected,
    );
}

/// Emit event: a shipment was excluded as a data-quality exception.
pub fn emit_record_rejected(variant_id: &str, order_id: &str, error: &dyn std::fmt::Display) {
    warn!(
        event = "data_quality.rejected",
        variant_id = %variant_id,
        order_id = %order_id,
        error = %error,
    );
}

/// Emit event: one recommendation row selected.
pub fn emit_recommendation(row: &LeadTimeRecommendation) {
    debug!(
        event = "recommendation.emitted",
        variant_id = %row.variant_id,
        in_stock = row.new_in_stock_min_days,
        out_of_stock = row.new_out_of_stock_min_days,
        source = %row.source,
        needs_review = row.needs_review,
    );
}
