//! Lead-time deriver core library.
//!
//! Recommends in-stock and out-of-stock minimum lead times (in business days)
//! per product variant from a snapshot of historical shipments, current
//! variant settings, and warehouse stock.

pub mod aggregate;
pub mod business_days;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod engine;
pub mod loader;
pub mod metrics;
pub mod obs;
pub mod performance;
pub mod pipeline;
pub mod reporting;
pub mod rules;
pub mod telemetry;

pub use aggregate::{aggregate_shipments, Aggregation, BucketStats, ShipmentWindow, VariantStats};
pub use business_days::business_days_between;
pub use classifier::FulfillmentClassifier;
pub use config::{
    LeadTimeConfig, MadeToOrderRule, OverrideTables, SpecialVariantOverride, MAX_LEAD_TIME_DAYS,
};
pub use domain::{
    DataQualityException, DataQualityReport, FulfillmentSource, InventoryBehavior,
    LeadTimeError, LeadTimeRecommendation, RecommendationSource, Result, ShipmentRecord,
    VariantLeadTimeSetting, WarehouseStock,
};
pub use engine::{recommend, RecommendationInput, RecommendationRun};
pub use performance::{fulfillment_performance, FulfillmentPerformance, PerformanceReport};
pub use pipeline::{run_recommendations, Snapshot, SnapshotPaths};
pub use reporting::{
    content_digest, read_run_artifact, write_performance, write_recommendations,
    write_run_artifact, OutputFormat, RunArtifact,
};
pub use rules::{computed_base, evaluate_rules, ComputedBase, LeadTimeRule, RuleContext, RuleOutcome};

pub use metrics::METRICS;
pub use obs::RunSpan;
pub use telemetry::init_tracing;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
