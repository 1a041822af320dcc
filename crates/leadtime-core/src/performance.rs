//! Descriptive fulfillment performance per variant.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate_shipments, ShipmentWindow, VariantStats};
use crate::classifier::FulfillmentClassifier;
use crate::config::LeadTimeConfig;
use crate::domain::{DataQualityReport, ShipmentRecord};

/// Shipment counts and average business days to ship, per bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentPerformance {
    pub variant_id: String,
    pub oem_count: usize,
    pub oem_avg_business_days: Option<f64>,
    pub third_party_logistics_count: usize,
    pub third_party_logistics_avg_business_days: Option<f64>,
    pub distributor_count: usize,
    pub distributor_avg_business_days: Option<f64>,
    pub total_count: usize,
    pub blended_avg_business_days: Option<f64>,
}

impl From<&VariantStats> for FulfillmentPerformance {
    fn from(stats: &VariantStats) -> Self {
        Self {
            variant_id: stats.variant_id.clone(),
            oem_count: stats.oem.count,
            oem_avg_business_days: stats.oem.average(),
            third_party_logistics_count: stats.third_party_logistics.count,
            third_party_logistics_avg_business_days: stats.third_party_logistics.average(),
            distributor_count: stats.distributor.count,
            distributor_avg_business_days: stats.distributor.average(),
            total_count: stats.total_count(),
            blended_avg_business_days: stats.blended_average(),
        }
    }
}

/// Performance rows for the trailing `performance_window`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub window: ShipmentWindow,
    pub rows: Vec<FulfillmentPerformance>,
    pub data_quality: DataQualityReport,
}

/// Aggregate shipments ending at `as_of` into per-variant performance rows.
pub fn fulfillment_performance(
    config: &LeadTimeConfig,
    shipments: &[ShipmentRecord],
    as_of: NaiveDate,
) -> PerformanceReport {
    let window = ShipmentWindow::trailing(as_of, config.performance_window);
    let classifier = FulfillmentClassifier::new(config.third_party_logistics_warehouse_id.clone());
    let aggregation = aggregate_shipments(shipments, &window, &classifier);

    PerformanceReport {
        window,
        rows: aggregation
            .variants
            .values()
            .map(FulfillmentPerformance::from)
            .collect(),
        data_quality: aggregation.data_quality,
    }
}
