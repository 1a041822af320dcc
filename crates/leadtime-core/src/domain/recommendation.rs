//! Recommendation rows emitted by the engine.

use serde::{Deserialize, Serialize};

use super::shipment::ShipmentRecord;

/// Which branch of the engine produced a recommendation.
///
/// Declaration order is the precedence used when two branches recommend
/// values for the same variant: earlier variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// Fixed per-vendor/brand lead times for made-to-order products.
    MadeToOrder,
    /// Currently stocked at the third-party-logistics warehouse.
    InStockAtWarehouse,
    /// Configured fixed override for a named variant.
    SpecialVariant,
    /// Majority of recent shipments came from the 3PL warehouse.
    ThirdPartyLogisticsStocked,
    /// Vendor known to ship within a day.
    FastVendor,
    /// OEM shipments reached the majority threshold.
    OemAverage,
    /// Distributor shipments reached the majority threshold.
    DistributorAverage,
    /// No source reached the majority threshold.
    BlendedAverage,
    /// Spread between min and max exceeds the drift threshold on a stale setting.
    DriftReview,
}

impl RecommendationSource {
    pub fn name(&self) -> &'static str {
        match self {
            RecommendationSource::MadeToOrder => "made_to_order",
            RecommendationSource::InStockAtWarehouse => "in_stock_at_warehouse",
            RecommendationSource::SpecialVariant => "special_variant",
            RecommendationSource::ThirdPartyLogisticsStocked => "third_party_logistics_stocked",
            RecommendationSource::FastVendor => "fast_vendor",
            RecommendationSource::OemAverage => "oem_average",
            RecommendationSource::DistributorAverage => "distributor_average",
            RecommendationSource::BlendedAverage => "blended_average",
            RecommendationSource::DriftReview => "drift_review",
        }
    }
}

impl std::fmt::Display for RecommendationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Recommended minimum lead times for one variant.
///
/// # Invariants
///
/// `new_out_of_stock_min_days >= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadTimeRecommendation {
    pub variant_id: String,
    pub new_in_stock_min_days: i32,
    pub new_out_of_stock_min_days: i32,
    pub source: RecommendationSource,
    pub needs_review: bool,
}

/// A shipment rejected before aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityException {
    pub record: ShipmentRecord,
    pub reason: String,
}

/// Every record rejected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub exceptions: Vec<DataQualityException>,
}

impl DataQualityReport {
    pub fn is_empty(&self) -> bool {
        self.exceptions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exceptions.len()
    }
}
