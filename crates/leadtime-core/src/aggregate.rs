//! Windowed per-variant shipment statistics.
//!
//! Shipments inside the trailing window are de-duplicated, screened for
//! data-quality violations, classified, and folded into one
//! [`VariantStats`] per variant.

use std::collections::{BTreeMap, HashSet};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::business_days::business_days_between;
use crate::classifier::FulfillmentClassifier;
use crate::domain::{DataQualityException, DataQualityReport, FulfillmentSource, ShipmentRecord};
use crate::metrics::METRICS;
use crate::obs;

/// Trailing date window `(as_of - days, as_of]`, matched against ship dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentWindow {
    /// Exclusive lower bound.
    pub after: NaiveDate,
    /// Inclusive upper bound.
    pub through: NaiveDate,
}

impl ShipmentWindow {
    pub fn trailing(as_of: NaiveDate, days: u32) -> Self {
        let after = as_of
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            after,
            through: as_of,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.after && date <= self.through
    }
}

/// Count and summed business days for one fulfillment bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketStats {
    pub count: usize,
    pub total_business_days: u64,
}

impl BucketStats {
    fn record(&mut self, business_days: u32) {
        self.count += 1;
        self.total_business_days += u64::from(business_days);
    }

    /// Average business days to ship; `None` for an empty bucket.
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.total_business_days as f64 / self.count as f64)
        }
    }
}

/// Windowed shipment statistics for one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantStats {
    pub variant_id: String,
    pub product_vendor_id: String,
    pub oem: BucketStats,
    pub third_party_logistics: BucketStats,
    pub distributor: BucketStats,
}

impl VariantStats {
    pub fn new(variant_id: impl Into<String>, product_vendor_id: impl Into<String>) -> Self {
        Self {
            variant_id: variant_id.into(),
            product_vendor_id: product_vendor_id.into(),
            oem: BucketStats::default(),
            third_party_logistics: BucketStats::default(),
            distributor: BucketStats::default(),
        }
    }

    pub fn bucket(&self, source: FulfillmentSource) -> &BucketStats {
        match source {
            FulfillmentSource::Oem => &self.oem,
            FulfillmentSource::ThirdPartyLogistics => &self.third_party_logistics,
            FulfillmentSource::WholesaleDistributor => &self.distributor,
        }
    }

    fn bucket_mut(&mut self, source: FulfillmentSource) -> &mut BucketStats {
        match source {
            FulfillmentSource::Oem => &mut self.oem,
            FulfillmentSource::ThirdPartyLogistics => &mut self.third_party_logistics,
            FulfillmentSource::WholesaleDistributor => &mut self.distributor,
        }
    }

    /// Record one shipment taking `business_days` in `source`.
    pub fn record(&mut self, source: FulfillmentSource, business_days: u32) {
        self.bucket_mut(source).record(business_days);
    }

    pub fn total_count(&self) -> usize {
        FulfillmentSource::ALL
            .iter()
            .map(|s| self.bucket(*s).count)
            .sum()
    }

    /// Average across every bucket, weighted by shipment count.
    pub fn blended_average(&self) -> Option<f64> {
        let total = self.total_count();
        if total == 0 {
            return None;
        }
        let days: u64 = FulfillmentSource::ALL
            .iter()
            .map(|s| self.bucket(*s).total_business_days)
            .sum();
        Some(days as f64 / total as f64)
    }
}

/// Output of [`aggregate_shipments`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Keyed by variant id, sorted for deterministic output.
    pub variants: BTreeMap<String, VariantStats>,
    pub data_quality: DataQualityReport,
    pub duplicates_skipped: usize,
}

/// Fold the shipments inside `window` into per-variant statistics.
///
/// Duplicate lines (same variant, order, fulfillment vendor, and dates)
/// count once. Records shipping before their purchase order are excluded
/// and reported.
pub fn aggregate_shipments(
    records: &[ShipmentRecord],
    window: &ShipmentWindow,
    classifier: &FulfillmentClassifier,
) -> Aggregation {
    let mut aggregation = Aggregation::default();
    let mut seen = HashSet::new();

    for record in records.iter().filter(|r| window.contains(r.ship_date)) {
        let key = (
            record.variant_id.as_str(),
            record.order_id.as_str(),
            record.fulfillment_vendor_id.as_str(),
            record.purchase_order_date,
            record.ship_date,
        );
        if !seen.insert(key) {
            aggregation.duplicates_skipped += 1;
            continue;
        }

        let business_days =
            match business_days_between(record.purchase_order_date, record.ship_date) {
                Ok(days) => days,
                Err(err) => {
                    obs::emit_record_rejected(&record.variant_id, &record.order_id, &err);
                    METRICS.inc_records_rejected();
                    aggregation.data_quality.exceptions.push(DataQualityException {
                        record: record.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

        let source = classifier.classify(record);
        aggregation
            .variants
            .entry(record.variant_id.clone())
            .or_insert_with(|| {
                VariantStats::new(record.variant_id.clone(), record.product_vendor_id.clone())
            })
            .record(source, business_days);
    }

    tracing::debug!(
        variants = aggregation.variants.len(),
        rejected = aggregation.data_quality.len(),
        duplicates = aggregation.duplicates_skipped,
        "shipments aggregated"
    );
    aggregation
}
