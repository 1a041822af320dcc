//! Fulfillment-source classification.

use crate::domain::{FulfillmentSource, ShipmentRecord};

/// Partitions shipments into OEM / 3PL / distributor buckets.
///
/// Checks run in that order, so a record always lands in exactly one bucket.
#[derive(Debug, Clone)]
pub struct FulfillmentClassifier {
    warehouse_id: String,
}

impl FulfillmentClassifier {
    pub fn new(warehouse_id: impl Into<String>) -> Self {
        Self {
            warehouse_id: warehouse_id.into(),
        }
    }

    pub fn classify(&self, record: &ShipmentRecord) -> FulfillmentSource {
        if record.fulfillment_vendor_id == record.product_vendor_id {
            FulfillmentSource::Oem
        } else if record.fulfillment_vendor_id == self.warehouse_id {
            FulfillmentSource::ThirdPartyLogistics
        } else {
            FulfillmentSource::WholesaleDistributor
        }
    }
}
