//! Historical shipment records and their fulfillment source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One shipped purchase-order line for a product variant.
///
/// # Invariants
///
/// `ship_date >= purchase_order_date`. Records violating this are rejected
/// during aggregation and reported as data-quality exceptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub variant_id: String,
    pub order_id: String,
    /// Vendor (or warehouse) that physically fulfilled the shipment.
    pub fulfillment_vendor_id: String,
    /// Primary vendor of the product.
    pub product_vendor_id: String,
    pub purchase_order_date: NaiveDate,
    pub ship_date: NaiveDate,
}

impl ShipmentRecord {
    /// Whether the record respects `ship_date >= purchase_order_date`.
    pub fn has_valid_dates(&self) -> bool {
        self.ship_date >= self.purchase_order_date
    }
}

/// Which kind of party fulfilled a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentSource {
    /// Shipped by the product's own vendor.
    Oem,
    /// Shipped from the configured third-party-logistics warehouse.
    ThirdPartyLogistics,
    /// Shipped by anyone else.
    WholesaleDistributor,
}

impl FulfillmentSource {
    pub const ALL: [FulfillmentSource; 3] = [
        FulfillmentSource::Oem,
        FulfillmentSource::ThirdPartyLogistics,
        FulfillmentSource::WholesaleDistributor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FulfillmentSource::Oem => "oem",
            FulfillmentSource::ThirdPartyLogistics => "third_party_logistics",
            FulfillmentSource::WholesaleDistributor => "wholesale_distributor",
        }
    }
}

impl std::fmt::Display for FulfillmentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
