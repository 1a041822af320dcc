//! Current variant lead-time settings and warehouse stock levels.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// How the storefront treats a variant that is out of stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InventoryBehavior {
    /// Orders carry an estimated ship date; no out-of-stock buffer applies.
    EstimatedShipDate,
    #[default]
    Standard,
}

impl InventoryBehavior {
    /// Parse a warehouse behaviour label. Anything other than the
    /// estimated-ship-date mode is treated as `Standard`.
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match normalized.as_str() {
            "estimated_ship_date" | "esd" => InventoryBehavior::EstimatedShipDate,
            _ => InventoryBehavior::Standard,
        }
    }
}

impl<'de> Deserialize<'de> for InventoryBehavior {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(InventoryBehavior::from_label(&label))
    }
}

/// The lead-time setting currently stored for a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantLeadTimeSetting {
    pub variant_id: String,
    /// Primary vendor of the product.
    pub vendor_id: String,
    #[serde(default)]
    pub brand: String,
    pub in_stock_min_days: i32,
    pub in_stock_max_days: i32,
    pub out_of_stock_min_days: i32,
    pub out_of_stock_max_days: i32,
    #[serde(default)]
    pub inventory_behavior: InventoryBehavior,
    pub modified_date: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_bool")]
    pub made_to_order: bool,
}

impl VariantLeadTimeSetting {
    /// Largest spread between max and min across both lead-time pairs.
    pub fn spread_days(&self) -> i32 {
        let in_stock = self.in_stock_max_days - self.in_stock_min_days;
        let out_of_stock = self.out_of_stock_max_days - self.out_of_stock_min_days;
        in_stock.max(out_of_stock)
    }
}

/// On-hand quantity of a variant at one warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseStock {
    pub variant_id: String,
    pub warehouse_id: String,
    pub quantity_on_hand: i64,
}

/// Flexible bool deserializer: handles "true"/"false", "1"/"0", "yes"/"no".
fn deserialize_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected bool value, got '{}'",
            other
        ))),
    }
}
