//! CSV snapshot loading.
//!
//! Expected headers:
//! - shipments: `variant_id, order_id, fulfillment_vendor_id, product_vendor_id,
//!   purchase_order_date, ship_date`
//! - settings: `variant_id, vendor_id, brand, in_stock_min_days, in_stock_max_days,
//!   out_of_stock_min_days, out_of_stock_max_days, inventory_behavior,
//!   modified_date, made_to_order`
//! - stock: `variant_id, warehouse_id, quantity_on_hand`
//!
//! Dates are ISO `YYYY-MM-DD`.

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::domain::{
    LeadTimeError, Result, ShipmentRecord, VariantLeadTimeSetting, WarehouseStock,
};

/// Deserialize every row of a headed CSV document.
pub fn load_records<T, R>(reader: R) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        let record: T = result.map_err(|source| LeadTimeError::CsvRecord {
            line: source.position().map(|p| p.line()).unwrap_or(0),
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = std::fs::File::open(path)?;
    let records = load_records(file)?;
    tracing::debug!(path = %path.display(), rows = records.len(), "csv loaded");
    Ok(records)
}

pub fn load_shipments<R: Read>(reader: R) -> Result<Vec<ShipmentRecord>> {
    load_records(reader)
}

pub fn load_shipments_file(path: &Path) -> Result<Vec<ShipmentRecord>> {
    load_file(path)
}

pub fn load_settings<R: Read>(reader: R) -> Result<Vec<VariantLeadTimeSetting>> {
    load_records(reader)
}

pub fn load_settings_file(path: &Path) -> Result<Vec<VariantLeadTimeSetting>> {
    load_file(path)
}

pub fn load_stock<R: Read>(reader: R) -> Result<Vec<WarehouseStock>> {
    load_records(reader)
}

pub fn load_stock_file(path: &Path) -> Result<Vec<WarehouseStock>> {
    load_file(path)
}
