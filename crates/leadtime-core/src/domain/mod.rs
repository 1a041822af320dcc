//! Domain models for lead-time derivation.
//!
//! Canonical definitions for the core entities:
//! - `ShipmentRecord`: a historical shipped purchase-order line
//! - `VariantLeadTimeSetting`: the lead times currently stored for a variant
//! - `WarehouseStock`: on-hand quantity per warehouse
//! - `LeadTimeRecommendation`: the engine's output row

pub mod error;
pub mod recommendation;
pub mod setting;
pub mod shipment;

// Re-export main types and errors
pub use error::{LeadTimeError, Result};
pub use recommendation::{
    DataQualityException, DataQualityReport, LeadTimeRecommendation, RecommendationSource,
};
pub use setting::{InventoryBehavior, VariantLeadTimeSetting, WarehouseStock};
pub use shipment::{FulfillmentSource, ShipmentRecord};
