//! Immutable run configuration.
//!
//! Every threshold the engine consults lives in [`LeadTimeConfig`], which is
//! built once (defaults, optionally overlaid by a TOML file), validated, and
//! then passed by reference into each computation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{LeadTimeError, Result};

/// Upper bound for every configured day count.
pub const MAX_LEAD_TIME_DAYS: i32 = 365;

/// Fixed lead times for one named variant.
///
/// Applied by the rule table, so only variants that reach the computed
/// branch (at least `minimum_orders_threshold` windowed shipments) get a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialVariantOverride {
    pub variant_id: String,
    pub in_stock_days: i32,
    pub out_of_stock_days: i32,
}

/// Fixed lead times for made-to-order products of a vendor and/or brand.
///
/// A rule with both `vendor_id` and `brand` set only matches settings
/// carrying both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MadeToOrderRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub in_stock_days: i32,
    pub out_of_stock_days: i32,
}

impl MadeToOrderRule {
    pub fn matches(&self, vendor_id: &str, brand: &str) -> bool {
        let vendor_ok = self.vendor_id.as_deref().map_or(true, |v| v == vendor_id);
        let brand_ok = self
            .brand
            .as_deref()
            .map_or(true, |b| b.eq_ignore_ascii_case(brand));
        vendor_ok && brand_ok
    }
}

/// Override tables consulted by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverrideTables {
    /// Vendors known to ship within `fast_vendor_days`.
    pub fast_vendors: Vec<String>,
    pub fast_vendor_days: i32,
    pub special_variants: Vec<SpecialVariantOverride>,
    pub made_to_order: Vec<MadeToOrderRule>,
}

impl Default for OverrideTables {
    fn default() -> Self {
        Self {
            fast_vendors: Vec::new(),
            fast_vendor_days: 1,
            special_variants: Vec::new(),
            made_to_order: Vec::new(),
        }
    }
}

/// Thresholds and identifiers for a lead-time run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LeadTimeConfig {
    /// Share of shipments (percent, 0–100) a source needs to be authoritative.
    pub majority_threshold: f64,
    /// Max − min spread (days) above which a stale setting is flagged.
    pub difference_threshold: i32,
    /// Trailing window (days) for recommendations.
    pub sales_history_window: u32,
    /// Trailing window (days) for the performance report.
    pub performance_window: u32,
    /// Days added to the out-of-stock lead time outside estimated-ship-date mode.
    pub out_of_stock_buffer: i32,
    /// Multiplier applied to average business days before rounding.
    pub business_day_conversion_factor: f64,
    /// Variants with fewer windowed shipments get no computed recommendation.
    pub minimum_orders_threshold: u32,
    /// Settings modified within this many days are not flagged for drift.
    pub modify_date_restriction: u32,
    pub third_party_logistics_warehouse_id: String,
    /// Keep rows whose values equal the current setting.
    pub emit_unchanged: bool,
    pub overrides: OverrideTables,
}

impl Default for LeadTimeConfig {
    fn default() -> Self {
        Self {
            majority_threshold: 60.0,
            difference_threshold: 14,
            sales_history_window: 45,
            performance_window: 30,
            out_of_stock_buffer: 15,
            business_day_conversion_factor: 0.714,
            minimum_orders_threshold: 3,
            modify_date_restriction: 30,
            third_party_logistics_warehouse_id: "3pl-warehouse".to_string(),
            emit_unchanged: false,
            overrides: OverrideTables::default(),
        }
    }
}

impl LeadTimeConfig {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: LeadTimeConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Override the recommendation window.
    pub fn with_sales_history_window(mut self, days: u32) -> Self {
        self.sales_history_window = days;
        self
    }

    /// Override the performance window.
    pub fn with_performance_window(mut self, days: u32) -> Self {
        self.performance_window = days;
        self
    }

    /// Override the 3PL warehouse identifier.
    pub fn with_warehouse_id(mut self, warehouse_id: impl Into<String>) -> Self {
        self.third_party_logistics_warehouse_id = warehouse_id.into();
        self
    }

    /// Whether `count` out of `total` shipments reaches the majority threshold.
    pub fn is_majority(&self, count: usize, total: usize) -> bool {
        if total == 0 {
            return false;
        }
        count as f64 * 100.0 >= self.majority_threshold * total as f64
    }

    /// Reject configurations the engine cannot act on.
    pub fn validate(&self) -> Result<()> {
        if !(self.majority_threshold > 0.0 && self.majority_threshold <= 100.0) {
            return Err(LeadTimeError::InvalidConfig(format!(
                "majority_threshold must be in (0, 100], got {}",
                self.majority_threshold
            )));
        }
        if !(self.business_day_conversion_factor.is_finite()
            && self.business_day_conversion_factor > 0.0)
        {
            return Err(LeadTimeError::InvalidConfig(format!(
                "business_day_conversion_factor must be positive and finite, got {}",
                self.business_day_conversion_factor
            )));
        }
        if self.sales_history_window == 0 || self.performance_window == 0 {
            return Err(LeadTimeError::InvalidConfig(
                "sales_history_window and performance_window must be at least one day".to_string(),
            ));
        }
        check_days("difference_threshold", self.difference_threshold)?;
        check_days("out_of_stock_buffer", self.out_of_stock_buffer)?;
        check_days("overrides.fast_vendor_days", self.overrides.fast_vendor_days)?;
        if self.third_party_logistics_warehouse_id.trim().is_empty() {
            return Err(LeadTimeError::InvalidConfig(
                "third_party_logistics_warehouse_id must not be empty".to_string(),
            ));
        }
        for special in &self.overrides.special_variants {
            check_days("special_variants.in_stock_days", special.in_stock_days)?;
            check_days("special_variants.out_of_stock_days", special.out_of_stock_days)?;
        }
        for rule in &self.overrides.made_to_order {
            if rule.vendor_id.is_none() && rule.brand.is_none() {
                return Err(LeadTimeError::InvalidConfig(
                    "made_to_order rule needs a vendor_id or a brand".to_string(),
                ));
            }
            check_days("made_to_order.in_stock_days", rule.in_stock_days)?;
            check_days("made_to_order.out_of_stock_days", rule.out_of_stock_days)?;
            if rule.out_of_stock_days <= rule.in_stock_days {
                return Err(LeadTimeError::InvalidConfig(format!(
                    "made_to_order out_of_stock_days ({}) must exceed in_stock_days ({})",
                    rule.out_of_stock_days, rule.in_stock_days
                )));
            }
        }
        Ok(())
    }
}

fn check_days(field: &str, days: i32) -> Result<()> {
    if (0..=MAX_LEAD_TIME_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(LeadTimeError::InvalidConfig(format!(
            "{} must be within 0..={} days, got {}",
            field, MAX_LEAD_TIME_DAYS, days
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LeadTimeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sales_history_window, 45);
        assert_eq!(config.performance_window, 30);
        assert_eq!(config.out_of_stock_buffer, 15);
        assert!((config.majority_threshold - 60.0).abs() < f64::EPSILON);
        assert!((config.business_day_conversion_factor - 0.714).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LeadTimeConfig::from_toml_str(
            r#"
            majority_threshold = 75.0
            third_party_logistics_warehouse_id = "wh-9"

            [overrides]
            fast_vendors = ["speedy"]
            "#,
        )
        .unwrap();
        assert!((config.majority_threshold - 75.0).abs() < f64::EPSILON);
        assert_eq!(config.third_party_logistics_warehouse_id, "wh-9");
        assert_eq!(config.overrides.fast_vendors, vec!["speedy".to_string()]);
        assert_eq!(config.overrides.fast_vendor_days, 1);
        assert_eq!(config.sales_history_window, 45);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = LeadTimeConfig::from_toml_str("majority = 50").unwrap_err();
        assert!(matches!(err, LeadTimeError::ConfigParse(_)));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let err = LeadTimeConfig::from_toml_str("majority_threshold = 120.0").unwrap_err();
        assert!(matches!(err, LeadTimeError::InvalidConfig(_)));
    }

    fn assert_invalid(source: &str) {
        let err = LeadTimeConfig::from_toml_str(source).unwrap_err();
        assert!(
            matches!(err, LeadTimeError::InvalidConfig(_)),
            "{source:?} gave {err:?}"
        );
    }

    #[test]
    fn test_non_finite_conversion_factor_rejected() {
        assert_invalid("business_day_conversion_factor = inf");
        assert_invalid("business_day_conversion_factor = nan");
        assert_invalid("business_day_conversion_factor = 0.0");
        assert_invalid("business_day_conversion_factor = -0.5");
    }

    #[test]
    fn test_nan_threshold_rejected() {
        assert_invalid("majority_threshold = nan");
        assert_invalid("majority_threshold = 0.0");
    }

    #[test]
    fn test_zero_windows_rejected() {
        assert_invalid("sales_history_window = 0");
        assert_invalid("performance_window = 0");
    }

    #[test]
    fn test_empty_warehouse_id_rejected() {
        assert_invalid(r#"third_party_logistics_warehouse_id = "  ""#);
    }

    #[test]
    fn test_day_counts_out_of_range_rejected() {
        assert_invalid("out_of_stock_buffer = -1");
        assert_invalid("out_of_stock_buffer = 2147483647");
        assert_invalid("difference_threshold = -3");
        assert_invalid("difference_threshold = 1000");
        assert_invalid("[overrides]\nfast_vendor_days = 400");
        assert_invalid(
            "[[overrides.special_variants]]\nvariant_id = \"v-1\"\nin_stock_days = 0\nout_of_stock_days = 9999",
        );
        assert_invalid(
            "[[overrides.special_variants]]\nvariant_id = \"v-1\"\nin_stock_days = -2\nout_of_stock_days = 5",
        );
        assert_invalid(
            "[[overrides.made_to_order]]\nbrand = \"Oakline\"\nin_stock_days = 20\nout_of_stock_days = 500",
        );
    }

    #[test]
    fn test_day_count_bounds_are_inclusive() {
        let config = LeadTimeConfig::from_toml_str(
            "out_of_stock_buffer = 0\ndifference_threshold = 365\n[overrides]\nfast_vendor_days = 0",
        )
        .unwrap();
        assert_eq!(config.out_of_stock_buffer, 0);
        assert_eq!(config.difference_threshold, MAX_LEAD_TIME_DAYS);
    }

    #[test]
    fn test_made_to_order_rule_needs_larger_out_of_stock() {
        let err = LeadTimeConfig::from_toml_str(
            r#"
            [[overrides.made_to_order]]
            brand = "Oakline"
            in_stock_days = 20
            out_of_stock_days = 20
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("must exceed"));
    }

    #[test]
    fn test_toml_render_parses_back() {
        let mut config = LeadTimeConfig::default();
        config.overrides.special_variants.push(SpecialVariantOverride {
            variant_id: "v-42".to_string(),
            in_stock_days: 3,
            out_of_stock_days: 9,
        });
        let rendered = config.to_toml_string().unwrap();
        let parsed = LeadTimeConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_is_majority() {
        let config = LeadTimeConfig::default();
        assert!(config.is_majority(6, 10));
        assert!(config.is_majority(7, 10));
        assert!(!config.is_majority(5, 10));
        assert!(!config.is_majority(0, 0));
    }

    #[test]
    fn test_made_to_order_rule_matching() {
        let rule = MadeToOrderRule {
            vendor_id: Some("acme".to_string()),
            brand: Some("Oakline".to_string()),
            in_stock_days: 20,
            out_of_stock_days: 35,
        };
        assert!(rule.matches("acme", "oakline"));
        assert!(!rule.matches("acme", "Birch"));
        assert!(!rule.matches("other", "Oakline"));

        let brand_only = MadeToOrderRule {
            vendor_id: None,
            ..rule
        };
        assert!(brand_only.matches("other", "Oakline"));
    }
}
