//! Ordered override rule table.
//!
//! Rules are evaluated top-down and the first match wins. Each rule yields
//! the in-stock and out-of-stock lead times together, so the two values can
//! never disagree about which rule produced them.

use serde::{Deserialize, Serialize};

use crate::aggregate::VariantStats;
use crate::config::LeadTimeConfig;
use crate::domain::{InventoryBehavior, RecommendationSource, VariantLeadTimeSetting};

/// Inputs a rule may consult for one variant.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub stats: &'a VariantStats,
    pub setting: Option<&'a VariantLeadTimeSetting>,
    pub config: &'a LeadTimeConfig,
}

impl<'a> RuleContext<'a> {
    /// The variant's primary vendor, preferring the stored setting.
    pub fn vendor_id(&self) -> &'a str {
        self.setting
            .map(|s| s.vendor_id.as_str())
            .unwrap_or(self.stats.product_vendor_id.as_str())
    }

    /// Days added on top of the base for the out-of-stock lead time.
    pub fn out_of_stock_buffer(&self) -> i32 {
        match self.setting.map(|s| s.inventory_behavior) {
            Some(InventoryBehavior::EstimatedShipDate) => 0,
            _ => self.config.out_of_stock_buffer,
        }
    }

    /// Out-of-stock lead time for a computed base, saturating at `i32::MAX`.
    pub fn out_of_stock_days(&self, base_days: i32) -> i32 {
        base_days.saturating_add(self.out_of_stock_buffer())
    }
}

/// Base lead time derived from shipment averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedBase {
    pub source: RecommendationSource,
    pub days: i32,
}

/// Pick the authoritative average and convert it to a lead time.
///
/// OEM wins when it holds the majority, then distributors; otherwise the
/// blended average across every bucket is used. `None` when no average
/// exists.
pub fn computed_base(stats: &VariantStats, config: &LeadTimeConfig) -> Option<ComputedBase> {
    let total = stats.total_count();
    let (source, average) = match (stats.oem.average(), stats.distributor.average()) {
        (Some(avg), _) if config.is_majority(stats.oem.count, total) => {
            (RecommendationSource::OemAverage, avg)
        }
        (_, Some(avg)) if config.is_majority(stats.distributor.count, total) => {
            (RecommendationSource::DistributorAverage, avg)
        }
        _ => (RecommendationSource::BlendedAverage, stats.blended_average()?),
    };
    Some(ComputedBase {
        source,
        days: to_lead_time_days(average, config.business_day_conversion_factor),
    })
}

/// `round(average × factor)`, half away from zero.
pub fn to_lead_time_days(average: f64, factor: f64) -> i32 {
    (average * factor).round() as i32
}

/// Values produced by the first matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub source: RecommendationSource,
    pub in_stock_days: i32,
    pub out_of_stock_days: i32,
}

/// One entry of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadTimeRule {
    /// Configured fixed pair for a named variant.
    SpecialVariant,
    /// 3PL holds the majority of shipments: in-stock ships same day.
    ThirdPartyLogisticsStocked,
    /// Vendor listed as fast: in-stock uses `fast_vendor_days`.
    FastVendor,
    /// Fallback: the computed base.
    ComputedAverage,
}

/// Evaluation order of the rule table.
pub const RULE_TABLE: [LeadTimeRule; 4] = [
    LeadTimeRule::SpecialVariant,
    LeadTimeRule::ThirdPartyLogisticsStocked,
    LeadTimeRule::FastVendor,
    LeadTimeRule::ComputedAverage,
];

impl LeadTimeRule {
    /// Apply this rule, returning `None` when it does not match.
    ///
    /// Outside the special-variant rule, the out-of-stock value is always the
    /// computed base plus the buffer.
    pub fn apply(&self, ctx: &RuleContext<'_>, base: Option<ComputedBase>) -> Option<RuleOutcome> {
        match self {
            LeadTimeRule::SpecialVariant => ctx
                .config
                .overrides
                .special_variants
                .iter()
                .find(|o| o.variant_id == ctx.stats.variant_id)
                .map(|o| RuleOutcome {
                    source: RecommendationSource::SpecialVariant,
                    in_stock_days: o.in_stock_days,
                    out_of_stock_days: o.out_of_stock_days,
                }),
            LeadTimeRule::ThirdPartyLogisticsStocked => {
                let stocked = ctx.config.is_majority(
                    ctx.stats.third_party_logistics.count,
                    ctx.stats.total_count(),
                );
                let base = base?;
                stocked.then(|| RuleOutcome {
                    source: RecommendationSource::ThirdPartyLogisticsStocked,
                    in_stock_days: 0,
                    out_of_stock_days: ctx.out_of_stock_days(base.days),
                })
            }
            LeadTimeRule::FastVendor => {
                let vendor = ctx.vendor_id();
                let fast = ctx.config.overrides.fast_vendors.iter().any(|v| v == vendor);
                let base = base?;
                fast.then(|| RuleOutcome {
                    source: RecommendationSource::FastVendor,
                    in_stock_days: ctx.config.overrides.fast_vendor_days,
                    out_of_stock_days: ctx.out_of_stock_days(base.days),
                })
            }
            LeadTimeRule::ComputedAverage => base.map(|b| RuleOutcome {
                source: b.source,
                in_stock_days: b.days,
                out_of_stock_days: ctx.out_of_stock_days(b.days),
            }),
        }
    }
}

/// Run the rule table for one variant.
pub fn evaluate_rules(ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
    let base = computed_base(ctx.stats, ctx.config);
    RULE_TABLE.iter().find_map(|rule| rule.apply(ctx, base))
}
