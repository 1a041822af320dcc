//! Lead-time recommendation engine.
//!
//! Combines four branches into one recommendation per variant:
//! - computed: windowed shipment averages run through the rule table
//! - in stock at the 3PL warehouse: same-day in-stock lead time
//! - made-to-order: fixed per vendor/brand lead times
//! - drift review: stale settings whose min/max spread is too wide
//!
//! When several branches produce a row for the same variant, the one with
//! the highest [`RecommendationSource`] precedence wins.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate_shipments, ShipmentWindow};
use crate::classifier::FulfillmentClassifier;
use crate::config::LeadTimeConfig;
use crate::domain::{
    DataQualityReport, LeadTimeRecommendation, RecommendationSource, ShipmentRecord,
    VariantLeadTimeSetting, WarehouseStock,
};
use crate::metrics::METRICS;
use crate::obs;
use crate::rules::{evaluate_rules, RuleContext};

/// Snapshot the engine reads.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInput<'a> {
    pub shipments: &'a [ShipmentRecord],
    pub settings: &'a [VariantLeadTimeSetting],
    pub stock: &'a [WarehouseStock],
    /// Last day of the trailing window.
    pub as_of: NaiveDate,
}

/// Result of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRun {
    pub as_of: NaiveDate,
    pub window: ShipmentWindow,
    /// One row per variant, sorted by variant id.
    pub recommendations: Vec<LeadTimeRecommendation>,
    pub data_quality: DataQualityReport,
    /// Variants with shipments in the window but fewer than the minimum.
    pub below_minimum_orders: Vec<String>,
    /// Rows dropped because they match the current setting.
    pub unchanged_skipped: usize,
}

/// Compute recommendations for every variant in the snapshot.
pub fn recommend(config: &LeadTimeConfig, input: &RecommendationInput<'_>) -> RecommendationRun {
    let window = ShipmentWindow::trailing(input.as_of, config.sales_history_window);
    let classifier = FulfillmentClassifier::new(config.third_party_logistics_warehouse_id.clone());
    let aggregation = aggregate_shipments(input.shipments, &window, &classifier);

    let settings: HashMap<&str, &VariantLeadTimeSetting> = input
        .settings
        .iter()
        .map(|s| (s.variant_id.as_str(), s))
        .collect();

    let mut candidates: BTreeMap<String, Vec<LeadTimeRecommendation>> = BTreeMap::new();
    let mut below_minimum_orders = Vec::new();

    // Computed branch.
    for stats in aggregation.variants.values() {
        let total = stats.total_count();
        if total < config.minimum_orders_threshold as usize {
            tracing::debug!(
                variant_id = %stats.variant_id,
                shipments = total,
                minimum = config.minimum_orders_threshold,
                "variant below minimum orders"
            );
            below_minimum_orders.push(stats.variant_id.clone());
            continue;
        }
        let ctx = RuleContext {
            stats,
            setting: settings.get(stats.variant_id.as_str()).copied(),
            config,
        };
        if let Some(outcome) = evaluate_rules(&ctx) {
            offer(
                &mut candidates,
                LeadTimeRecommendation {
                    variant_id: stats.variant_id.clone(),
                    new_in_stock_min_days: outcome.in_stock_days,
                    new_out_of_stock_min_days: outcome.out_of_stock_days,
                    source: outcome.source,
                    needs_review: false,
                },
            );
        }
    }

    // In stock at the 3PL warehouse.
    for stock in input.stock.iter().filter(|s| {
        s.warehouse_id == config.third_party_logistics_warehouse_id && s.quantity_on_hand > 0
    }) {
        let out_of_stock = settings
            .get(stock.variant_id.as_str())
            .map(|s| s.out_of_stock_min_days)
            .unwrap_or(config.out_of_stock_buffer);
        offer(
            &mut candidates,
            LeadTimeRecommendation {
                variant_id: stock.variant_id.clone(),
                new_in_stock_min_days: 0,
                new_out_of_stock_min_days: out_of_stock,
                source: RecommendationSource::InStockAtWarehouse,
                needs_review: false,
            },
        );
    }

    // Made-to-order and drift review both derive from current settings.
    for setting in input.settings {
        if setting.made_to_order {
            if let Some(rule) = config
                .overrides
                .made_to_order
                .iter()
                .find(|r| r.matches(&setting.vendor_id, &setting.brand))
            {
                offer(
                    &mut candidates,
                    LeadTimeRecommendation {
                        variant_id: setting.variant_id.clone(),
                        new_in_stock_min_days: rule.in_stock_days,
                        new_out_of_stock_min_days: rule.out_of_stock_days,
                        source: RecommendationSource::MadeToOrder,
                        needs_review: false,
                    },
                );
            }
        }

        if is_drifted(setting, config, input.as_of) {
            offer(
                &mut candidates,
                LeadTimeRecommendation {
                    variant_id: setting.variant_id.clone(),
                    new_in_stock_min_days: setting.in_stock_min_days,
                    new_out_of_stock_min_days: setting.out_of_stock_min_days,
                    source: RecommendationSource::DriftReview,
                    needs_review: true,
                },
            );
        }
    }

    let mut recommendations = Vec::with_capacity(candidates.len());
    let mut unchanged_skipped = 0usize;
    for (variant_id, mut rows) in candidates {
        rows.sort_by_key(|r| r.source);
        let current = settings.get(variant_id.as_str()).copied();
        let Some(winner) = select_row(rows, current, config.emit_unchanged, &mut unchanged_skipped)
        else {
            continue;
        };
        let winner = clamp_out_of_stock(winner);
        obs::emit_recommendation(&winner);
        recommendations.push(winner);
    }

    METRICS.add_recommendations(recommendations.len() as u64);
    RecommendationRun {
        as_of: input.as_of,
        window,
        recommendations,
        data_quality: aggregation.data_quality,
        below_minimum_orders,
        unchanged_skipped,
    }
}

fn offer(
    candidates: &mut BTreeMap<String, Vec<LeadTimeRecommendation>>,
    row: LeadTimeRecommendation,
) {
    candidates.entry(row.variant_id.clone()).or_default().push(row);
}

/// Pick the highest-precedence row. An unchanged winner is dropped, falling
/// back to a drift-review row when one exists.
fn select_row(
    rows: Vec<LeadTimeRecommendation>,
    current: Option<&VariantLeadTimeSetting>,
    emit_unchanged: bool,
    unchanged_skipped: &mut usize,
) -> Option<LeadTimeRecommendation> {
    let mut rows = rows.into_iter();
    let winner = rows.next()?;
    if emit_unchanged || winner.needs_review || !matches_current(&winner, current) {
        return Some(winner);
    }
    *unchanged_skipped += 1;
    tracing::debug!(variant_id = %winner.variant_id, source = %winner.source, "unchanged recommendation skipped");
    rows.find(|r| r.needs_review)
}

fn matches_current(row: &LeadTimeRecommendation, current: Option<&VariantLeadTimeSetting>) -> bool {
    current.is_some_and(|s| {
        s.in_stock_min_days == row.new_in_stock_min_days
            && s.out_of_stock_min_days == clamp_days(row.new_out_of_stock_min_days)
    })
}

fn clamp_days(days: i32) -> i32 {
    days.max(0)
}

fn clamp_out_of_stock(mut row: LeadTimeRecommendation) -> LeadTimeRecommendation {
    row.new_out_of_stock_min_days = clamp_days(row.new_out_of_stock_min_days);
    row
}

/// Spread above the drift threshold on a setting untouched for longer than
/// the modify-date restriction.
fn is_drifted(setting: &VariantLeadTimeSetting, config: &LeadTimeConfig, as_of: NaiveDate) -> bool {
    let age_days = (as_of - setting.modified_date).num_days();
    setting.spread_days() > config.difference_threshold
        && age_days > i64::from(config.modify_date_restriction)
}
