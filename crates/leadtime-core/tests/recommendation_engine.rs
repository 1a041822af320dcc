use chrono::NaiveDate;
use leadtime_core::{
    recommend, InventoryBehavior, LeadTimeConfig, MadeToOrderRule, RecommendationInput,
    RecommendationSource, ShipmentRecord, SpecialVariantOverride, VariantLeadTimeSetting,
    WarehouseStock,
};

const WAREHOUSE: &str = "3pl-warehouse";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn as_of() -> NaiveDate {
    date(2024, 3, 31)
}

/// `n` shipments of `variant` via `vendor`, each taking the business days
/// between Monday 2024-03-04 and `ship`.
fn shipments(variant: &str, vendor: &str, n: usize, ship: NaiveDate) -> Vec<ShipmentRecord> {
    (0..n)
        .map(|i| ShipmentRecord {
            variant_id: variant.to_string(),
            order_id: format!("{}-{}-{}", variant, vendor, i),
            fulfillment_vendor_id: vendor.to_string(),
            product_vendor_id: "acme".to_string(),
            purchase_order_date: date(2024, 3, 4),
            ship_date: ship,
        })
        .collect()
}

fn setting(variant: &str) -> VariantLeadTimeSetting {
    VariantLeadTimeSetting {
        variant_id: variant.to_string(),
        vendor_id: "acme".to_string(),
        brand: "Oakline".to_string(),
        in_stock_min_days: 5,
        in_stock_max_days: 7,
        out_of_stock_min_days: 20,
        out_of_stock_max_days: 25,
        inventory_behavior: InventoryBehavior::Standard,
        modified_date: date(2024, 3, 20),
        made_to_order: false,
    }
}

fn run(
    config: &LeadTimeConfig,
    shipments: &[ShipmentRecord],
    settings: &[VariantLeadTimeSetting],
    stock: &[WarehouseStock],
) -> leadtime_core::RecommendationRun {
    recommend(
        config,
        &RecommendationInput {
            shipments,
            settings,
            stock,
            as_of: as_of(),
        },
    )
}

#[test]
fn oem_majority_scenario_recommends_two_days() {
    // 7 OEM shipments at 3 business days, 3 distributor shipments at 8.
    let mut records = shipments("X", "acme", 7, date(2024, 3, 7));
    records.extend(shipments("X", "dist-1", 3, date(2024, 3, 14)));

    let result = run(&LeadTimeConfig::default(), &records, &[], &[]);

    assert_eq!(result.recommendations.len(), 1);
    let row = &result.recommendations[0];
    assert_eq!(row.variant_id, "X");
    assert_eq!(row.source, RecommendationSource::OemAverage);
    assert_eq!(row.new_in_stock_min_days, 2);
    assert_eq!(row.new_out_of_stock_min_days, 2 + 15);
    assert!(!row.needs_review);
}

#[test]
fn third_party_logistics_scenario_recommends_zero() {
    // Every shipment from the 3PL warehouse, slow enough that the average alone would not be 0.
    let records = shipments("Y", WAREHOUSE, 5, date(2024, 3, 11));

    let result = run(&LeadTimeConfig::default(), &records, &[], &[]);

    let row = &result.recommendations[0];
    assert_eq!(row.variant_id, "Y");
    assert_eq!(row.source, RecommendationSource::ThirdPartyLogisticsStocked);
    assert_eq!(row.new_in_stock_min_days, 0);
}

#[test]
fn no_majority_uses_blended_average() {
    let mut records = shipments("B", "acme", 5, date(2024, 3, 6)); // 2 days
    records.extend(shipments("B", "dist-1", 5, date(2024, 3, 14))); // 8 days

    let result = run(&LeadTimeConfig::default(), &records, &[], &[]);

    let row = &result.recommendations[0];
    assert_eq!(row.source, RecommendationSource::BlendedAverage);
    // round(5.0 * 0.714) = round(3.57)
    assert_eq!(row.new_in_stock_min_days, 4);
}

#[test]
fn below_minimum_orders_is_excluded() {
    let records = shipments("S", "acme", 2, date(2024, 3, 7));

    let result = run(&LeadTimeConfig::default(), &records, &[], &[]);

    assert!(result.recommendations.is_empty());
    assert_eq!(result.below_minimum_orders, vec!["S".to_string()]);
}

#[test]
fn estimated_ship_date_mode_adds_no_buffer() {
    let records = shipments("E", "acme", 4, date(2024, 3, 7));
    let mut esd = setting("E");
    esd.inventory_behavior = InventoryBehavior::EstimatedShipDate;

    let result = run(&LeadTimeConfig::default(), &records, &[esd], &[]);

    let row = &result.recommendations[0];
    assert_eq!(row.new_in_stock_min_days, 2);
    assert_eq!(row.new_out_of_stock_min_days, 2);
}

#[test]
fn stock_at_warehouse_overrides_computed_value() {
    let records = shipments("W", "acme", 6, date(2024, 3, 14));
    let stock = vec![
        WarehouseStock {
            variant_id: "W".to_string(),
            warehouse_id: WAREHOUSE.to_string(),
            quantity_on_hand: 8,
        },
        WarehouseStock {
            variant_id: "Z".to_string(),
            warehouse_id: WAREHOUSE.to_string(),
            quantity_on_hand: 0,
        },
        WarehouseStock {
            variant_id: "Q".to_string(),
            warehouse_id: "other".to_string(),
            quantity_on_hand: 50,
        },
    ];

    let result = run(&LeadTimeConfig::default(), &records, &[setting("W")], &stock);

    assert_eq!(result.recommendations.len(), 1);
    let row = &result.recommendations[0];
    assert_eq!(row.source, RecommendationSource::InStockAtWarehouse);
    assert_eq!(row.new_in_stock_min_days, 0);
    assert_eq!(row.new_out_of_stock_min_days, 20);
}

#[test]
fn made_to_order_wins_and_has_larger_out_of_stock() {
    let mut config = LeadTimeConfig::default();
    config.overrides.made_to_order.push(MadeToOrderRule {
        vendor_id: None,
        brand: Some("Oakline".to_string()),
        in_stock_days: 21,
        out_of_stock_days: 35,
    });
    let records = shipments("M", "acme", 6, date(2024, 3, 7));
    let mut mto = setting("M");
    mto.made_to_order = true;
    let stock = vec![WarehouseStock {
        variant_id: "M".to_string(),
        warehouse_id: WAREHOUSE.to_string(),
        quantity_on_hand: 3,
    }];

    let result = run(&config, &records, &[mto], &stock);

    let row = &result.recommendations[0];
    assert_eq!(row.source, RecommendationSource::MadeToOrder);
    assert_eq!(row.new_in_stock_min_days, 21);
    assert_eq!(row.new_out_of_stock_min_days, 35);
    assert!(row.new_out_of_stock_min_days > row.new_in_stock_min_days);
}

#[test]
fn drift_review_flags_stale_wide_settings_only() {
    let mut stale = setting("D");
    stale.out_of_stock_max_days = 60;
    stale.modified_date = date(2023, 12, 1);

    let mut fresh = setting("F");
    fresh.out_of_stock_max_days = 60;
    fresh.modified_date = date(2024, 3, 25);

    let result = run(&LeadTimeConfig::default(), &[], &[stale, fresh], &[]);

    assert_eq!(result.recommendations.len(), 1);
    let row = &result.recommendations[0];
    assert_eq!(row.variant_id, "D");
    assert_eq!(row.source, RecommendationSource::DriftReview);
    assert!(row.needs_review);
    assert_eq!(row.new_in_stock_min_days, 5);
    assert_eq!(row.new_out_of_stock_min_days, 20);
}

#[test]
fn computed_row_beats_drift_review() {
    let records = shipments("C", "acme", 5, date(2024, 3, 7));
    let mut stale = setting("C");
    stale.out_of_stock_max_days = 60;
    stale.modified_date = date(2023, 12, 1);

    let result = run(&LeadTimeConfig::default(), &records, &[stale], &[]);

    assert_eq!(result.recommendations.len(), 1);
    assert_eq!(result.recommendations[0].source, RecommendationSource::OemAverage);
}

#[test]
fn unchanged_rows_are_skipped_unless_requested() {
    let records = shipments("U", "acme", 5, date(2024, 3, 7));
    let mut current = setting("U");
    current.in_stock_min_days = 2;
    current.out_of_stock_min_days = 17;

    let result = run(
        &LeadTimeConfig::default(),
        &records,
        std::slice::from_ref(&current),
        &[],
    );
    assert!(result.recommendations.is_empty());
    assert_eq!(result.unchanged_skipped, 1);

    let config = LeadTimeConfig {
        emit_unchanged: true,
        ..LeadTimeConfig::default()
    };
    let result = run(&config, &records, &[current], &[]);
    assert_eq!(result.recommendations.len(), 1);
    assert_eq!(result.unchanged_skipped, 0);
}

#[test]
fn out_of_stock_is_never_negative() {
    let mut config = LeadTimeConfig::default();
    config.overrides.special_variants.push(SpecialVariantOverride {
        variant_id: "N".to_string(),
        in_stock_days: 0,
        out_of_stock_days: -4,
    });
    let records = shipments("N", "acme", 5, date(2024, 3, 7));

    let result = run(&config, &records, &[], &[]);

    let row = &result.recommendations[0];
    assert_eq!(row.source, RecommendationSource::SpecialVariant);
    assert_eq!(row.new_out_of_stock_min_days, 0);
    assert!(result
        .recommendations
        .iter()
        .all(|r| r.new_out_of_stock_min_days >= 0));
}

#[test]
fn special_variant_below_minimum_orders_gets_no_row() {
    let mut config = LeadTimeConfig::default();
    config.overrides.special_variants.push(SpecialVariantOverride {
        variant_id: "S".to_string(),
        in_stock_days: 3,
        out_of_stock_days: 9,
    });

    let result = run(&config, &shipments("S", "acme", 2, date(2024, 3, 7)), &[], &[]);
    assert!(result.recommendations.is_empty());
    assert_eq!(result.below_minimum_orders, vec!["S".to_string()]);

    let result = run(&config, &shipments("S", "acme", 3, date(2024, 3, 7)), &[], &[]);
    assert_eq!(result.recommendations[0].source, RecommendationSource::SpecialVariant);
}

#[test]
fn oversized_buffer_saturates() {
    let config = LeadTimeConfig {
        out_of_stock_buffer: i32::MAX,
        ..LeadTimeConfig::default()
    };
    let records = shipments("O", "acme", 5, date(2024, 3, 7));

    let result = run(&config, &records, &[], &[]);

    let row = &result.recommendations[0];
    assert_eq!(row.new_in_stock_min_days, 2);
    assert_eq!(row.new_out_of_stock_min_days, i32::MAX);
}

#[test]
fn ship_before_purchase_is_reported_not_computed() {
    let mut records = shipments("R", "acme", 3, date(2024, 3, 7));
    records.push(ShipmentRecord {
        variant_id: "R".to_string(),
        order_id: "bad".to_string(),
        fulfillment_vendor_id: "acme".to_string(),
        product_vendor_id: "acme".to_string(),
        purchase_order_date: date(2024, 3, 20),
        ship_date: date(2024, 3, 10),
    });

    let result = run(&LeadTimeConfig::default(), &records, &[], &[]);

    assert_eq!(result.data_quality.len(), 1);
    assert_eq!(result.data_quality.exceptions[0].record.order_id, "bad");
    assert_eq!(result.recommendations[0].new_in_stock_min_days, 2);
}

#[test]
fn output_is_sorted_and_one_row_per_variant() {
    let mut records = shipments("b-2", "acme", 4, date(2024, 3, 7));
    records.extend(shipments("a-1", "acme", 4, date(2024, 3, 8)));
    let stock = vec![WarehouseStock {
        variant_id: "a-1".to_string(),
        warehouse_id: WAREHOUSE.to_string(),
        quantity_on_hand: 1,
    }];

    let result = run(&LeadTimeConfig::default(), &records, &[], &stock);

    let ids: Vec<&str> = result
        .recommendations
        .iter()
        .map(|r| r.variant_id.as_str())
        .collect();
    assert_eq!(ids, vec!["a-1", "b-2"]);
}
