//! Aggregate queries: statistics, bar chart, pie chart.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::{approx_eq, record, sdk_with_store, setup_sdk, FailingStore, MARCH_TOTAL};
use proptest::prelude::*;
use sales_insights::queries::AggregateQuery;
use sales_insights::{
    InsightsError, MemoryStore, Month, QueryParams, TransactionRecord, PRICE_BUCKETS,
};

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[test]
fn statistics_for_march_span_all_years() {
    let (sdk, _tmp) = setup_sdk();
    let stats = sdk.statistics(&QueryParams::for_month("march")).unwrap();
    assert!(approx_eq(stats.total_sale_amount, MARCH_TOTAL));
    assert_eq!(stats.total_sold_items, 3);
    assert_eq!(stats.total_not_sold_items, 3);
}

#[test]
fn statistics_ignore_search() {
    let (sdk, _tmp) = setup_sdk();
    let params = QueryParams::for_month("March").search("gold");
    let stats = sdk.statistics(&params).unwrap();
    assert_eq!(stats.total_sold_items + stats.total_not_sold_items, 6);
}

#[test]
fn statistics_for_an_empty_month_are_zero() {
    let (sdk, _tmp) = setup_sdk();
    let stats = sdk.statistics(&QueryParams::for_month("February")).unwrap();
    assert_eq!(stats.total_sale_amount, 0.0);
    assert_eq!(stats.total_sold_items, 0);
    assert_eq!(stats.total_not_sold_items, 0);
}

#[test]
fn statistics_serialize_in_camel_case() {
    let (sdk, _tmp) = setup_sdk();
    let stats = sdk.statistics(&QueryParams::for_month("july")).unwrap();
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["totalSoldItems"], 2);
    assert_eq!(json["totalNotSoldItems"], 0);
    assert!(json.get("totalSaleAmount").is_some());
}

#[test]
fn statistics_surface_store_failure_as_aggregation_failed() {
    let mut store = FailingStore::new(common::sample_records());
    store.fail_sum = true;
    let (sdk, _tmp) = sdk_with_store(Arc::new(store));
    match sdk.statistics(&QueryParams::for_month("march")) {
        Err(InsightsError::AggregationFailed(reason)) => assert!(reason.contains("store unavailable")),
        other => panic!("expected AggregationFailed, got {other:?}"),
    }
}

#[test]
fn aggregates_reject_missing_and_invalid_months_before_querying() {
    let mut store = FailingStore::new(Vec::new());
    store.fail_count = true;
    store.fail_sum = true;
    store.fail_group = true;
    let (sdk, _tmp) = sdk_with_store(Arc::new(store));
    assert!(matches!(sdk.statistics(&QueryParams::default()), Err(InsightsError::MissingMonth)));
    assert!(matches!(sdk.bar_chart(&QueryParams::for_month("Marchh")), Err(InsightsError::InvalidMonth(_))));
    assert!(matches!(sdk.pie_chart(&QueryParams::for_month("")), Err(InsightsError::MissingMonth)));
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

#[test]
fn bar_chart_counts_each_bucket_in_fixed_order() {
    let (sdk, _tmp) = setup_sdk();
    let bars = sdk.bar_chart(&QueryParams::for_month("MARCH")).unwrap();

    let got: Vec<(&str, u64)> = bars.iter().map(|b| (b.range.as_str(), b.count)).collect();
    assert_eq!(
        got,
        vec![
            ("0-100", 3),
            ("101-200", 2),
            ("201-300", 0),
            ("301-400", 0),
            ("401-500", 0),
            ("501-600", 0),
            ("601-700", 0),
            ("701-800", 0),
            ("801-900", 0),
            ("901-above", 1),
        ]
    );
}

#[test]
fn bar_chart_for_an_empty_month_has_ten_zero_buckets() {
    let (sdk, _tmp) = setup_sdk();
    let bars = sdk.bar_chart(&QueryParams::for_month("february")).unwrap();
    assert_eq!(bars.len(), PRICE_BUCKETS.len());
    assert!(bars.iter().all(|b| b.count == 0));
}

#[test]
fn bar_chart_places_boundary_prices_once() {
    let (sdk, _tmp) = setup_sdk();
    // November: 109.95 and exactly 200.0
    let bars = sdk.bar_chart(&QueryParams::for_month("november")).unwrap();
    assert_eq!(bars[1].range, "101-200");
    assert_eq!(bars[1].count, 2);
    assert_eq!(bars.iter().map(|b| b.count).sum::<u64>(), 2);
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

#[test]
fn pie_chart_groups_by_exact_category() {
    let (sdk, _tmp) = setup_sdk();
    let mut slices = sdk.pie_chart(&QueryParams::for_month("march")).unwrap();
    slices.sort_by(|a, b| a.category.cmp(&b.category));

    let got: Vec<(&str, u64)> = slices.iter().map(|s| (s.category.as_str(), s.count)).collect();
    assert_eq!(got, vec![("electronics", 3), ("jewelery", 2), ("men's clothing", 1)]);
}

#[test]
fn pie_chart_for_an_empty_month_is_empty() {
    let (sdk, _tmp) = setup_sdk();
    assert!(sdk.pie_chart(&QueryParams::for_month("august")).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Partition properties over random data
// ---------------------------------------------------------------------------

fn arb_record() -> impl Strategy<Value = TransactionRecord> {
    (
        1u32..=12,
        2019i32..=2024,
        1u32..=28,
        prop_oneof![(0u32..1500).prop_map(f64::from), 0.0f64..1500.0],
        any::<bool>(),
        prop::sample::select(vec!["electronics", "jewelery", "men's clothing", "women's clothing"]),
    )
        .prop_map(|(month, year, day, price, sold, category)| {
            let mut r = record(0, "t", "d", category, price, sold, "2020-01-01T00:00:00Z");
            r.date_of_sale = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
            r
        })
}

proptest! {
    #[test]
    fn aggregates_partition_the_month(records in prop::collection::vec(arb_record(), 0..60), index in 1u32..=12) {
        let month = Month::new(index).unwrap();
        let expected: Vec<&TransactionRecord> = records
            .iter()
            .filter(|r| chrono::Datelike::month(&r.date_of_sale) == index)
            .collect();
        let expected_total: f64 = expected.iter().map(|r| r.price).sum();

        let store = MemoryStore::with_records(records.clone());
        let aggregates = AggregateQuery::new(&store);

        let stats = aggregates.statistics(month).unwrap();
        prop_assert_eq!(stats.total_sold_items + stats.total_not_sold_items, expected.len() as u64);
        prop_assert!(approx_eq(stats.total_sale_amount, expected_total));

        let bars = aggregates.bar_chart(month).unwrap();
        prop_assert_eq!(bars.len(), 10);
        for (bar, bucket) in bars.iter().zip(PRICE_BUCKETS.iter()) {
            prop_assert_eq!(bar.range.as_str(), bucket.label);
        }
        prop_assert_eq!(bars.iter().map(|b| b.count).sum::<u64>(), expected.len() as u64);

        let slices = aggregates.pie_chart(month).unwrap();
        prop_assert_eq!(slices.iter().map(|s| s.count).sum::<u64>(), expected.len() as u64);
        let mut seen = HashMap::new();
        for slice in &slices {
            prop_assert!(seen.insert(slice.category.clone(), slice.count).is_none());
        }
    }
}
