//! Seeding from the cached product-transaction dataset.

mod common;

use std::fs;

use common::sample_records;
use sales_insights::{InsightsError, QueryParams, SalesInsights};

const SEED_FILE: &str = "product_transaction.json";

fn offline_sdk(dir: &std::path::Path) -> SalesInsights {
    SalesInsights::builder()
        .cache_dir(dir)
        .offline(true)
        .build()
        .unwrap()
}

fn write_seed(dir: &std::path::Path) {
    let json = serde_json::to_string(&sample_records()).unwrap();
    fs::write(dir.join(SEED_FILE), json).unwrap();
}

#[test]
fn offline_without_cached_seed_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = offline_sdk(tmp.path());
    let err = sdk.initialize().unwrap_err();
    assert!(matches!(err, InsightsError::NotFound(_)));
    assert_eq!(sdk.count().unwrap(), 0);
}

#[test]
fn initialize_loads_the_cached_seed() {
    let tmp = tempfile::tempdir().unwrap();
    write_seed(tmp.path());
    let sdk = offline_sdk(tmp.path());

    assert_eq!(sdk.initialize().unwrap(), 11);
    assert_eq!(sdk.count().unwrap(), 11);

    let march = sdk.transactions(&QueryParams::for_month("march")).unwrap();
    assert_eq!(march.len(), 6);
}

#[test]
fn initialize_twice_replaces_instead_of_appending() {
    let tmp = tempfile::tempdir().unwrap();
    write_seed(tmp.path());
    let sdk = offline_sdk(tmp.path());

    sdk.initialize().unwrap();
    sdk.initialize().unwrap();
    assert_eq!(sdk.count().unwrap(), 11);
}

#[test]
fn seed_in_upstream_format_parses() {
    let tmp = tempfile::tempdir().unwrap();
    let json = r#"[
        {
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 329.85,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        },
        {
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts",
            "price": 44.6,
            "description": "Slim-fitting style",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg",
            "sold": false,
            "dateOfSale": "2021-10-27T20:29:54+05:30"
        }
    ]"#;
    fs::write(tmp.path().join(SEED_FILE), json).unwrap();
    let sdk = offline_sdk(tmp.path());

    assert_eq!(sdk.initialize().unwrap(), 2);
    let stats = sdk.statistics(&QueryParams::for_month("november")).unwrap();
    assert_eq!(stats.total_not_sold_items, 1);
    let bars = sdk.bar_chart(&QueryParams::for_month("november")).unwrap();
    assert_eq!(bars[3].range, "301-400");
    assert_eq!(bars[3].count, 1);
}

#[test]
fn corrupt_seed_is_removed() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(SEED_FILE);
    fs::write(&path, "[{\"id\": 1, \"title\":").unwrap();
    let sdk = offline_sdk(tmp.path());

    let err = sdk.initialize().unwrap_err();
    assert!(matches!(err, InsightsError::NotFound(ref m) if m.contains("corrupt")));
    assert!(!path.exists());
}

#[test]
fn refresh_clears_the_cached_seed() {
    let tmp = tempfile::tempdir().unwrap();
    write_seed(tmp.path());
    let sdk = offline_sdk(tmp.path());
    sdk.initialize().unwrap();

    sdk.refresh().unwrap();
    assert!(!tmp.path().join(SEED_FILE).exists());
    assert!(tmp.path().exists());

    // Records already stored survive a cache refresh
    assert_eq!(sdk.count().unwrap(), 11);
    assert!(matches!(sdk.initialize(), Err(InsightsError::NotFound(_))));
}

#[test]
fn import_rejects_negative_prices() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = offline_sdk(tmp.path());
    let mut records = sample_records();
    records[4].price = -1.0;

    let err = sdk.import(&records).unwrap_err();
    assert!(matches!(err, InsightsError::InvalidArgument(_)));
    assert_eq!(sdk.count().unwrap(), 0);
}

#[test]
fn sdk_persists_to_a_database_file() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("sales.duckdb");
    {
        let sdk = SalesInsights::builder()
            .cache_dir(tmp.path())
            .offline(true)
            .database(&db)
            .build()
            .unwrap();
        sdk.import(&sample_records()).unwrap();
    }
    let sdk = SalesInsights::builder()
        .cache_dir(tmp.path())
        .offline(true)
        .database(&db)
        .build()
        .unwrap();
    assert_eq!(sdk.count().unwrap(), 11);
}

#[test]
fn raw_sql_needs_a_duckdb_store() {
    let (sdk, _tmp) = common::sdk_with_store(std::sync::Arc::new(sales_insights::MemoryStore::new()));
    assert!(matches!(sdk.count(), Err(InsightsError::InvalidArgument(_))));
    assert!(matches!(sdk.sql("SELECT 1", &[]), Err(InsightsError::InvalidArgument(_))));
}

#[test]
fn display_names_the_cache_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = offline_sdk(tmp.path());
    let text = sdk.to_string();
    assert!(text.starts_with("SalesInsights("));
    assert!(text.contains("offline=true"));
    assert!(text.contains("duckdb=true"));
}
