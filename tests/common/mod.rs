//! Shared test fixtures for the sales-insights integration tests.
//!
//! Provides a small set of sale records spread over several months and
//! years, helpers to load them into DuckDB or an in-memory store, and a
//! [`FailingStore`] that fails chosen store operations on demand.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sales_insights::{
    CategoryCount, Connection, Criteria, InsightsError, MemoryStore, RecordStore, Result,
    SalesInsights, TransactionRecord,
};

/// Build a record; `date` is RFC 3339 and may carry any offset.
pub fn record(
    id: i64,
    title: &str,
    description: &str,
    category: &str,
    price: f64,
    sold: bool,
    date: &str,
) -> TransactionRecord {
    TransactionRecord {
        id,
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        price,
        image: Some(format!("https://example.test/img/{id}.jpg")),
        sold,
        date_of_sale: date.parse::<DateTime<Utc>>().unwrap(),
    }
}

/// Eleven records:
///
/// - March (any year): ids 1, 2, 3, 4, 8, 9; three sold, three not;
///   total 1348.48; prices cover buckets `0-100` (3), `101-200` (2),
///   `901-above` (1); categories electronics 3, jewelery 2, men's clothing 1.
/// - July: ids 5, 7 (women's clothing).
/// - November: ids 6, 10.
/// - April: id 11 (its local date is March 31, but April 1 in UTC).
pub fn sample_records() -> Vec<TransactionRecord> {
    vec![
        record(1, "Mens Casual Slim Fit", "cotton shirt for men", "men's clothing", 15.99, true, "2021-03-15T10:00:00Z"),
        record(2, "Solid Gold Petite Micropave", "Satisfaction Guaranteed", "jewelery", 168.0, false, "2023-03-02T08:30:00Z"),
        record(3, "WD 2TB Elements Portable", "USB 3.0 hard drive", "electronics", 64.0, true, "2022-03-28T12:00:00Z"),
        record(4, "Samsung 49-Inch Monitor", "curved gaming monitor", "electronics", 999.99, false, "2022-03-05T09:15:00Z"),
        record(5, "Rain Jacket Women Windbreaker", "lightweight jacket", "women's clothing", 39.99, true, "2022-07-10T16:00:00Z"),
        record(6, "Fjallraven Backpack", "fits 15 inch laptops", "men's clothing", 109.95, false, "2021-11-27T20:29:54+05:30"),
        record(7, "Opna Women's Short Sleeve", "moisture wicking", "women's clothing", 7.95, true, "2022-07-20T11:45:00Z"),
        record(8, "Free sample", "promotional item", "electronics", 0.0, false, "2022-03-11T07:00:00Z"),
        record(9, "Pierced Owl Rose Gold", "rose gold earrings", "jewelery", 100.5, true, "2022-03-18T18:20:00Z"),
        record(10, "Silicon Power SSD", "256GB internal drive", "electronics", 200.0, true, "2022-11-01T00:00:00Z"),
        record(11, "Vintage Lamp", "brass desk lamp", "home", 55.0, true, "2022-03-31T23:30:00-02:00"),
    ]
}

pub const MARCH_TOTAL: f64 = 15.99 + 168.0 + 64.0 + 999.99 + 0.0 + 100.5;

/// `count` March records, ids 1..=count, all in category "bulk".
pub fn bulk_march_records(count: i64) -> Vec<TransactionRecord> {
    (1..=count)
        .map(|id| record(id, &format!("Item {id}"), "bulk item", "bulk", id as f64, id % 2 == 0, "2022-03-10T10:00:00Z"))
        .collect()
}

/// An in-memory DuckDB store holding [`sample_records`].
pub fn setup_sample_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.replace_all(&sample_records()).unwrap();
    conn
}

/// An offline SDK over DuckDB with [`sample_records`] imported.
///
/// The caller must keep the `TempDir` alive for the duration of the test.
pub fn setup_sdk() -> (SalesInsights, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let sdk = SalesInsights::builder()
        .cache_dir(tmp_dir.path())
        .offline(true)
        .build()
        .unwrap();
    sdk.import(&sample_records()).unwrap();
    (sdk, tmp_dir)
}

/// An offline SDK over `store`.
pub fn sdk_with_store(store: Arc<dyn RecordStore>) -> (SalesInsights, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let sdk = SalesInsights::builder()
        .cache_dir(tmp_dir.path())
        .offline(true)
        .store(store)
        .build()
        .unwrap();
    (sdk, tmp_dir)
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ---------------------------------------------------------------------------
// FailingStore
// ---------------------------------------------------------------------------

/// A [`MemoryStore`] whose selected operations fail as if the store were down.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    pub fail_count: bool,
    pub fail_sum: bool,
    pub fail_group: bool,
    pub fail_find: bool,
}

impl FailingStore {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self {
            inner: MemoryStore::with_records(records),
            ..Self::default()
        }
    }

    fn down(op: &str) -> InsightsError {
        InsightsError::NotFound(format!("store unavailable during {op}"))
    }
}

impl RecordStore for FailingStore {
    fn count(&self, criteria: &Criteria) -> Result<u64> {
        if self.fail_count {
            return Err(Self::down("count"));
        }
        self.inner.count(criteria)
    }

    fn sum_price(&self, criteria: &Criteria) -> Result<f64> {
        if self.fail_sum {
            return Err(Self::down("sum"));
        }
        self.inner.sum_price(criteria)
    }

    fn count_by_category(&self, criteria: &Criteria) -> Result<Vec<CategoryCount>> {
        if self.fail_group {
            return Err(Self::down("group"));
        }
        self.inner.count_by_category(criteria)
    }

    fn find(&self, criteria: &Criteria, skip: usize, limit: usize) -> Result<Vec<TransactionRecord>> {
        if self.fail_find {
            return Err(Self::down("find"));
        }
        self.inner.find(criteria, skip, limit)
    }

    fn replace_all(&self, records: &[TransactionRecord]) -> Result<usize> {
        self.inner.replace_all(records)
    }
}

// ---------------------------------------------------------------------------
// PanickingStore
// ---------------------------------------------------------------------------

/// A [`MemoryStore`] whose `sum_price` panics, as a crashing store driver would.
pub struct PanickingStore {
    inner: MemoryStore,
}

impl PanickingStore {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self {
            inner: MemoryStore::with_records(records),
        }
    }
}

impl RecordStore for PanickingStore {
    fn count(&self, criteria: &Criteria) -> Result<u64> {
        self.inner.count(criteria)
    }

    fn sum_price(&self, _criteria: &Criteria) -> Result<f64> {
        panic!("store driver crashed during sum");
    }

    fn count_by_category(&self, criteria: &Criteria) -> Result<Vec<CategoryCount>> {
        self.inner.count_by_category(criteria)
    }

    fn find(&self, criteria: &Criteria, skip: usize, limit: usize) -> Result<Vec<TransactionRecord>> {
        self.inner.find(criteria, skip, limit)
    }

    fn replace_all(&self, records: &[TransactionRecord]) -> Result<usize> {
        self.inner.replace_all(records)
    }
}
