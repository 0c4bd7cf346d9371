//! The record-store seam.
//!
//! Every query in this crate runs against a [`RecordStore`]. Two
//! implementations ship with it:
//! - [`Connection`](crate::connection::Connection): embedded DuckDB
//! - [`MemoryStore`]: a `Vec` behind a lock, for tests and small embeddings
//!
//! Stores are `Send + Sync` so the combined fetch can issue its three
//! aggregates from separate threads against one store.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{InsightsError, Result};
use crate::filter::Criteria;
use crate::models::{CategoryCount, TransactionRecord};

/// Read (and seed) operations the query layer needs from a store.
pub trait RecordStore: Send + Sync {
    /// Number of records matching `criteria`.
    fn count(&self, criteria: &Criteria) -> Result<u64>;

    /// Sum of `price` over records matching `criteria`; `0.0` when none match.
    fn sum_price(&self, criteria: &Criteria) -> Result<f64>;

    /// Record count per distinct `category` among matching records, in no
    /// particular order.
    fn count_by_category(&self, criteria: &Criteria) -> Result<Vec<CategoryCount>>;

    /// Matching records after skipping `skip`, at most `limit` of them, in the
    /// store's natural order.
    fn find(&self, criteria: &Criteria, skip: usize, limit: usize) -> Result<Vec<TransactionRecord>>;

    /// Replace every stored record with `records`. Returns the number stored.
    fn replace_all(&self, records: &[TransactionRecord]) -> Result<usize>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory [`RecordStore`] preserving insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<TransactionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<TransactionRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&[TransactionRecord]) -> T) -> Result<T> {
        let guard = self
            .records
            .read()
            .map_err(|_| InsightsError::Internal("memory store lock poisoned".into()))?;
        Ok(f(&guard))
    }
}

impl RecordStore for MemoryStore {
    fn count(&self, criteria: &Criteria) -> Result<u64> {
        self.read(|records| records.iter().filter(|r| criteria.matches(r)).count() as u64)
    }

    fn sum_price(&self, criteria: &Criteria) -> Result<f64> {
        self.read(|records| {
            records
                .iter()
                .filter(|r| criteria.matches(r))
                .map(|r| r.price)
                .sum()
        })
    }

    fn count_by_category(&self, criteria: &Criteria) -> Result<Vec<CategoryCount>> {
        self.read(|records| {
            let mut counts: HashMap<&str, u64> = HashMap::new();
            for record in records.iter().filter(|r| criteria.matches(r)) {
                *counts.entry(record.category.as_str()).or_default() += 1;
            }
            counts
                .into_iter()
                .map(|(category, count)| CategoryCount {
                    category: category.to_string(),
                    count,
                })
                .collect()
        })
    }

    fn find(&self, criteria: &Criteria, skip: usize, limit: usize) -> Result<Vec<TransactionRecord>> {
        self.read(|records| {
            records
                .iter()
                .filter(|r| criteria.matches(r))
                .skip(skip)
                .take(limit)
                .cloned()
                .collect()
        })
    }

    fn replace_all(&self, records: &[TransactionRecord]) -> Result<usize> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| InsightsError::Internal("memory store lock poisoned".into()))?;
        *guard = records.to_vec();
        Ok(guard.len())
    }
}
