//! Sales-insights SDK for Rust.
//!
//! Answers month-scoped analytical queries over product-sale records: a
//! paginated, searchable listing and three aggregates (sale statistics, a
//! ten-bucket price histogram, per-category counts), plus a combined fetch
//! that computes all three concurrently. Records live in an embedded DuckDB
//! database seeded from the public product-transaction dataset.
//!
//! Months are selected by name in any casing and match regardless of year:
//! `"march"` covers every March in the data.
//!
//! # Quick start
//!
//! ```no_run
//! use sales_insights::{QueryParams, SalesInsights};
//!
//! let sdk = SalesInsights::builder().build().unwrap();
//! sdk.initialize().unwrap();
//!
//! let page = sdk
//!     .transactions(&QueryParams::for_month("march").search("shirt"))
//!     .unwrap();
//! let report = sdk.combined(&QueryParams::for_month("March")).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod filter;
pub mod models;
pub mod month;
pub mod queries;
pub mod sql_builder;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncSalesInsights;
pub use cache::CacheManager;
pub use connection::Connection;
pub use error::{InsightsError, Result};
pub use filter::{Criteria, SearchTerm, TransactionFilter};
pub use models::{
    AggregateKind, CategoryCount, CombinedReport, PriceBucket, PriceRangeCount, QueryParams,
    SaleStatistics, TransactionRecord, PRICE_BUCKETS,
};
pub use month::Month;
pub use sql_builder::{SqlBuilder, SqlParam};
pub use store::{MemoryStore, RecordStore};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use queries::{AggregateQuery, CombinedOutcome, CombinedQuery, TransactionQuery};

// ---------------------------------------------------------------------------
// SalesInsightsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`SalesInsights`] instance.
///
/// Use [`SalesInsights::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](SalesInsightsBuilder::build) to create the SDK.
pub struct SalesInsightsBuilder {
    database: Option<PathBuf>,
    store: Option<Arc<dyn RecordStore>>,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    seed_url: Option<String>,
}

impl Default for SalesInsightsBuilder {
    fn default() -> Self {
        Self {
            database: None,
            store: None,
            cache_dir: None,
            offline: false,
            timeout: Duration::from_secs(120),
            seed_url: None,
        }
    }
}

impl SalesInsightsBuilder {
    /// Persist records in a DuckDB file at `path`.
    ///
    /// Without this the database is in-memory and lost when the SDK is dropped.
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Some(path.as_ref().to_path_buf());
        self
    }

    /// Query an existing store instead of opening a DuckDB database.
    ///
    /// Takes precedence over [`database`](Self::database).
    pub fn store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set a custom cache directory for the downloaded seed dataset.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/sales-insights` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the seed dataset is never downloaded and
    /// [`SalesInsights::initialize`] only uses a previously cached copy.
    /// Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for the seed download.
    ///
    /// Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Download the seed dataset from `url` instead of the public default.
    pub fn seed_url(mut self, url: impl Into<String>) -> Self {
        self.seed_url = Some(url.into());
        self
    }

    /// Build the SDK, preparing the cache directory and the store.
    ///
    /// Nothing is downloaded here; call [`SalesInsights::initialize`] to seed
    /// an empty store.
    pub fn build(self) -> Result<SalesInsights> {
        let mut cache = CacheManager::new(self.cache_dir, self.offline, self.timeout)?;
        if let Some(url) = self.seed_url {
            cache = cache.with_seed_url(url);
        }
        let (store, connection) = match self.store {
            Some(store) => (store, None),
            None => {
                let conn = Arc::new(match self.database {
                    Some(path) => Connection::open(path)?,
                    None => Connection::open_in_memory()?,
                });
                let store: Arc<dyn RecordStore> = conn.clone();
                (store, Some(conn))
            }
        };
        Ok(SalesInsights {
            store,
            connection,
            cache: Mutex::new(cache),
        })
    }
}

// ---------------------------------------------------------------------------
// SalesInsights
// ---------------------------------------------------------------------------

/// The main entry point for the sales-insights SDK.
///
/// Owns the injected [`RecordStore`] and the seed [`CacheManager`], and
/// exposes the service-facing operations. Every read operation takes
/// [`QueryParams`] and resolves the month first; a missing or invalid month
/// is returned before any store query runs.
///
/// `SalesInsights` is `Send + Sync`; requests may run concurrently.
pub struct SalesInsights {
    store: Arc<dyn RecordStore>,
    connection: Option<Arc<Connection>>,
    cache: Mutex<CacheManager>,
}

impl SalesInsights {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> SalesInsightsBuilder {
        SalesInsightsBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the listing query interface.
    pub fn transaction_query(&self) -> TransactionQuery<'_> {
        TransactionQuery::new(self.store.as_ref())
    }

    /// Access the aggregate query interface.
    pub fn aggregates(&self) -> AggregateQuery<'_> {
        AggregateQuery::new(self.store.as_ref())
    }

    /// Access the combined-fetch interface.
    pub fn combined_query(&self) -> CombinedQuery<'_> {
        CombinedQuery::new(self.store.as_ref())
    }

    // -- Service operations ------------------------------------------------

    /// One page of the records sold in `params.month`, narrowed by
    /// `params.search`.
    pub fn transactions(&self, params: &QueryParams) -> Result<Vec<TransactionRecord>> {
        self.transaction_query().list(params)
    }

    /// Total sale amount and sold / not-sold counts for `params.month`.
    pub fn statistics(&self, params: &QueryParams) -> Result<SaleStatistics> {
        self.aggregates().statistics(resolve(params)?)
    }

    /// Price histogram for `params.month`.
    pub fn bar_chart(&self, params: &QueryParams) -> Result<Vec<PriceRangeCount>> {
        self.aggregates().bar_chart(resolve(params)?)
    }

    /// Per-category record counts for `params.month`.
    pub fn pie_chart(&self, params: &QueryParams) -> Result<Vec<CategoryCount>> {
        self.aggregates().pie_chart(resolve(params)?)
    }

    /// All three aggregates for `params.month`, computed concurrently.
    ///
    /// Fails with [`InsightsError::CombinedPartialFailure`] if any of them
    /// failed, naming each failed aggregate.
    pub fn combined(&self, params: &QueryParams) -> Result<CombinedReport> {
        self.combined_outcome(params)?.into_report()
    }

    /// Like [`combined`](Self::combined) but keeps every branch's outcome.
    pub fn combined_outcome(&self, params: &QueryParams) -> Result<CombinedOutcome> {
        Ok(self.combined_query().outcome(resolve(params)?))
    }

    // -- Seeding -----------------------------------------------------------

    /// Seed the store from the product-transaction dataset.
    ///
    /// Downloads the dataset into the cache on first use (unless offline),
    /// then replaces the store's contents with it. Returns the number of
    /// records stored.
    pub fn initialize(&self) -> Result<usize> {
        let records = self.cache()?.load_seed()?;
        self.import(&records)
    }

    /// Replace the store's contents with `records`.
    ///
    /// Rejects records with a negative price.
    pub fn import(&self, records: &[TransactionRecord]) -> Result<usize> {
        if let Some(bad) = records.iter().find(|r| r.price.is_nan() || r.price < 0.0) {
            return Err(InsightsError::InvalidArgument(format!(
                "record {} has invalid price {}",
                bad.id, bad.price
            )));
        }
        let stored = self.store.replace_all(records)?;
        tracing::info!(stored, "imported sale records");
        Ok(stored)
    }

    /// Clear the cached seed dataset so the next [`initialize`](Self::initialize)
    /// downloads it again.
    pub fn refresh(&self) -> Result<()> {
        self.cache()?.clear()?;
        tracing::info!("seed cache cleared");
        Ok(())
    }

    // -- Metadata and utility methods --------------------------------------

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// Only available when the SDK owns a DuckDB store; fails with
    /// [`InsightsError::InvalidArgument`] for injected stores.
    pub fn sql(
        &self,
        query: &str,
        params: &[SqlParam],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.duckdb()?.execute(query, params)
    }

    /// Total number of stored records.
    pub fn count(&self) -> Result<u64> {
        self.duckdb()?.count_all()
    }

    /// Return a reference to the underlying store.
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    fn duckdb(&self) -> Result<&Connection> {
        self.connection.as_deref().ok_or_else(|| {
            InsightsError::InvalidArgument("SDK is not backed by a DuckDB connection".into())
        })
    }

    fn cache(&self) -> Result<MutexGuard<'_, CacheManager>> {
        self.cache
            .lock()
            .map_err(|_| InsightsError::Internal("cache lock poisoned".into()))
    }
}

fn resolve(params: &QueryParams) -> Result<Month> {
    Month::resolve(params.month.as_deref())
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for SalesInsights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cache.lock() {
            Ok(cache) => write!(
                f,
                "SalesInsights(cache_dir={}, offline={}, duckdb={})",
                cache.cache_dir.display(),
                cache.offline,
                self.connection.is_some()
            ),
            Err(_) => write!(f, "SalesInsights(cache=poisoned)"),
        }
    }
}
