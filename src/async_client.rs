//! Async wrapper around [`SalesInsights`] for use in async runtimes (Tokio, etc.).
//!
//! Runs SDK operations on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free. The
//! combined fetch issues its three aggregates as three separate blocking tasks
//! and joins them with [`tokio::join!`].
//!
//! # Example
//!
//! ```no_run
//! use sales_insights::{AsyncSalesInsights, QueryParams};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncSalesInsights::builder().build().await.unwrap();
//!     sdk.initialize().await.unwrap();
//!
//!     let report = sdk.combined(QueryParams::for_month("november")).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinError;

use crate::error::{InsightsError, Result};
use crate::models::{CategoryCount, CombinedReport, PriceRangeCount, QueryParams, SaleStatistics, TransactionRecord};
use crate::month::Month;
use crate::queries::CombinedOutcome;
use crate::store::RecordStore;
use crate::SalesInsights;

// ---------------------------------------------------------------------------
// AsyncSalesInsightsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncSalesInsights`] instance.
#[derive(Default)]
pub struct AsyncSalesInsightsBuilder {
    database: Option<PathBuf>,
    store: Option<Arc<dyn RecordStore>>,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Option<Duration>,
    seed_url: Option<String>,
}

impl AsyncSalesInsightsBuilder {
    /// Persist records in a DuckDB file at `path`.
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Some(path.as_ref().to_path_buf());
        self
    }

    /// Query an existing store instead of opening a DuckDB database.
    pub fn store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set a custom cache directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for the seed download.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Download the seed dataset from `url` instead of the public default.
    pub fn seed_url(mut self, url: impl Into<String>) -> Self {
        self.seed_url = Some(url.into());
        self
    }

    /// Build the async SDK.
    ///
    /// Opening the database runs on the blocking thread pool so it won't
    /// block the async event loop.
    pub async fn build(self) -> Result<AsyncSalesInsights> {
        tokio::task::spawn_blocking(move || {
            let mut builder = SalesInsights::builder().offline(self.offline);
            if let Some(path) = self.database {
                builder = builder.database(path);
            }
            if let Some(store) = self.store {
                builder = builder.store(store);
            }
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(url) = self.seed_url {
                builder = builder.seed_url(url);
            }
            Ok(AsyncSalesInsights {
                inner: Arc::new(builder.build()?),
            })
        })
        .await
        .map_err(join_error)?
    }
}

// ---------------------------------------------------------------------------
// AsyncSalesInsights
// ---------------------------------------------------------------------------

/// Async wrapper around [`SalesInsights`].
///
/// [`SalesInsights`] is `Sync`, so it is shared through an [`Arc`] without a
/// lock and concurrent requests do not queue behind each other.
#[derive(Clone)]
pub struct AsyncSalesInsights {
    inner: Arc<SalesInsights>,
}

impl AsyncSalesInsights {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncSalesInsightsBuilder {
        AsyncSalesInsightsBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// A panic inside `f` surfaces as [`InsightsError::Internal`].
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SalesInsights) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.spawn(f).await.map_err(join_error)?
    }

    /// Like [`run`](Self::run) for an aggregate: a panic surfaces as
    /// [`InsightsError::AggregationFailed`], the same as any other failure
    /// of the aggregate.
    async fn run_aggregate<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SalesInsights) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.spawn(f)
            .await
            .unwrap_or_else(|e| Err(InsightsError::AggregationFailed(format!("aggregate task failed: {e}"))))
    }

    async fn spawn<F, T>(&self, f: F) -> std::result::Result<Result<T>, JoinError>
    where
        F: FnOnce(&SalesInsights) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&sdk)).await
    }

    pub async fn transactions(&self, params: QueryParams) -> Result<Vec<TransactionRecord>> {
        self.run(move |s| s.transactions(&params)).await
    }

    pub async fn statistics(&self, params: QueryParams) -> Result<SaleStatistics> {
        self.run_aggregate(move |s| s.statistics(&params)).await
    }

    pub async fn bar_chart(&self, params: QueryParams) -> Result<Vec<PriceRangeCount>> {
        self.run_aggregate(move |s| s.bar_chart(&params)).await
    }

    pub async fn pie_chart(&self, params: QueryParams) -> Result<Vec<CategoryCount>> {
        self.run_aggregate(move |s| s.pie_chart(&params)).await
    }

    /// All three aggregates for `params.month`, each on its own blocking
    /// task, joined before the all-or-nothing policy is applied.
    pub async fn combined(&self, params: QueryParams) -> Result<CombinedReport> {
        self.combined_outcome(params).await?.into_report()
    }

    /// Like [`combined`](Self::combined) but keeps every branch's outcome.
    ///
    /// A missing or invalid month fails here, before any task is spawned.
    pub async fn combined_outcome(&self, params: QueryParams) -> Result<CombinedOutcome> {
        let month = Month::resolve(params.month.as_deref())?;

        let (statistics, bar_chart, pie_chart) = tokio::join!(
            self.run_aggregate(move |s| s.aggregates().statistics(month)),
            self.run_aggregate(move |s| s.aggregates().bar_chart(month)),
            self.run_aggregate(move |s| s.aggregates().pie_chart(month)),
        );

        Ok(CombinedOutcome {
            statistics,
            bar_chart,
            pie_chart,
        })
    }

    /// Seed the store from the product-transaction dataset.
    pub async fn initialize(&self) -> Result<usize> {
        self.run(|s| s.initialize()).await
    }

    /// Replace the store's contents with `records`.
    pub async fn import(&self, records: Vec<TransactionRecord>) -> Result<usize> {
        self.run(move |s| s.import(&records)).await
    }

    /// Clear the cached seed dataset.
    pub async fn refresh(&self) -> Result<()> {
        self.run(|s| s.refresh()).await
    }
}

fn join_error(e: JoinError) -> InsightsError {
    InsightsError::Internal(format!("Task join error: {e}"))
}
