//! Combined fetch of the three month aggregates.
//!
//! The statistics, bar-chart and pie-chart aggregates run concurrently, each
//! on its own thread with its own store query. Each branch's outcome is kept
//! independently in a [`CombinedOutcome`]; [`CombinedOutcome::into_report`]
//! then applies the all-or-nothing policy: a report only when every branch
//! succeeded, otherwise an error naming exactly the branches that failed.

use std::collections::BTreeMap;
use std::thread::{self, ScopedJoinHandle};

use crate::error::{InsightsError, Result};
use crate::models::{
    AggregateKind, CategoryCount, CombinedReport, PriceRangeCount, SaleStatistics,
};
use crate::month::Month;
use crate::queries::aggregates::AggregateQuery;
use crate::store::RecordStore;

// ---------------------------------------------------------------------------
// CombinedOutcome
// ---------------------------------------------------------------------------

/// Per-branch results of a combined fetch, before the boundary policy.
#[derive(Debug)]
pub struct CombinedOutcome {
    pub statistics: Result<SaleStatistics>,
    pub bar_chart: Result<Vec<PriceRangeCount>>,
    pub pie_chart: Result<Vec<CategoryCount>>,
}

impl CombinedOutcome {
    /// The branches that failed, with their reasons.
    pub fn failures(&self) -> BTreeMap<AggregateKind, String> {
        let mut failures = BTreeMap::new();
        if let Err(e) = &self.statistics {
            failures.insert(AggregateKind::Statistics, e.to_string());
        }
        if let Err(e) = &self.bar_chart {
            failures.insert(AggregateKind::BarChart, e.to_string());
        }
        if let Err(e) = &self.pie_chart {
            failures.insert(AggregateKind::PieChart, e.to_string());
        }
        failures
    }

    pub fn is_complete(&self) -> bool {
        self.statistics.is_ok() && self.bar_chart.is_ok() && self.pie_chart.is_ok()
    }

    /// Collapse to a single result.
    ///
    /// Any failed branch turns the whole fetch into
    /// [`InsightsError::CombinedPartialFailure`]; payloads of the branches that
    /// did succeed are dropped.
    pub fn into_report(self) -> Result<CombinedReport> {
        let failures = self.failures();
        match (self.statistics, self.bar_chart, self.pie_chart) {
            (Ok(statistics), Ok(bar_chart_data), Ok(pie_chart_data)) => Ok(CombinedReport {
                statistics,
                bar_chart_data,
                pie_chart_data,
            }),
            _ => {
                for (kind, reason) in &failures {
                    tracing::warn!(aggregate = %kind, reason = %reason, "combined fetch branch failed");
                }
                Err(InsightsError::CombinedPartialFailure(failures))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CombinedQuery
// ---------------------------------------------------------------------------

/// Runs the three aggregates for one month concurrently.
#[derive(Clone, Copy)]
pub struct CombinedQuery<'a> {
    aggregates: AggregateQuery<'a>,
}

impl<'a> CombinedQuery<'a> {
    /// Create a new `CombinedQuery` bound to the given store.
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self {
            aggregates: AggregateQuery::new(store),
        }
    }

    /// Run all three aggregates and keep each outcome.
    ///
    /// The branches run on scoped threads and are all joined before this
    /// returns; one failing branch does not stop the others.
    pub fn outcome(&self, month: Month) -> CombinedOutcome {
        let aggregates = self.aggregates;
        thread::scope(|s| {
            let statistics = s.spawn(move || aggregates.statistics(month));
            let bar_chart = s.spawn(move || aggregates.bar_chart(month));
            let pie_chart = s.spawn(move || aggregates.pie_chart(month));

            CombinedOutcome {
                statistics: join_branch(statistics),
                bar_chart: join_branch(bar_chart),
                pie_chart: join_branch(pie_chart),
            }
        })
    }

    /// Run all three aggregates and apply the all-or-nothing policy.
    pub fn fetch(&self, month: Month) -> Result<CombinedReport> {
        self.outcome(month).into_report()
    }
}

fn join_branch<T>(handle: ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(InsightsError::AggregationFailed("aggregate task panicked".into())))
}
