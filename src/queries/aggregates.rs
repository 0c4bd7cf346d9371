//! Month-level aggregates: sale statistics, price histogram, category counts.
//!
//! Aggregates take a resolved [`Month`] only; search text never narrows them.
//! Store failures surface as [`InsightsError::AggregationFailed`]. An empty
//! month is not a failure: it yields zero totals, ten zero-count buckets and an
//! empty category list.

use crate::error::{InsightsError, Result};
use crate::filter::Criteria;
use crate::models::{CategoryCount, PriceRangeCount, SaleStatistics, PRICE_BUCKETS};
use crate::month::Month;
use crate::store::RecordStore;

// ---------------------------------------------------------------------------
// AggregateQuery
// ---------------------------------------------------------------------------

/// Aggregate queries over one store.
#[derive(Clone, Copy)]
pub struct AggregateQuery<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> AggregateQuery<'a> {
    /// Create a new `AggregateQuery` bound to the given store.
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Total sale amount plus sold / not-sold counts for `month`.
    ///
    /// The amount sums every matching record, sold or not.
    pub fn statistics(&self, month: Month) -> Result<SaleStatistics> {
        let criteria = Criteria::from(month);
        let total_sale_amount = self.store.sum_price(&criteria).map_err(aggregation_failed)?;
        let total_sold_items = self
            .store
            .count(&criteria.clone().sold(true))
            .map_err(aggregation_failed)?;
        let total_not_sold_items = self
            .store
            .count(&criteria.sold(false))
            .map_err(aggregation_failed)?;

        Ok(SaleStatistics {
            total_sale_amount,
            total_sold_items,
            total_not_sold_items,
        })
    }

    /// Record count per price bucket for `month`, in fixed ascending order.
    pub fn bar_chart(&self, month: Month) -> Result<Vec<PriceRangeCount>> {
        let criteria = Criteria::from(month);
        PRICE_BUCKETS
            .iter()
            .map(|bucket| {
                let count = self
                    .store
                    .count(&criteria.clone().price_bucket(bucket))
                    .map_err(aggregation_failed)?;
                Ok(PriceRangeCount {
                    range: bucket.label.to_string(),
                    count,
                })
            })
            .collect()
    }

    /// Record count per distinct category for `month`. Order is unspecified.
    pub fn pie_chart(&self, month: Month) -> Result<Vec<CategoryCount>> {
        self.store
            .count_by_category(&Criteria::from(month))
            .map_err(aggregation_failed)
    }
}

fn aggregation_failed(e: InsightsError) -> InsightsError {
    match e {
        InsightsError::AggregationFailed(_) => e,
        other => InsightsError::AggregationFailed(other.to_string()),
    }
}
