//! Paginated listing of the records sold in a month.

use crate::error::{InsightsError, Result};
use crate::filter::{Criteria, TransactionFilter};
use crate::models::{QueryParams, TransactionRecord};
use crate::month::Month;
use crate::store::RecordStore;

/// Query interface for listing sale records.
#[derive(Clone, Copy)]
pub struct TransactionQuery<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> TransactionQuery<'a> {
    /// Create a new `TransactionQuery` bound to the given store.
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// List one page of the records matching `params`.
    ///
    /// `month` is required; `search` narrows by title, description or exact
    /// price. `page` and `perPage` default to 1 and 10 and must both be at
    /// least 1. No ordering is imposed beyond the store's own.
    pub fn list(&self, params: &QueryParams) -> Result<Vec<TransactionRecord>> {
        let month = Month::resolve(params.month.as_deref())?;
        let filter = TransactionFilter::new(month).with_search(params.search.as_deref());
        self.page(&filter, params.page_or_default(), params.per_page_or_default())
    }

    /// List page `page` (1-based) of `per_page` records matching `filter`.
    pub fn page(
        &self,
        filter: &TransactionFilter,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<TransactionRecord>> {
        if page == 0 {
            return Err(InsightsError::InvalidArgument("page must be at least 1".into()));
        }
        if per_page == 0 {
            return Err(InsightsError::InvalidArgument("perPage must be at least 1".into()));
        }
        let skip = (page - 1).saturating_mul(per_page);
        self.store
            .find(&Criteria::new(filter.clone()), skip, per_page)
    }
}
