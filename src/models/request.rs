use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PAGE, DEFAULT_PER_PAGE};

/// Request parameters shared by every read operation.
///
/// Mirrors the query string a service layer receives
/// (`?month=march&search=shirt&page=2&perPage=10`). Aggregates only look at
/// `month`; listing uses all four.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    pub month: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl QueryParams {
    /// Parameters selecting a whole month.
    pub fn for_month(month: impl Into<String>) -> Self {
        Self {
            month: Some(month.into()),
            ..Self::default()
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    pub fn page_or_default(&self) -> usize {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn per_page_or_default(&self) -> usize {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }
}
