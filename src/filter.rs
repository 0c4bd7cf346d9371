//! Record-selection predicates.
//!
//! A [`TransactionFilter`] is built once per request from a resolved
//! [`Month`] and an optional search string, then passed by value to every
//! consumer. Stores receive a [`Criteria`]: the filter plus the narrowing an
//! aggregate needs (sold flag, price bucket). A `Criteria` renders to SQL with
//! [`Criteria::apply`] and evaluates in memory with [`Criteria::matches`];
//! both select the same records.

use chrono::Datelike;

use crate::models::{PriceBucket, TransactionRecord};
use crate::month::Month;
use crate::sql_builder::{SqlBuilder, SqlParam};

// ---------------------------------------------------------------------------
// SearchTerm
// ---------------------------------------------------------------------------

/// Free-text search over title, description and price.
///
/// Matches when `title` or `description` contains the text case-insensitively,
/// or when the text parses as a number equal to `price`. Text that does not
/// parse as a number never takes part in the price comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm {
    text: String,
    folded: String,
    price: Option<f64>,
}

impl SearchTerm {
    /// Build a search term; empty text means no search.
    pub fn new(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        let price = text.trim().parse::<f64>().ok().filter(|p| p.is_finite());
        Some(Self {
            text: text.to_string(),
            folded: fold_case(text),
            price,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The price the text parses to, if it is a number.
    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        fold_case(&record.title).contains(&self.folded)
            || fold_case(&record.description).contains(&self.folded)
            || self.price == Some(record.price)
    }
}

/// Lower-case one character at a time with the simple mapping, as DuckDB's
/// `lower()` does: `'İ'` folds to `'i'` and a final `'Σ'` to `'σ'`.
fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

// ---------------------------------------------------------------------------
// TransactionFilter
// ---------------------------------------------------------------------------

/// Month plus optional search: the selection a request asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    month: Month,
    search: Option<SearchTerm>,
}

impl TransactionFilter {
    /// Select every record sold in `month`, any year.
    pub fn new(month: Month) -> Self {
        Self {
            month,
            search: None,
        }
    }

    /// Narrow by a search string. `None` and `""` leave the filter unchanged.
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = search.and_then(SearchTerm::new);
        self
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn search(&self) -> Option<&SearchTerm> {
        self.search.as_ref()
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        record.date_of_sale.month() == self.month.index()
            && self.search.as_ref().map_or(true, |s| s.matches(record))
    }
}

impl From<Month> for TransactionFilter {
    fn from(month: Month) -> Self {
        Self::new(month)
    }
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// A [`TransactionFilter`] narrowed for one store call.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    filter: TransactionFilter,
    sold: Option<bool>,
    bucket: Option<PriceBucket>,
}

impl Criteria {
    pub fn new(filter: TransactionFilter) -> Self {
        Self {
            filter,
            sold: None,
            bucket: None,
        }
    }

    /// Keep only records whose `sold` flag equals `sold`.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }

    /// Keep only records whose price falls in `bucket`.
    pub fn price_bucket(mut self, bucket: &PriceBucket) -> Self {
        self.bucket = Some(*bucket);
        self
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.filter.matches(record)
            && self.sold.map_or(true, |sold| record.sold == sold)
            && self.bucket.map_or(true, |b| b.contains(record.price))
    }

    /// Append this predicate's WHERE conditions to `qb`.
    ///
    /// The month is compared by extracting the month component of
    /// `date_of_sale`, never by a year-bounded range.
    pub fn apply(&self, qb: &mut SqlBuilder) {
        qb.where_clause("month(date_of_sale) = ?", vec![self.filter.month.index()]);

        if let Some(search) = &self.filter.search {
            let mut any = vec![
                ("contains(lower(title), lower(?))", SqlParam::from(search.text())),
                ("contains(lower(description), lower(?))", SqlParam::from(search.text())),
            ];
            if let Some(price) = search.price() {
                any.push(("price = ?", SqlParam::from(price)));
            }
            qb.where_or(any);
        }

        if let Some(sold) = self.sold {
            qb.where_eq("sold", sold);
        }

        if let Some(bucket) = &self.bucket {
            if let Some(floor) = bucket.floor {
                qb.where_gt("price", floor);
            }
            if let Some(ceiling) = bucket.ceiling {
                qb.where_lte("price", ceiling);
            }
        }
    }
}

impl From<TransactionFilter> for Criteria {
    fn from(filter: TransactionFilter) -> Self {
        Self::new(filter)
    }
}

impl From<Month> for Criteria {
    fn from(month: Month) -> Self {
        Self::new(TransactionFilter::new(month))
    }
}
