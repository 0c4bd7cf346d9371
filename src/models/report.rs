use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SaleStatistics: totals for one month
// ---------------------------------------------------------------------------

/// Sale totals over the records of one month.
///
/// `total_sold_items + total_not_sold_items` is the number of matching records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleStatistics {
    pub total_sale_amount: f64,
    pub total_sold_items: u64,
    pub total_not_sold_items: u64,
}

// ---------------------------------------------------------------------------
// PriceRangeCount: one bar of the price histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRangeCount {
    pub range: String,
    pub count: u64,
}

// ---------------------------------------------------------------------------
// CategoryCount: one slice of the category breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

// ---------------------------------------------------------------------------
// AggregateKind: names of the combined-fetch branches
// ---------------------------------------------------------------------------

/// The three aggregates gathered by the combined fetch.
///
/// Displays as the key the aggregate has in a combined response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AggregateKind {
    #[serde(rename = "statistics")]
    Statistics,
    #[serde(rename = "barChartData")]
    BarChart,
    #[serde(rename = "pieChartData")]
    PieChart,
}

impl AggregateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AggregateKind::Statistics => "statistics",
            AggregateKind::BarChart => "barChartData",
            AggregateKind::PieChart => "pieChartData",
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CombinedReport: all three aggregates, delivered together
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    pub statistics: SaleStatistics,
    pub bar_chart_data: Vec<PriceRangeCount>,
    pub pie_chart_data: Vec<CategoryCount>,
}
