use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TransactionRecord: one product sale
// ---------------------------------------------------------------------------

/// A single product-sale record.
///
/// Field names follow the seed dataset (`dateOfSale`, camelCase). Sale
/// timestamps are normalized to UTC on load; only their month takes part in
/// filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    pub sold: bool,
    pub date_of_sale: DateTime<Utc>,
}
