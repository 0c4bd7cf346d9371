use std::path::PathBuf;

/// Public product-transaction dataset used by the one-time seed import.
pub const SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// File name of the cached seed dataset inside the cache directory.
pub const SEED_FILE: &str = "product_transaction.json";

/// Table holding the sale records.
pub const TRANSACTIONS_TABLE: &str = "transactions";

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PER_PAGE: usize = 10;

/// Canonical English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("sales-insights")
    } else {
        PathBuf::from(".sales-insights-cache")
    }
}
