use std::collections::BTreeMap;

use crate::models::AggregateKind;

#[derive(Debug, thiserror::Error)]
pub enum InsightsError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Month is required.")]
    MissingMonth,

    #[error("Invalid month provided: {0:?}")]
    InvalidMonth(String),

    #[error("Aggregation failed: {0}")]
    AggregationFailed(String),

    #[error("Error fetching combined data: {}", describe_failures(.0))]
    CombinedPartialFailure(BTreeMap<AggregateKind, String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A poisoned lock or a crashed worker task.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl InsightsError {
    /// Whether the error was caused by the request itself (bad month, bad
    /// pagination) rather than by the store or the network.
    ///
    /// Service layers map these to a 400 response and everything else to 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            InsightsError::MissingMonth
                | InsightsError::InvalidMonth(_)
                | InsightsError::InvalidArgument(_)
        )
    }
}

fn describe_failures(failures: &BTreeMap<AggregateKind, String>) -> String {
    failures
        .iter()
        .map(|(kind, reason)| format!("{kind}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, InsightsError>;
