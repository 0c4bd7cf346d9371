//! Query modules for the sales-insights SDK.
//!
//! Each module provides a query struct that borrows a
//! [`RecordStore`](crate::store::RecordStore) and exposes methods returning
//! `Result<T>` with typed payloads from [`models`](crate::models).

pub mod aggregates;
pub mod combined;
pub mod transactions;

pub use aggregates::AggregateQuery;
pub use combined::{CombinedOutcome, CombinedQuery};
pub use transactions::TransactionQuery;
