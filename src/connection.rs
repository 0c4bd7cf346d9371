//! DuckDB-backed record store.
//!
//! Holds one root connection to an in-memory or on-disk database. Every query
//! runs on a fresh cursor cloned from the root, so queries issued from
//! different threads share the database but not a connection and can run
//! side by side.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use duckdb::{params, types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;

use crate::config::TRANSACTIONS_TABLE;
use crate::error::{InsightsError, Result};
use crate::filter::Criteria;
use crate::models::{CategoryCount, TransactionRecord};
use crate::sql_builder::{SqlBuilder, SqlParam};
use crate::store::RecordStore;

/// Columns selected when materializing [`TransactionRecord`]s. The sale
/// timestamp is rendered as RFC 3339 UTC so it deserializes directly.
const RECORD_COLUMNS: [&str; 8] = [
    "id",
    "title",
    "description",
    "category",
    "price",
    "image",
    "sold",
    "strftime(date_of_sale, '%Y-%m-%dT%H:%M:%S.%fZ') AS dateOfSale",
];

/// Largest row count DuckDB accepts for `LIMIT` and `OFFSET` (below 2^62).
const MAX_ROW_BOUND: u64 = (1 << 62) - 1;

/// Wraps a DuckDB database holding the `transactions` table.
pub struct Connection {
    root: Mutex<DuckDbConnection>,
}

impl Connection {
    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(DuckDbConnection::open_in_memory()?)
    }

    /// Open (or create) a database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init(DuckDbConnection::open(path)?)
    }

    fn init(conn: DuckDbConnection) -> Result<Self> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (\
                id BIGINT NOT NULL, \
                title VARCHAR NOT NULL, \
                description VARCHAR NOT NULL, \
                category VARCHAR NOT NULL, \
                price DOUBLE NOT NULL, \
                image VARCHAR, \
                sold BOOLEAN NOT NULL, \
                date_of_sale TIMESTAMP NOT NULL\
             )",
            TRANSACTIONS_TABLE
        ))?;
        Ok(Self {
            root: Mutex::new(conn),
        })
    }

    fn root(&self) -> Result<MutexGuard<'_, DuckDbConnection>> {
        self.root
            .lock()
            .map_err(|_| InsightsError::Internal("DuckDB root connection lock poisoned".into()))
    }

    /// A new connection to the same database.
    ///
    /// The root lock is held only while cloning.
    pub fn cursor(&self) -> Result<DuckDbConnection> {
        Ok(self.root()?.try_clone()?)
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        tracing::debug!(sql, params = params.len(), "executing query");
        let cursor = self.cursor()?;
        let mut stmt = cursor.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has run
        let (column_names, column_count) = match rows_result.as_ref() {
            Some(executed) => (
                executed
                    .column_names()
                    .into_iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<String>>(),
                executed.column_count(),
            ),
            None => return Ok(Vec::new()),
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_count);
            for (i, col_name) in column_names.iter().enumerate().take(column_count) {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(&self, sql: &str, params: &[SqlParam]) -> Result<Option<serde_json::Value>> {
        tracing::debug!(sql, params = params.len(), "executing scalar query");
        let cursor = self.cursor()?;
        let mut stmt = cursor.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Total number of stored records.
    pub fn count_all(&self) -> Result<u64> {
        let (sql, params) = SqlBuilder::new(TRANSACTIONS_TABLE)
            .select(&["COUNT(*)"])
            .build();
        self.scalar_u64(&sql, &params)
    }

    fn scalar_u64(&self, sql: &str, params: &[SqlParam]) -> Result<u64> {
        Ok(self
            .execute_scalar(sql, params)?
            .and_then(|v| v.as_u64())
            .unwrap_or(0))
    }

    fn criteria_query(criteria: &Criteria, cols: &[&str]) -> SqlBuilder {
        let mut qb = SqlBuilder::new(TRANSACTIONS_TABLE);
        qb.select(cols);
        criteria.apply(&mut qb);
        qb
    }
}

impl RecordStore for Connection {
    fn count(&self, criteria: &Criteria) -> Result<u64> {
        let (sql, params) = Self::criteria_query(criteria, &["COUNT(*) AS n"]).build();
        self.scalar_u64(&sql, &params)
    }

    fn sum_price(&self, criteria: &Criteria) -> Result<f64> {
        let (sql, params) =
            Self::criteria_query(criteria, &["COALESCE(SUM(price), 0.0) AS total"]).build();
        Ok(self
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0))
    }

    fn count_by_category(&self, criteria: &Criteria) -> Result<Vec<CategoryCount>> {
        let (sql, params) = Self::criteria_query(criteria, &["category", "COUNT(*) AS count"])
            .group_by(&["category"])
            .build();
        self.execute_into(&sql, &params)
    }

    fn find(&self, criteria: &Criteria, skip: usize, limit: usize) -> Result<Vec<TransactionRecord>> {
        let (sql, params) = Self::criteria_query(criteria, &RECORD_COLUMNS)
            .limit(clamp_rows(limit))
            .offset(clamp_rows(skip))
            .build();
        self.execute_into(&sql, &params)
    }

    fn replace_all(&self, records: &[TransactionRecord]) -> Result<usize> {
        let mut cursor = self.cursor()?;
        let tx = cursor.transaction()?;
        tx.execute(&format!("DELETE FROM {}", TRANSACTIONS_TABLE), [])?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} \
                 (id, title, description, category, price, image, sold, date_of_sale) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, CAST(? AS TIMESTAMP))",
                TRANSACTIONS_TABLE
            ))?;
            for record in records {
                let sold_at = record
                    .date_of_sale
                    .naive_utc()
                    .format("%Y-%m-%d %H:%M:%S%.6f")
                    .to_string();
                stmt.execute(params![
                    record.id,
                    record.title,
                    record.description,
                    record.category,
                    record.price,
                    record.image,
                    record.sold,
                    sold_at,
                ])?;
            }
        }
        tx.commit()?;
        tracing::info!(count = records.len(), table = TRANSACTIONS_TABLE, "replaced records");
        Ok(records.len())
    }
}

fn clamp_rows(n: usize) -> usize {
    n.min(usize::try_from(MAX_ROW_BOUND).unwrap_or(usize::MAX))
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; fall back to a string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        // Timestamps are selected through strftime; other types are not stored
        _ => serde_json::Value::Null,
    }
}
