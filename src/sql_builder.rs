//! SQL builder with parameterized query construction.
//!
//! All user-supplied values go through DuckDB's parameter binding (`?` placeholders),
//! never through string interpolation. Parameters are typed ([`SqlParam`]) so that
//! numeric and boolean comparisons bind as numbers and booleans rather than text.
//!
//! # Example
//!
//! ```rust
//! use sales_insights::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("transactions")
//!     .select(&["category", "COUNT(*) AS count"])
//!     .where_eq("sold", true)
//!     .group_by(&["category"])
//!     .limit(10)
//!     .build();
//! ```

use duckdb::types::{ToSqlOutput, Value};
use duckdb::ToSql;

/// A bound query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        let value = match self {
            SqlParam::Text(s) => Value::Text(s.clone()),
            SqlParam::Int(n) => Value::BigInt(*n),
            SqlParam::Float(f) => Value::Double(*f),
            SqlParam::Bool(b) => Value::Boolean(*b),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        SqlParam::Text(s)
    }
}

impl From<i64> for SqlParam {
    fn from(n: i64) -> Self {
        SqlParam::Int(n)
    }
}

impl From<u32> for SqlParam {
    fn from(n: u32) -> Self {
        SqlParam::Int(i64::from(n))
    }
}

impl From<f64> for SqlParam {
    fn from(f: f64) -> Self {
        SqlParam::Float(f)
    }
}

impl From<bool> for SqlParam {
    fn from(b: bool) -> Self {
        SqlParam::Bool(b)
    }
}

/// Builds parameterized SQL queries safely.
///
/// Methods return `&mut Self` for chaining.
pub struct SqlBuilder {
    select_cols: Vec<String>,
    from_table: String,
    where_clauses: Vec<String>,
    params: Vec<SqlParam>,
    group_by_cols: Vec<String>,
    limit_val: Option<usize>,
    offset_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table or view.
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            from_table: table.to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            group_by_cols: Vec::new(),
            limit_val: None,
            offset_val: None,
        }
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add a WHERE condition with `?` placeholders for each param.
    ///
    /// Parameters are appended in order.
    pub fn where_clause<P: Into<SqlParam>>(&mut self, condition: &str, params: Vec<P>) -> &mut Self {
        self.where_clauses.push(condition.to_string());
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    /// Add an equality condition: `{column} = ?`.
    pub fn where_eq(&mut self, column: &str, value: impl Into<SqlParam>) -> &mut Self {
        self.where_clauses.push(format!("{} = ?", column));
        self.params.push(value.into());
        self
    }

    /// Add a strict greater-than condition: `{column} > ?`.
    pub fn where_gt(&mut self, column: &str, value: impl Into<SqlParam>) -> &mut Self {
        self.where_clauses.push(format!("{} > ?", column));
        self.params.push(value.into());
        self
    }

    /// Add a less-than-or-equal condition: `{column} <= ?`.
    pub fn where_lte(&mut self, column: &str, value: impl Into<SqlParam>) -> &mut Self {
        self.where_clauses.push(format!("{} <= ?", column));
        self.params.push(value.into());
        self
    }

    /// Add OR-combined conditions.
    ///
    /// Each condition is a `(sql_fragment, param_value)` tuple where the fragment
    /// uses `?` as a placeholder.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sales_insights::{SqlBuilder, SqlParam};
    /// let mut builder = SqlBuilder::new("transactions");
    /// builder.where_or(vec![
    ///     ("category = ?", SqlParam::from("jewelery")),
    ///     ("price = ?", SqlParam::from(10.0)),
    /// ]);
    /// // -> WHERE (category = ? OR price = ?)
    /// ```
    pub fn where_or(&mut self, conditions: Vec<(&str, SqlParam)>) -> &mut Self {
        if conditions.is_empty() {
            return self;
        }
        let mut or_parts = Vec::with_capacity(conditions.len());
        for (cond, param) in conditions {
            or_parts.push(cond.to_string());
            self.params.push(param);
        }
        self.where_clauses.push(format!("({})", or_parts.join(" OR ")));
        self
    }

    /// Add GROUP BY columns.
    pub fn group_by(&mut self, cols: &[&str]) -> &mut Self {
        self.group_by_cols.extend(cols.iter().map(|c| c.to_string()));
        self
    }

    /// Set the maximum number of rows to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Set the number of rows to skip before returning results.
    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset_val = Some(n);
        self
    }

    /// Build the final SQL string and parameter list.
    pub fn build(&self) -> (String, Vec<SqlParam>) {
        let mut parts = vec![
            format!("SELECT {}", self.select_cols.join(", ")),
            format!("FROM {}", self.from_table),
        ];

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.group_by_cols.is_empty() {
            parts.push(format!("GROUP BY {}", self.group_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        if let Some(n) = self.offset_val {
            parts.push(format!("OFFSET {}", n));
        }

        (parts.join("\n"), self.params.clone())
    }
}
