//! SQL statement construction.
//!
//! Every statement the store issues is produced here. A [`Statement`]
//! carries its SQL text, its positional parameters, and a [`Shape`] naming
//! what the statement does, so connections can tell row-returning
//! statements from mutations without parsing SQL.

use crate::{Dialect, NormalizedRange, StoreError, StoreResult};

/// Name of the key column.
pub const COL_KEY: &str = "key";

/// Name of the value column.
pub const COL_VALUE: &str = "value";

/// Alias of the aggregate column produced by range counts.
pub const COL_COUNT: &str = "count";

/// Maximum table name length accepted by [`Statements::new`].
pub const MAX_TABLE_NAME_LEN: usize = 63;

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// Encoded key or value bytes.
    Blob(Vec<u8>),
    /// Integer, used for limits and counts.
    Integer(i64),
}

impl SqlValue {
    /// The bytes, if this is a blob.
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(b) => Some(b),
            Self::Integer(_) => None,
        }
    }

    /// The integer, if this is an integer.
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Blob(_) => None,
        }
    }
}

/// What a statement does, with its parameter layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `SELECT value WHERE key = $1`. Params: key.
    PointGet,
    /// Plain insert, failing on an existing key. Params: key, value.
    Insert,
    /// Insert or overwrite. Params: key, value.
    Upsert,
    /// Overwrite an existing row only. Params: value, key.
    Update,
    /// `DELETE WHERE key = $1`. Params: key.
    PointDelete,
    /// `SELECT … WHERE key IN (…)`. Params: keys.
    BatchGet {
        /// The value column is selected.
        values: bool,
    },
    /// `SELECT … WHERE key BETWEEN $1 AND $2 ORDER BY key LIMIT $3`.
    /// Params: start, end, limit.
    RangeScan {
        /// The value column is selected.
        values: bool,
        /// Descending order.
        reverse: bool,
    },
    /// `SELECT COUNT(*) … WHERE key BETWEEN $1 AND $2`. Params: start, end.
    RangeCount,
    /// `DELETE WHERE key BETWEEN $1 AND $2`. Params: start, end.
    RangeDelete,
}

impl Shape {
    /// True if the statement produces rows rather than an affected-row count.
    pub const fn returns_rows(self) -> bool {
        matches!(
            self,
            Self::PointGet | Self::BatchGet { .. } | Self::RangeScan { .. } | Self::RangeCount
        )
    }

    /// Short name for logging.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PointGet => "point_get",
            Self::Insert => "insert",
            Self::Upsert => "upsert",
            Self::Update => "update",
            Self::PointDelete => "point_delete",
            Self::BatchGet { .. } => "batch_get",
            Self::RangeScan { .. } => "range_scan",
            Self::RangeCount => "range_count",
            Self::RangeDelete => "range_delete",
        }
    }
}

/// A statement ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    shape: Shape,
    sql: String,
    params: Vec<SqlValue>,
}

impl Statement {
    /// What the statement does.
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Positional parameters, in binding order.
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }
}

/// Check that `name` is safe to interpolate as a table identifier.
///
/// Accepts ASCII letters, digits and underscores, not starting with a
/// digit, up to [`MAX_TABLE_NAME_LEN`] bytes.
pub fn validate_table_name(name: &str) -> StoreResult<()> {
    let valid = !name.is_empty()
        && name.len() <= MAX_TABLE_NAME_LEN
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidArgument(format!("invalid table name: {name:?}")))
    }
}

/// Statement builder for one table in one dialect.
#[derive(Debug, Clone)]
pub struct Statements {
    dialect: Dialect,
    table: String,
    key: String,
    value: String,
    count: String,
}

impl Statements {
    /// Create a builder for `table`.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidArgument`] if the table name is not a plain
    /// identifier.
    pub fn new(dialect: Dialect, table: &str) -> StoreResult<Self> {
        validate_table_name(table)?;
        Ok(Self {
            dialect,
            table: dialect.quote_ident(table),
            key: dialect.quote_ident(COL_KEY),
            value: dialect.quote_ident(COL_VALUE),
            count: dialect.quote_ident(COL_COUNT),
        })
    }

    /// The dialect statements are built for.
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn p(&self, n: usize) -> String {
        self.dialect.placeholder(n)
    }

    fn columns(&self, values: bool) -> String {
        if values { format!("{}, {}", self.key, self.value) } else { self.key.clone() }
    }

    /// Look up the value stored under `key`.
    pub fn point_get(&self, key: Vec<u8>) -> Statement {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = {}",
            self.value,
            self.table,
            self.key,
            self.p(1)
        );
        Statement { shape: Shape::PointGet, sql, params: vec![SqlValue::Blob(key)] }
    }

    /// Insert a new pair; the key must not exist.
    pub fn insert(&self, key: Vec<u8>, value: Vec<u8>) -> Statement {
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES ({}, {})",
            self.table,
            self.key,
            self.value,
            self.p(1),
            self.p(2)
        );
        Statement {
            shape: Shape::Insert,
            sql,
            params: vec![SqlValue::Blob(key), SqlValue::Blob(value)],
        }
    }

    /// Insert a pair or overwrite the existing value.
    pub fn upsert(&self, key: Vec<u8>, value: Vec<u8>) -> Statement {
        let sql = match self.dialect {
            Dialect::Sqlite | Dialect::Postgres => format!(
                "INSERT INTO {table} ({k}, {v}) VALUES ({p1}, {p2}) \
                 ON CONFLICT ({k}) DO UPDATE SET {v} = excluded.{v}",
                table = self.table,
                k = self.key,
                v = self.value,
                p1 = self.p(1),
                p2 = self.p(2),
            ),
            Dialect::MySql => format!(
                "REPLACE INTO {} ({}, {}) VALUES ({}, {})",
                self.table,
                self.key,
                self.value,
                self.p(1),
                self.p(2)
            ),
        };
        Statement {
            shape: Shape::Upsert,
            sql,
            params: vec![SqlValue::Blob(key), SqlValue::Blob(value)],
        }
    }

    /// Overwrite the value of an existing key.
    pub fn update(&self, key: Vec<u8>, value: Vec<u8>) -> Statement {
        let sql = format!(
            "UPDATE {} SET {} = {} WHERE {} = {}",
            self.table,
            self.value,
            self.p(1),
            self.key,
            self.p(2)
        );
        Statement {
            shape: Shape::Update,
            sql,
            params: vec![SqlValue::Blob(value), SqlValue::Blob(key)],
        }
    }

    /// Delete the pair stored under `key`.
    pub fn point_delete(&self, key: Vec<u8>) -> Statement {
        let sql = format!("DELETE FROM {} WHERE {} = {}", self.table, self.key, self.p(1));
        Statement { shape: Shape::PointDelete, sql, params: vec![SqlValue::Blob(key)] }
    }

    /// Fetch every pair whose key is in `keys`.
    pub fn batch_get(&self, keys: Vec<Vec<u8>>, values: bool) -> Statement {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} IN ({})",
            self.columns(values),
            self.table,
            self.key,
            self.dialect.placeholders(1, keys.len())
        );
        let params = keys.into_iter().map(SqlValue::Blob).collect();
        Statement { shape: Shape::BatchGet { values }, sql, params }
    }

    /// Ordered scan over `range`, returning at most `limit` rows.
    pub fn range_scan(&self, range: &NormalizedRange, limit: i64) -> Statement {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} BETWEEN {} AND {} ORDER BY {}{} LIMIT {}",
            self.columns(range.return_values),
            self.table,
            self.key,
            self.p(1),
            self.p(2),
            self.key,
            if range.reverse { " DESC" } else { "" },
            self.p(3)
        );
        let params = vec![
            SqlValue::Blob(range.start.clone()),
            SqlValue::Blob(range.end.clone()),
            SqlValue::Integer(limit),
        ];
        Statement {
            shape: Shape::RangeScan { values: range.return_values, reverse: range.reverse },
            sql,
            params,
        }
    }

    /// Count the pairs in `range`.
    pub fn range_count(&self, range: &NormalizedRange) -> Statement {
        let sql = format!(
            "SELECT COUNT(*) AS {} FROM {} WHERE {} BETWEEN {} AND {}",
            self.count,
            self.table,
            self.key,
            self.p(1),
            self.p(2)
        );
        Statement { shape: Shape::RangeCount, sql, params: bounds(range) }
    }

    /// Delete every pair in `range`.
    pub fn range_delete(&self, range: &NormalizedRange) -> Statement {
        let sql = format!(
            "DELETE FROM {} WHERE {} BETWEEN {} AND {}",
            self.table,
            self.key,
            self.p(1),
            self.p(2)
        );
        Statement { shape: Shape::RangeDelete, sql, params: bounds(range) }
    }
}

fn bounds(range: &NormalizedRange) -> Vec<SqlValue> {
    vec![SqlValue::Blob(range.start.clone()), SqlValue::Blob(range.end.clone())]
}
