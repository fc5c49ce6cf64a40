use crate::SqlValue;

/// A result row, as column name and value pairs in select order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    /// Create an empty row.
    pub const fn new() -> Self {
        Self { columns: Vec::new() }
    }

    /// Append a column, builder style.
    pub fn with(mut self, name: impl Into<String>, value: SqlValue) -> Self {
        self.push(name, value);
        self
    }

    /// Append a column.
    pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
        self.columns.push((name.into(), value));
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Look up a blob column by name.
    pub fn blob(&self, name: &str) -> Option<&[u8]> {
        self.get(name).and_then(SqlValue::as_blob)
    }

    /// Look up an integer column by name.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(SqlValue::as_integer)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The outcome of executing a [`Statement`](crate::Statement).
///
/// Row-returning statements fill `rows`; mutations report `affected_rows`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutput {
    /// Returned rows, in the order the database produced them.
    pub rows: Vec<Row>,
    /// Number of rows changed by a mutation.
    pub affected_rows: u64,
}

impl QueryOutput {
    /// Output of a row-returning statement.
    pub const fn rows(rows: Vec<Row>) -> Self {
        Self { rows, affected_rows: 0 }
    }

    /// Output of a mutation.
    pub const fn affected(affected_rows: u64) -> Self {
        Self { rows: Vec::new(), affected_rows }
    }
}
