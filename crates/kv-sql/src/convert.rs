//! Conversion between store statements and sqlx queries and rows.
//!
//! Keys and values travel as BLOB parameters; limits and counts as 64-bit
//! integers. Result columns are converted by name: the count alias is read
//! as an integer, every other column as bytes.

use crate::SqlError;
use pairs_kv::{COL_COUNT, Row, SqlValue, Statement};
use sqlx::{
    Any, Column as _, Row as _,
    any::{AnyArguments, AnyRow},
    query::Query,
};

/// Build a sqlx query with the statement's parameters bound in order.
pub(crate) fn bind(statement: &Statement) -> Query<'_, Any, AnyArguments<'_>> {
    statement.params().iter().fold(sqlx::query(statement.sql()), |query, param| match param {
        SqlValue::Blob(bytes) => query.bind(bytes.as_slice()),
        SqlValue::Integer(int) => query.bind(*int),
    })
}

/// Convert a sqlx row into a store [`Row`].
pub(crate) fn from_any_row(row: &AnyRow) -> Result<Row, SqlError> {
    let mut out = Row::new();
    for column in row.columns() {
        let name = column.name();
        let value = if name == COL_COUNT {
            SqlValue::Integer(row.try_get::<i64, _>(column.ordinal())?)
        } else {
            SqlValue::Blob(row.try_get::<Vec<u8>, _>(column.ordinal())?)
        };
        out.push(name, value);
    }
    Ok(out)
}
