//! Core trait definition for SQL connections.
//!
//! The [`Connection`] trait is the seam between the store and a database.
//! The store builds every [`Statement`] itself; a connection only has to
//! create the table and run statements, reporting rows or affected-row
//! counts.

use crate::{ConnectionError, Dialect, QueryOutput, Statement};
use std::{future::Future, sync::Arc};

/// A connection (or pool) able to run store statements.
///
/// # Contract
///
/// - [`Connection::initialize`] creates the two-column table if it does not
///   exist. It must be idempotent.
/// - [`Connection::query`] runs one statement. For statements whose
///   [`Shape::returns_rows`](crate::Shape::returns_rows) is true the output
///   carries the rows with columns named [`COL_KEY`](crate::COL_KEY),
///   [`COL_VALUE`](crate::COL_VALUE), or [`COL_COUNT`](crate::COL_COUNT);
///   otherwise it carries the affected-row count.
/// - Inserting an existing key must fail with
///   [`ConnectionError::UniqueViolation`].
pub trait Connection: Send + Sync + 'static {
    /// SQL dialect statements for this connection are built in.
    fn dialect(&self) -> Dialect;

    /// Create `table` if it does not exist.
    fn initialize(&self, table: &str) -> impl Future<Output = Result<(), ConnectionError>> + Send;

    /// Execute a single statement.
    fn query(
        &self,
        statement: &Statement,
    ) -> impl Future<Output = Result<QueryOutput, ConnectionError>> + Send;
}

impl<C: Connection> Connection for Arc<C> {
    fn dialect(&self) -> Dialect {
        C::dialect(self)
    }

    fn initialize(&self, table: &str) -> impl Future<Output = Result<(), ConnectionError>> + Send {
        C::initialize(self, table)
    }

    fn query(
        &self,
        statement: &Statement,
    ) -> impl Future<Output = Result<QueryOutput, ConnectionError>> + Send {
        C::query(self, statement)
    }
}
