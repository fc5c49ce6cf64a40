//! Unified SQL connection for the pair store.
//!
//! Supports SQLite, PostgreSQL and MySQL via [`sqlx::Any`]. The connection
//! auto-detects the database type at construction time and picks the
//! matching statement dialect and table migration.

use crate::{
    SqlError,
    convert::{bind, from_any_row},
};
use pairs_kv::{
    Connection, ConnectionError, Dialect, QueryOutput, Statement, validate_table_name,
};
use sqlx::{AnyPool, any::AnyPoolOptions};
use tracing::debug;

/// Placeholder for the quoted table name in migration templates.
const TABLE_PLACEHOLDER: &str = "{table}";

/// SQL-based pair store connection.
///
/// Uses [`sqlx::Any`] for database-agnostic access. The backend is
/// determined by the connection URL at construction time.
///
/// # Example
///
/// ```no_run
/// # async fn example() {
/// use pairs_kv_sql::SqlConnection;
///
/// // SQLite (in-memory)
/// let conn = SqlConnection::connect("sqlite::memory:").await.unwrap();
///
/// // PostgreSQL
/// let conn = SqlConnection::connect("postgres://localhost/pairs").await.unwrap();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SqlConnection {
    pool: AnyPool,
    dialect: Dialect,
}

impl SqlConnection {
    /// Create a new connection from an existing [`AnyPool`].
    ///
    /// Auto-detects the database backend. Callers must ensure
    /// [`sqlx::any::install_default_drivers`] has been called before
    /// constructing the pool.
    pub async fn new(pool: AnyPool) -> Result<Self, SqlError> {
        // Detect backend from a pooled connection.
        let conn = pool.acquire().await?;
        let backend = conn.backend_name().to_owned();
        drop(conn);

        let dialect =
            Dialect::from_backend_name(&backend).ok_or(SqlError::UnsupportedBackend(backend))?;
        debug!(%dialect, "connected to sql backend");
        Ok(Self { pool, dialect })
    }

    /// Connect to a database URL and create the connection.
    ///
    /// Installs the default sqlx drivers on the first call. The database
    /// type is inferred from the URL scheme (`sqlite:`, `postgres:` or
    /// `mysql:`).
    ///
    /// For SQLite in-memory databases, the pool is limited to one connection
    /// that is never recycled, so all operations share the same database.
    pub async fn connect(url: &str) -> Result<Self, SqlError> {
        sqlx::any::install_default_drivers();
        let options = if is_memory_url(url) {
            AnyPoolOptions::new().max_connections(1).idle_timeout(None).max_lifetime(None)
        } else {
            AnyPoolOptions::new()
        };
        let pool = options.connect(url).await?;
        Self::new(pool).await
    }

    /// The underlying pool.
    pub const fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Run the dialect's table migration for `table`.
    pub async fn migrate(&self, table: &str) -> Result<(), SqlError> {
        let template = match self.dialect {
            Dialect::Sqlite => include_str!("../migrations/001_pairs.sql"),
            Dialect::Postgres => include_str!("../migrations/001_pairs_pg.sql"),
            Dialect::MySql => include_str!("../migrations/001_pairs_mysql.sql"),
        };
        let migration = template.replace(TABLE_PLACEHOLDER, &self.dialect.quote_ident(table));
        // Execute via pool to ensure the migration uses the same
        // connection that subsequent queries will use.
        sqlx::raw_sql(&migration).execute(&self.pool).await?;
        debug!(table, "table migration applied");
        Ok(())
    }

    async fn execute(&self, statement: &Statement) -> Result<QueryOutput, SqlError> {
        let query = bind(statement);
        if statement.shape().returns_rows() {
            let rows = query.fetch_all(&self.pool).await?;
            let rows = rows.iter().map(from_any_row).collect::<Result<_, _>>()?;
            Ok(QueryOutput::rows(rows))
        } else {
            Ok(QueryOutput::affected(query.execute(&self.pool).await?.rows_affected()))
        }
    }
}

fn is_memory_url(url: &str) -> bool {
    url.starts_with("sqlite:") && (url.contains(":memory:") || url.contains("mode=memory"))
}

impl Connection for SqlConnection {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn initialize(&self, table: &str) -> Result<(), ConnectionError> {
        validate_table_name(table).map_err(ConnectionError::backend)?;
        Ok(self.migrate(table).await?)
    }

    async fn query(&self, statement: &Statement) -> Result<QueryOutput, ConnectionError> {
        Ok(self.execute(statement).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairs_kv::{
        COL_COUNT, COL_KEY, COL_VALUE, KeySelector, PairStore, SqlValue, StoreConfig, Statements,
        conformance::conformance,
    };

    #[tokio::test]
    async fn sqlite_conformance() {
        let conn = SqlConnection::connect("sqlite::memory:").await.unwrap();
        let store = PairStore::new(conn, StoreConfig::default()).unwrap();
        conformance(&store).await.unwrap();
    }

    #[tokio::test]
    async fn pg_conformance() {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("skipping pg conformance: DATABASE_URL not set");
            return;
        };
        let conn = SqlConnection::connect(&url).await.unwrap();
        let store = PairStore::new(conn, StoreConfig::default()).unwrap();
        conformance(&store).await.unwrap();
    }

    #[tokio::test]
    async fn detects_sqlite() {
        let conn = SqlConnection::connect("sqlite::memory:").await.unwrap();
        assert_eq!(conn.dialect(), Dialect::Sqlite);
    }

    #[tokio::test]
    async fn rows_converted_by_column_name() {
        let conn = SqlConnection::connect("sqlite::memory:").await.unwrap();
        conn.initialize("pairs").await.unwrap();
        // Idempotent.
        conn.initialize("pairs").await.unwrap();

        let s = Statements::new(Dialect::Sqlite, "pairs").unwrap();
        let put = conn.query(&s.insert(b"k".to_vec(), b"v".to_vec())).await.unwrap();
        assert_eq!(put.affected_rows, 1);

        let out = conn.query(&s.batch_get(vec![b"k".to_vec()], true)).await.unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].blob(COL_KEY), Some(&b"k"[..]));
        assert_eq!(out.rows[0].blob(COL_VALUE), Some(&b"v"[..]));

        let range = KeySelector::<Vec<u8>>::new().normalize().unwrap();
        let out = conn.query(&s.range_count(&range)).await.unwrap();
        assert_eq!(out.rows[0].get(COL_COUNT), Some(&SqlValue::Integer(1)));
    }

    #[tokio::test]
    async fn duplicate_insert_is_unique_violation() {
        let conn = SqlConnection::connect("sqlite::memory:").await.unwrap();
        conn.initialize("pairs").await.unwrap();
        let s = Statements::new(Dialect::Sqlite, "pairs").unwrap();
        conn.query(&s.insert(b"k".to_vec(), b"1".to_vec())).await.unwrap();
        let err = conn.query(&s.insert(b"k".to_vec(), b"2".to_vec())).await.unwrap_err();
        assert!(matches!(err, ConnectionError::UniqueViolation(_)));
    }

    #[test]
    fn memory_urls() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite:file:pairs?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite:///tmp/pairs.db"));
        assert!(!is_memory_url("postgres://localhost/pairs"));
    }
}
