//! SQL pair store connector.

use crate::{SqlConnection, SqlError};
use pairs_kv::{Connect, KeyCodec, PairStore, StoreConfig, StoreError, ValueCodec};
use std::env;

/// Environment variable name for the SQL connection URL.
pub const ENV_SQL_URL: &str = "PAIRS_SQL_URL";

/// Environment variable name for the table name.
pub const ENV_TABLE: &str = "PAIRS_TABLE";

/// Errors that can occur when initializing SQL connectors.
#[derive(Debug, thiserror::Error)]
pub enum SqlConnectorError {
    /// Missing environment variable.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Connecting to the database failed.
    #[error("sql connection failed: {0}")]
    Connect(#[from] SqlError),

    /// The store configuration was rejected.
    #[error("store initialization failed: {0}")]
    Store(#[from] StoreError),
}

/// Connector for SQL pair stores (SQLite, PostgreSQL or MySQL).
///
/// Automatically detects the database type from the URL:
/// - URLs starting with `postgres://` or `postgresql://` use PostgreSQL
/// - URLs starting with `sqlite:` use SQLite
/// - URLs starting with `mysql://` use MySQL
///
/// # Example
///
/// ```ignore
/// use pairs_kv_sql::SqlConnector;
///
/// let store = SqlConnector::new("sqlite::memory:")
///     .with_table("sessions")
///     .open::<String, String>()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqlConnector {
    url: String,
    config: StoreConfig,
}

impl SqlConnector {
    /// Create a new SQL connector with the default store configuration.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), config: StoreConfig::default() }
    }

    /// Set the table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.config.table = table.into();
        self
    }

    /// Replace the store configuration.
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Get a reference to the connection URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get a reference to the store configuration.
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Create a connector from environment variables.
    ///
    /// Reads the URL from `PAIRS_SQL_URL` and, if set, the table name from
    /// `PAIRS_TABLE`.
    ///
    /// # Errors
    ///
    /// Returns [`SqlConnectorError::MissingEnvVar`] if `PAIRS_SQL_URL` is not
    /// set.
    pub fn from_env() -> Result<Self, SqlConnectorError> {
        let url = env::var(ENV_SQL_URL).map_err(|_| SqlConnectorError::MissingEnvVar(ENV_SQL_URL))?;
        let connector = Self::new(url);
        Ok(match env::var(ENV_TABLE) {
            Ok(table) => connector.with_table(table),
            Err(_) => connector,
        })
    }

    /// Connect and build a store with the connector's configuration.
    ///
    /// The table is created on the store's first operation.
    pub async fn open<K: KeyCodec, V: ValueCodec>(
        &self,
    ) -> Result<PairStore<SqlConnection, K, V>, SqlConnectorError> {
        let conn = self.connect().await?;
        Ok(PairStore::new(conn, self.config.clone())?)
    }
}

impl Connect for SqlConnector {
    type Conn = SqlConnection;
    type Error = SqlError;

    async fn connect(&self) -> Result<Self::Conn, Self::Error> {
        SqlConnection::connect(&self.url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_reads_url_and_table() {
        unsafe {
            env::set_var(ENV_SQL_URL, "sqlite::memory:");
            env::set_var(ENV_TABLE, "sessions");
        }
        let connector = SqlConnector::from_env().unwrap();
        assert_eq!(connector.url(), "sqlite::memory:");
        assert_eq!(connector.config().table, "sessions");

        unsafe {
            env::remove_var(ENV_TABLE);
        }
        let connector = SqlConnector::from_env().unwrap();
        assert_eq!(connector.config().table, "pairs");

        unsafe {
            env::remove_var(ENV_SQL_URL);
        }
        assert!(matches!(
            SqlConnector::from_env(),
            Err(SqlConnectorError::MissingEnvVar(ENV_SQL_URL))
        ));
    }

    #[tokio::test]
    async fn open_rejects_bad_table() {
        let err = SqlConnector::new("sqlite::memory:")
            .with_table("no spaces")
            .open::<String, String>()
            .await
            .unwrap_err();
        assert!(matches!(err, SqlConnectorError::Store(StoreError::InvalidArgument(_))));
    }
}
