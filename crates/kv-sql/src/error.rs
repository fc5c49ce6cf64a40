//! Error types for the SQL connection.

use pairs_kv::ConnectionError;

/// Errors that can occur in SQL connection operations.
#[derive(Debug, thiserror::Error)]
pub enum SqlError {
    /// A sqlx database error occurred.
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// The pool is connected to a database the store has no dialect for.
    #[error("unsupported database backend: {0}")]
    UnsupportedBackend(String),
}

impl SqlError {
    /// True if the error is a violation of a unique or primary key
    /// constraint.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::Sqlx(sqlx::Error::Database(db)) if db.is_unique_violation())
    }
}

impl From<SqlError> for ConnectionError {
    fn from(error: SqlError) -> Self {
        if error.is_unique_violation() {
            Self::UniqueViolation(error.to_string())
        } else {
            Self::Backend(Box::new(error))
        }
    }
}
