//! SQL dialects understood by the statement builder.

use crate::StoreError;
use std::{fmt, str::FromStr};

/// SQL dialect of the backing database.
///
/// The dialect decides identifier quoting, placeholder syntax, and the form
/// of the overwriting put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// SQLite 3.24 or later.
    Sqlite,
    /// PostgreSQL 9.5 or later.
    Postgres,
    /// MySQL or MariaDB.
    MySql,
}

impl Dialect {
    /// Map a driver backend name (as reported by `sqlx`) to a dialect.
    pub fn from_backend_name(name: &str) -> Option<Self> {
        match name {
            "SQLite" => Some(Self::Sqlite),
            "PostgreSQL" => Some(Self::Postgres),
            "MySQL" => Some(Self::MySql),
            _ => None,
        }
    }

    /// Quote an identifier. The identifier must already be validated.
    pub fn quote_ident(&self, ident: &str) -> String {
        match self {
            Self::Sqlite | Self::Postgres => format!("\"{ident}\""),
            Self::MySql => format!("`{ident}`"),
        }
    }

    /// Placeholder for the `n`th bound parameter, counting from 1.
    pub fn placeholder(&self, n: usize) -> String {
        match self {
            Self::Sqlite | Self::Postgres => format!("${n}"),
            Self::MySql => "?".to_owned(),
        }
    }

    /// Comma-separated placeholders for parameters `first..first + count`.
    pub fn placeholders(&self, first: usize, count: usize) -> String {
        (first..first + count).map(|n| self.placeholder(n)).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for Dialect {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" => Ok(Self::MySql),
            _ => Err(StoreError::InvalidArgument(format!(
                "invalid dialect: {s} (expected: sqlite, postgres, mysql)"
            ))),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Postgres => write!(f, "postgres"),
            Self::MySql => write!(f, "mysql"),
        }
    }
}
