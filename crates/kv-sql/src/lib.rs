//! SQL backend for the pair store.
//!
//! This crate provides a [`Connection`] implementation over a
//! [`sqlx::AnyPool`], storing pairs in a single two-column table
//! `(key, value)` of byte strings.
//!
//! # Supported Databases
//!
//! - **SQLite** (feature `sqlite`, default): Lightweight backend for testing
//!   and single-binary deployments. Requires SQLite 3.24 or later.
//! - **PostgreSQL** (feature `postgres`): Production-ready backend using
//!   connection pooling.
//! - **MySQL** (feature `mysql`): MySQL or MariaDB. Keys are limited to
//!   255 bytes by the `VARBINARY` key column.
//!
//! # Feature Flags
//!
//! - **`sqlite`**, **`postgres`**, **`mysql`**: Enable the matching driver.
//! - **`test-utils`**: Enables the SQLite backend and propagates
//!   `pairs-kv/test-utils` for conformance testing.
//!
//! [`Connection`]: pairs_kv::Connection

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::SqlError;

#[cfg(any(feature = "sqlite", feature = "postgres", feature = "mysql"))]
mod convert;

#[cfg(any(feature = "sqlite", feature = "postgres", feature = "mysql"))]
mod backend;
#[cfg(any(feature = "sqlite", feature = "postgres", feature = "mysql"))]
pub use backend::SqlConnection;

#[cfg(any(feature = "sqlite", feature = "postgres", feature = "mysql"))]
mod connector;
#[cfg(any(feature = "sqlite", feature = "postgres", feature = "mysql"))]
pub use connector::{ENV_SQL_URL, ENV_TABLE, SqlConnector, SqlConnectorError};
