//! Ordered key-value store over a two-column SQL table.
//!
//! This crate maps a typed, ordered key-value contract onto a single table
//! `pairs(key, value)`. Keys and values are stored as byte strings; keys are
//! encoded so that byte order matches key order, which lets range selectors
//! run as `BETWEEN … ORDER BY key` scans.
//!
//! - **Point operations**: get, put (insert, upsert or update), delete
//! - **Batch get** in chunks of bounded size, returned in request order
//! - **Range operations**: scan, count and delete over a [`KeySelector`]
//!
//! # Architecture
//!
//! - [`KeyCodec`] / [`ValueCodec`] encode typed keys and values
//! - [`KeySelector`] normalizes prefix and exclusive bounds into a closed
//!   encoded interval
//! - [`Statements`] builds dialect-specific SQL for every operation
//! - [`Connection`] is the backend interface that executes statements
//! - [`PairStore`] ties the above together
//!
//! # Example
//!
//! ```ignore
//! use pairs_kv::{GetOptions, KeySelector, PairStore, PutOptions, StoreConfig};
//!
//! let store: PairStore<_, String, String> = PairStore::new(conn, StoreConfig::default())?;
//! store.put("user:1".into(), "alice".into(), PutOptions::default()).await?;
//! let users = store.get_range(KeySelector::new().prefix("user:".into())).await?;
//! ```

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
pub use error::{CodecError, ConnectionError, StoreError, StoreResult};

mod codec;
pub use codec::{Json, KeyCodec, MAX_KEY_SIZE, ValueCodec};

mod config;
pub use config::{
    DEFAULT_BATCH_SIZE, DEFAULT_LIMIT, DEFAULT_TABLE, DEFAULT_YIELD_EVERY, StoreConfig,
};

mod connect;
pub use connect::Connect;

mod dialect;
pub use dialect::Dialect;

mod item;
pub use item::Item;

mod options;
pub use options::{DelOptions, GetManyOptions, GetOptions, PutMode, PutOptions};

mod respire;

mod row;
pub use row::{QueryOutput, Row};

mod selector;
pub use selector::{KeySelector, NormalizedRange};

mod statement;
pub use statement::{
    COL_COUNT, COL_KEY, COL_VALUE, MAX_TABLE_NAME_LEN, Shape, SqlValue, Statement, Statements,
    validate_table_name,
};

mod store;
pub use store::PairStore;

mod traits;
pub use traits::Connection;

/// Conformance tests for pair store backends.
#[cfg(any(test, feature = "test-utils"))]
pub mod conformance;

#[cfg(any(test, feature = "in-memory"))]
pub mod mem;
