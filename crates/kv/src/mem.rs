//! In-memory connection for testing.
//!
//! [`MemConnection`] interprets each statement's [`Shape`] and parameters
//! against a [`BTreeMap`], which orders keys bytewise exactly as the SQL
//! backends order blobs. It is primarily intended for testing and
//! development.

use crate::{
    COL_COUNT, COL_KEY, COL_VALUE, Connection, ConnectionError, Dialect, QueryOutput, Row, Shape,
    SqlValue, Statement,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Bound,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::sync::RwLock;

type Table = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory connection holding a single table.
///
/// Clones share the same table. All operations are protected by an async
/// read-write lock.
#[derive(Clone, Default)]
pub struct MemConnection {
    table: Arc<RwLock<Table>>,
    queries: Arc<AtomicUsize>,
}

impl MemConnection {
    /// Create a new empty connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of statements executed so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    /// Number of pairs currently stored.
    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    /// True if no pairs are stored.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.is_empty()
    }
}

impl std::fmt::Debug for MemConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemConnection").field("queries", &self.queries()).finish_non_exhaustive()
    }
}

fn param(statement: &Statement, index: usize) -> Result<&SqlValue, ConnectionError> {
    statement.params().get(index).ok_or_else(|| {
        ConnectionError::Backend(
            format!("{} statement is missing parameter {index}", statement.shape().name()).into(),
        )
    })
}

fn blob(statement: &Statement, index: usize) -> Result<Vec<u8>, ConnectionError> {
    param(statement, index)?.as_blob().map(<[u8]>::to_vec).ok_or_else(|| {
        ConnectionError::Backend(format!("parameter {index} is not a blob").into())
    })
}

fn key_row(key: &[u8], value: Option<&[u8]>) -> Row {
    let row = Row::new().with(COL_KEY, SqlValue::Blob(key.to_vec()));
    match value {
        Some(value) => row.with(COL_VALUE, SqlValue::Blob(value.to_vec())),
        None => row,
    }
}

type Span = (Bound<Vec<u8>>, Bound<Vec<u8>>);

/// Inclusive `[start, end]` bounds, or `None` if `start > end`.
fn bounds(statement: &Statement) -> Result<Option<Span>, ConnectionError> {
    let start = blob(statement, 0)?;
    let end = blob(statement, 1)?;
    if start > end {
        return Ok(None);
    }
    Ok(Some((Bound::Included(start), Bound::Included(end))))
}

impl Connection for MemConnection {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn initialize(&self, _table: &str) -> Result<(), ConnectionError> {
        Ok(())
    }

    async fn query(&self, statement: &Statement) -> Result<QueryOutput, ConnectionError> {
        self.queries.fetch_add(1, Ordering::Relaxed);

        match statement.shape() {
            Shape::PointGet => {
                let key = blob(statement, 0)?;
                let table = self.table.read().await;
                let rows = table
                    .get(&key)
                    .map(|v| Row::new().with(COL_VALUE, SqlValue::Blob(v.clone())))
                    .into_iter()
                    .collect();
                Ok(QueryOutput::rows(rows))
            }
            Shape::Insert => {
                let (key, value) = (blob(statement, 0)?, blob(statement, 1)?);
                let mut table = self.table.write().await;
                if table.contains_key(&key) {
                    return Err(ConnectionError::UniqueViolation(format!("duplicate key {key:?}")));
                }
                table.insert(key, value);
                Ok(QueryOutput::affected(1))
            }
            Shape::Upsert => {
                let (key, value) = (blob(statement, 0)?, blob(statement, 1)?);
                self.table.write().await.insert(key, value);
                Ok(QueryOutput::affected(1))
            }
            Shape::Update => {
                let (value, key) = (blob(statement, 0)?, blob(statement, 1)?);
                let mut table = self.table.write().await;
                Ok(QueryOutput::affected(match table.get_mut(&key) {
                    Some(slot) => {
                        *slot = value;
                        1
                    }
                    None => 0,
                }))
            }
            Shape::PointDelete => {
                let key = blob(statement, 0)?;
                let removed = self.table.write().await.remove(&key).is_some();
                Ok(QueryOutput::affected(u64::from(removed)))
            }
            Shape::BatchGet { values } => {
                let keys = (0..statement.params().len())
                    .map(|i| blob(statement, i))
                    .collect::<Result<BTreeSet<_>, _>>()?;
                let table = self.table.read().await;
                let rows = keys
                    .iter()
                    .filter_map(|k| table.get_key_value(k))
                    .map(|(k, v)| key_row(k, values.then_some(v.as_slice())))
                    .collect();
                Ok(QueryOutput::rows(rows))
            }
            Shape::RangeScan { values, reverse } => {
                let limit = param(statement, 2)?.as_integer().ok_or_else(|| {
                    ConnectionError::Backend("limit parameter is not an integer".into())
                })?;
                let limit = usize::try_from(limit).unwrap_or(0);
                let Some(range) = bounds(statement)? else {
                    return Ok(QueryOutput::default());
                };
                let table = self.table.read().await;
                let iter = table.range(range);
                let row =
                    |(k, v): (&Vec<u8>, &Vec<u8>)| key_row(k, values.then_some(v.as_slice()));
                let rows = if reverse {
                    iter.rev().take(limit).map(row).collect()
                } else {
                    iter.take(limit).map(row).collect()
                };
                Ok(QueryOutput::rows(rows))
            }
            Shape::RangeCount => {
                let count = match bounds(statement)? {
                    Some(range) => self.table.read().await.range(range).count(),
                    None => 0,
                };
                let count = i64::try_from(count).unwrap_or(i64::MAX);
                Ok(QueryOutput::rows(vec![Row::new().with(COL_COUNT, SqlValue::Integer(count))]))
            }
            Shape::RangeDelete => {
                let Some(range) = bounds(statement)? else {
                    return Ok(QueryOutput::affected(0));
                };
                let mut table = self.table.write().await;
                let doomed: Vec<_> = table.range(range).map(|(k, _)| k.clone()).collect();
                for key in &doomed {
                    table.remove(key);
                }
                Ok(QueryOutput::affected(doomed.len() as u64))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        KeySelector, MAX_KEY_SIZE, PairStore, PutOptions, StoreConfig, Statements,
        conformance::conformance,
    };

    #[tokio::test]
    async fn mem_connection_conformance() {
        let store = PairStore::new(MemConnection::new(), StoreConfig::default()).unwrap();
        conformance(&store).await.unwrap();
    }

    #[tokio::test]
    async fn small_batches_without_yielding() {
        let config = StoreConfig::new().with_batch_size(7).with_yield_every(None);
        let store = PairStore::new(MemConnection::new(), config).unwrap();
        conformance(&store).await.unwrap();
    }

    fn statements() -> Statements {
        Statements::new(Dialect::Sqlite, "pairs").unwrap()
    }

    #[tokio::test]
    async fn insert_conflicts_on_existing_key() {
        let conn = MemConnection::new();
        let s = statements();
        conn.query(&s.insert(b"k".to_vec(), b"1".to_vec())).await.unwrap();
        let err = conn.query(&s.insert(b"k".to_vec(), b"2".to_vec())).await.unwrap_err();
        assert!(matches!(err, ConnectionError::UniqueViolation(_)));
        assert_eq!(conn.queries(), 2);
    }

    #[tokio::test]
    async fn inverted_range_matches_nothing() {
        let conn = MemConnection::new();
        let s = statements();
        conn.query(&s.upsert(Vec::new(), b"v".to_vec())).await.unwrap();
        let range = KeySelector::<String>::new().end_before(String::new()).normalize().unwrap();

        assert!(conn.query(&s.range_scan(&range, 10)).await.unwrap().rows.is_empty());
        let count = conn.query(&s.range_count(&range)).await.unwrap();
        assert_eq!(count.rows[0].integer(COL_COUNT), Some(0));
        assert_eq!(conn.query(&s.range_delete(&range)).await.unwrap().affected_rows, 0);
        assert_eq!(conn.len().await, 1);
    }

    #[tokio::test]
    async fn batch_get_returns_each_row_once() {
        let conn = MemConnection::new();
        let s = statements();
        conn.query(&s.upsert(b"a".to_vec(), b"1".to_vec())).await.unwrap();
        let keys = vec![b"a".to_vec(), b"a".to_vec()];
        let out = conn.query(&s.batch_get(keys, false)).await.unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].get(COL_VALUE), None);
    }

    #[tokio::test]
    async fn end_after_full_length_key_includes_next() {
        let store: PairStore<_, Vec<u8>, Vec<u8>> =
            PairStore::new(MemConnection::new(), StoreConfig::default()).unwrap();
        let full = vec![5u8; MAX_KEY_SIZE];
        let mut next = vec![5u8; MAX_KEY_SIZE - 1];
        next.push(6);
        let mut past = vec![5u8; MAX_KEY_SIZE - 1];
        past.push(7);
        for key in [&full, &next, &past] {
            store.put(key.clone(), b"v".to_vec(), PutOptions::default()).await.unwrap();
        }

        let items = store.get_range(KeySelector::new().end_after(full.clone())).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].key, next);

        let selector = KeySelector::new().start_after(full).return_values(false);
        assert_eq!(store.get_count(selector).await.unwrap(), 2);
    }
}
