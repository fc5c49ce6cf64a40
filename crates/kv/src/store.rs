//! The pair store: typed key-value operations over a [`Connection`].

use crate::{
    COL_COUNT, COL_KEY, COL_VALUE, Connection, ConnectionError, DelOptions, GetManyOptions,
    GetOptions, Item, KeyCodec, KeySelector, PutMode, PutOptions, QueryOutput, Row, Statement,
    Statements, StoreConfig, StoreError, StoreResult, ValueCodec, respire::Respirator,
};
use std::{collections::HashMap, fmt, marker::PhantomData, sync::Arc};
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

/// An ordered key-value store backed by a two-column SQL table.
///
/// Keys are encoded with [`KeyCodec`] so that byte order matches key order,
/// which lets range selectors run as `BETWEEN` scans. Values are encoded
/// with [`ValueCodec`].
///
/// The table is created lazily before the first statement. Clones share the
/// connection and the initialization state.
///
/// # Example
///
/// ```ignore
/// use pairs_kv::{GetOptions, KeySelector, PairStore, PutOptions, StoreConfig};
///
/// let store: PairStore<_, String, String> = PairStore::new(conn, StoreConfig::default())?;
/// store.put("a".into(), "1".into(), PutOptions::default()).await?;
/// let value = store.get("a".into(), GetOptions::default()).await?;
/// let items = store.get_range(KeySelector::new().prefix("a".into())).await?;
/// ```
pub struct PairStore<C, K, V> {
    conn: C,
    statements: Statements,
    config: StoreConfig,
    initialized: Arc<OnceCell<()>>,
    _types: PhantomData<fn() -> (K, V)>,
}

impl<C: Clone, K, V> Clone for PairStore<C, K, V> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            statements: self.statements.clone(),
            config: self.config.clone(),
            initialized: Arc::clone(&self.initialized),
            _types: PhantomData,
        }
    }
}

impl<C, K, V> fmt::Debug for PairStore<C, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairStore")
            .field("table", &self.config.table)
            .field("dialect", &self.statements.dialect())
            .field("initialized", &self.initialized.initialized())
            .finish_non_exhaustive()
    }
}

impl<C, K, V> PairStore<C, K, V>
where
    C: Connection,
    K: KeyCodec,
    V: ValueCodec,
{
    /// Create a store over `conn`.
    ///
    /// No statement is executed until the first operation.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidArgument`] if the table name is not a plain
    /// identifier or the batch size is zero.
    pub fn new(conn: C, config: StoreConfig) -> StoreResult<Self> {
        if config.batch_size == 0 {
            return Err(StoreError::InvalidArgument("batch size must be non-zero".to_owned()));
        }
        let statements = Statements::new(conn.dialect(), &config.table)?;
        Ok(Self {
            conn,
            statements,
            config,
            initialized: Arc::new(OnceCell::new()),
            _types: PhantomData,
        })
    }

    /// The underlying connection.
    pub const fn connection(&self) -> &C {
        &self.conn
    }

    /// The store configuration.
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Create the table if needed. Runs at most once per store and its
    /// clones; every operation calls this first.
    pub async fn initialize(&self) -> StoreResult<()> {
        Ok(self.ensure_table().await?)
    }

    async fn ensure_table(&self) -> Result<(), ConnectionError> {
        self.initialized
            .get_or_try_init(|| async {
                debug!(table = %self.config.table, "initializing table");
                self.conn.initialize(&self.config.table).await
            })
            .await
            .map(|_| ())
    }

    async fn run(&self, statement: &Statement) -> Result<QueryOutput, ConnectionError> {
        self.ensure_table().await?;
        self.conn.query(statement).await
    }

    /// Fetch the value stored under `key`.
    ///
    /// Returns `None` for a missing key unless `error_if_missing` is set, in
    /// which case [`StoreError::NotFound`] is returned.
    #[instrument(skip_all, fields(table = %self.config.table))]
    pub async fn get(&self, key: K, options: GetOptions) -> StoreResult<Option<V>> {
        let key = key.normalize_key();
        let statement = self.statements.point_get(key.encoded_key()?);
        let output = self.run(&statement).await?;

        match output.rows.first() {
            Some(row) => Ok(Some(V::decode_value(required_blob(row, COL_VALUE)?)?)),
            None if options.error_if_missing => Err(StoreError::NotFound(format!("{key:?}"))),
            None => Ok(None),
        }
    }

    /// Write `value` under `key`.
    ///
    /// See [`PutOptions`] for how existing and missing keys are handled.
    #[instrument(skip_all, fields(table = %self.config.table))]
    pub async fn put(&self, key: K, value: V, options: PutOptions) -> StoreResult<()> {
        let key = key.normalize_key();
        let encoded = key.encoded_key()?;
        let raw = value.encode_value()?;

        let mode = options.mode();
        let statement = match mode {
            PutMode::Insert => self.statements.insert(encoded, raw),
            PutMode::Upsert => self.statements.upsert(encoded, raw),
            PutMode::Update => self.statements.update(encoded, raw),
        };
        let output = self.run(&statement).await.map_err(|err| match err {
            ConnectionError::UniqueViolation(_) => StoreError::AlreadyExists(format!("{key:?}")),
            other => other.into(),
        })?;

        if mode == PutMode::Update && output.affected_rows == 0 {
            return Err(StoreError::NotFound(format!("{key:?}")));
        }
        Ok(())
    }

    /// Delete `key`, returning whether a pair was removed.
    #[instrument(skip_all, fields(table = %self.config.table))]
    pub async fn del(&self, key: K, options: DelOptions) -> StoreResult<bool> {
        let key = key.normalize_key();
        let statement = self.statements.point_delete(key.encoded_key()?);
        let deleted = self.run(&statement).await?.affected_rows > 0;

        if !deleted && options.error_if_missing {
            return Err(StoreError::NotFound(format!("{key:?}")));
        }
        Ok(deleted)
    }

    /// Fetch many keys at once.
    ///
    /// Keys are looked up in chunks of [`StoreConfig::batch_size`]. The
    /// returned items follow the request order and contain only keys that
    /// were found; a key requested twice is returned twice.
    ///
    /// # Errors
    ///
    /// [`StoreError::PartialNotFound`] if any key is missing and
    /// `error_if_missing` is set.
    #[instrument(skip_all, fields(table = %self.config.table))]
    pub async fn get_many<I>(
        &self,
        keys: I,
        options: GetManyOptions,
    ) -> StoreResult<Vec<Item<K, V>>>
    where
        I: IntoIterator<Item = K>,
    {
        let keys: Vec<K> = keys.into_iter().map(KeyCodec::normalize_key).collect();
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let encoded = keys.iter().map(KeyCodec::encoded_key).collect::<Result<Vec<_>, _>>()?;

        let mut found: HashMap<Vec<u8>, Option<Vec<u8>>> = HashMap::with_capacity(encoded.len());
        for chunk in encoded.chunks(self.config.batch_size) {
            debug!(keys = chunk.len(), "dispatching batch get");
            let statement = self.statements.batch_get(chunk.to_vec(), options.return_values);
            for row in self.run(&statement).await?.rows {
                let key = required_blob(&row, COL_KEY)?.to_vec();
                let value = if options.return_values {
                    Some(required_blob(&row, COL_VALUE)?.to_vec())
                } else {
                    None
                };
                found.insert(key, value);
            }
        }

        let requested = keys.len();
        let mut respirator = Respirator::new(self.config.yield_every);
        let mut items = Vec::with_capacity(requested);
        let mut missing = Vec::new();
        for (key, encoded) in keys.into_iter().zip(&encoded) {
            match found.get(encoded) {
                Some(raw) => {
                    let value = raw.as_deref().map(V::decode_value).transpose()?;
                    items.push(Item::new(key, value));
                }
                None => missing.push(format!("{key:?}")),
            }
            respirator.breathe().await;
        }
        debug!(requested, found = items.len(), "batch get complete");

        if !missing.is_empty() && options.error_if_missing {
            return Err(StoreError::PartialNotFound { requested, missing });
        }
        Ok(items)
    }

    /// Scan the keys selected by `selector`, in key order.
    ///
    /// At most the selector's limit, or [`StoreConfig::default_limit`], items
    /// are returned. A row that fails to decode aborts the scan.
    #[instrument(skip_all, fields(table = %self.config.table))]
    pub async fn get_range(&self, selector: KeySelector<K>) -> StoreResult<Vec<Item<K, V>>> {
        let range = selector.normalize()?;
        let limit = range.limit.unwrap_or(self.config.default_limit);
        let statement =
            self.statements.range_scan(&range, i64::try_from(limit).unwrap_or(i64::MAX));
        let rows = self.run(&statement).await?.rows;
        debug!(rows = rows.len(), limit, reverse = range.reverse, "range scan complete");

        let mut respirator = Respirator::new(self.config.yield_every);
        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let key = K::decode_key(required_blob(row, COL_KEY)?)?;
            let value = if range.return_values {
                Some(V::decode_value(required_blob(row, COL_VALUE)?)?)
            } else {
                None
            };
            items.push(Item::new(key, value));
            respirator.breathe().await;
        }
        Ok(items)
    }

    /// Count the keys selected by `selector`. Limit and order are ignored.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidResult`] unless the backend returns exactly one
    /// row with a non-negative integer count.
    #[instrument(skip_all, fields(table = %self.config.table))]
    pub async fn get_count(&self, selector: KeySelector<K>) -> StoreResult<u64> {
        let range = selector.normalize()?;
        let rows = self.run(&self.statements.range_count(&range)).await?.rows;

        let [row] = rows.as_slice() else {
            return Err(StoreError::InvalidResult(format!(
                "expected exactly one count row, got {}",
                rows.len()
            )));
        };
        let count = row.integer(COL_COUNT).ok_or_else(|| {
            StoreError::InvalidResult(format!("missing integer column {COL_COUNT:?}"))
        })?;
        u64::try_from(count)
            .map_err(|_| StoreError::InvalidResult(format!("negative count: {count}")))
    }

    /// Delete the keys selected by `selector`, returning how many were
    /// removed. Limit and order are ignored.
    #[instrument(skip_all, fields(table = %self.config.table))]
    pub async fn del_range(&self, selector: KeySelector<K>) -> StoreResult<u64> {
        let range = selector.normalize()?;
        let deleted = self.run(&self.statements.range_delete(&range)).await?.affected_rows;
        debug!(deleted, "range delete complete");
        Ok(deleted)
    }
}

fn required_blob<'a>(row: &'a Row, column: &str) -> StoreResult<&'a [u8]> {
    row.blob(column)
        .ok_or_else(|| StoreError::InvalidResult(format!("missing blob column {column:?}")))
}
