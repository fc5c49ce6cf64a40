//! Store configuration.

/// Default table name.
pub const DEFAULT_TABLE: &str = "pairs";

/// Default number of keys per batch-get statement.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Default cap on items returned by a range scan.
pub const DEFAULT_LIMIT: usize = 50_000;

/// Default number of decoded items between cooperative yields.
pub const DEFAULT_YIELD_EVERY: usize = 250;

/// Configuration for a [`PairStore`](crate::PairStore).
///
/// # Example
///
/// ```
/// use pairs_kv::StoreConfig;
///
/// let config = StoreConfig::new().with_table("sessions").with_batch_size(100);
/// assert_eq!(config.table, "sessions");
/// assert_eq!(config.default_limit, 50_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Name of the backing table.
    pub table: String,
    /// Keys per batch-get statement. Must be non-zero.
    pub batch_size: usize,
    /// Range scan limit used when the selector sets none.
    pub default_limit: usize,
    /// Yield to the runtime every this many decoded items. `None` disables
    /// yielding.
    pub yield_every: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_owned(),
            batch_size: DEFAULT_BATCH_SIZE,
            default_limit: DEFAULT_LIMIT,
            yield_every: Some(DEFAULT_YIELD_EVERY),
        }
    }
}

impl StoreConfig {
    /// The default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the batch size.
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the default range limit.
    pub const fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }

    /// Set the yield interval.
    pub const fn with_yield_every(mut self, yield_every: Option<usize>) -> Self {
        self.yield_every = yield_every;
        self
    }
}
