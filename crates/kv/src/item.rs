/// A key and its value, as returned by batch gets and range scans.
///
/// `value` is `None` when the operation was asked not to return values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<K, V> {
    /// The decoded key.
    pub key: K,
    /// The decoded value, if requested.
    pub value: Option<V>,
}

impl<K, V> Item<K, V> {
    /// Create a new item.
    pub const fn new(key: K, value: Option<V>) -> Self {
        Self { key, value }
    }

    /// Split into key and value.
    pub fn into_parts(self) -> (K, Option<V>) {
        (self.key, self.value)
    }
}
