//! Key selectors for range operations.
//!
//! A [`KeySelector`] describes a key range with any combination of a prefix,
//! one lower bound, and one upper bound, plus scan modifiers. The SQL layer
//! only understands a closed `BETWEEN start AND end`, so
//! [`KeySelector::normalize`] turns every exclusive or prefix bound into an
//! inclusive bound over encoded keys.
//!
//! | Selector       | Encoded bound                               |
//! |----------------|---------------------------------------------|
//! | `prefix`       | `[p, p ++ 0xFF…]` up to the key size cap    |
//! | `start`        | `k`                                         |
//! | `start_after`  | successor of `k` (empty if `k` is highest)  |
//! | `start_before` | predecessor of `k`                          |
//! | `end`          | `k`                                         |
//! | `end_before`   | predecessor of `k`                          |
//! | `end_after`    | successor of `k` (unbounded if highest)     |
//!
//! Unset bounds default to the empty key and `[0xFF; MAX_SIZE]`. A prefix
//! combined with explicit bounds yields the intersection of both ranges.

pub(crate) mod bounds;

use crate::{KeyCodec, StoreError, StoreResult};

/// A range of keys plus scan modifiers.
///
/// Built with chained setters:
///
/// ```
/// use pairs_kv::KeySelector;
///
/// let selector = KeySelector::<String>::new()
///     .start_after("b".to_owned())
///     .end_before("e".to_owned())
///     .reverse(true)
///     .limit(10);
/// let range = selector.normalize().unwrap();
/// assert_eq!(range.start, b"b\x00");
/// assert!(range.reverse);
/// ```
#[derive(Debug, Clone)]
pub struct KeySelector<K> {
    prefix: Option<K>,
    start: Option<K>,
    start_after: Option<K>,
    start_before: Option<K>,
    end: Option<K>,
    end_before: Option<K>,
    end_after: Option<K>,
    reverse: bool,
    limit: Option<usize>,
    return_values: bool,
}

impl<K> Default for KeySelector<K> {
    fn default() -> Self {
        Self {
            prefix: None,
            start: None,
            start_after: None,
            start_before: None,
            end: None,
            end_before: None,
            end_after: None,
            reverse: false,
            limit: None,
            return_values: true,
        }
    }
}

impl<K> KeySelector<K> {
    /// A selector covering the whole key space, ascending, with values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the range to keys sharing `prefix`.
    pub fn prefix(mut self, prefix: K) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Inclusive lower bound.
    pub fn start(mut self, key: K) -> Self {
        self.start = Some(key);
        self
    }

    /// Exclusive lower bound.
    pub fn start_after(mut self, key: K) -> Self {
        self.start_after = Some(key);
        self
    }

    /// Lower bound at the key immediately preceding `key`.
    pub fn start_before(mut self, key: K) -> Self {
        self.start_before = Some(key);
        self
    }

    /// Inclusive upper bound.
    pub fn end(mut self, key: K) -> Self {
        self.end = Some(key);
        self
    }

    /// Exclusive upper bound.
    pub fn end_before(mut self, key: K) -> Self {
        self.end_before = Some(key);
        self
    }

    /// Upper bound at the key immediately following `key`.
    pub fn end_after(mut self, key: K) -> Self {
        self.end_after = Some(key);
        self
    }

    /// Scan in descending key order.
    pub const fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Cap the number of returned items.
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether scans return values alongside keys. Defaults to `true`.
    pub const fn return_values(mut self, return_values: bool) -> Self {
        self.return_values = return_values;
        self
    }
}

impl<K: KeyCodec> KeySelector<K> {
    /// Resolve the selector into a closed interval over encoded keys.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidArgument`] if more than one lower bound or more
    ///   than one upper bound is set.
    /// - [`StoreError::Codec`] if a bound key fails to encode.
    pub fn normalize(&self) -> StoreResult<NormalizedRange> {
        let max = K::MAX_SIZE;
        let (mut start, mut end) = match &self.prefix {
            Some(prefix) => normalized(prefix).prefix_bounds()?,
            None => (Vec::new(), bounds::highest(max)),
        };

        match self.lower_bound()? {
            Some(Some(lower)) => start = start.max(lower),
            Some(None) => return Ok(NormalizedRange::empty(self)),
            None => {}
        }
        match self.upper_bound()? {
            Some(Some(upper)) => end = end.min(upper),
            Some(None) => return Ok(NormalizedRange::empty(self)),
            None => {}
        }

        Ok(NormalizedRange {
            start,
            end,
            reverse: self.reverse,
            limit: self.limit,
            return_values: self.return_values,
        })
    }

    /// `Some(None)` means the lower bound excludes every key.
    fn lower_bound(&self) -> StoreResult<Option<Option<Vec<u8>>>> {
        let bound = match (&self.start, &self.start_after, &self.start_before) {
            (None, None, None) => return Ok(None),
            (Some(key), None, None) => Some(encode(key)?),
            (None, Some(key), None) => bounds::successor(&encode(key)?, K::MAX_SIZE),
            (None, None, Some(key)) => {
                Some(bounds::predecessor(&encode(key)?, K::MAX_SIZE).unwrap_or_default())
            }
            _ => {
                return Err(StoreError::InvalidArgument(
                    "at most one of start, start_after, start_before may be set".to_owned(),
                ));
            }
        };
        Ok(Some(bound))
    }

    /// `Some(None)` means the upper bound excludes every key.
    fn upper_bound(&self) -> StoreResult<Option<Option<Vec<u8>>>> {
        let bound = match (&self.end, &self.end_before, &self.end_after) {
            (None, None, None) => return Ok(None),
            (Some(key), None, None) => Some(encode(key)?),
            (None, Some(key), None) => bounds::predecessor(&encode(key)?, K::MAX_SIZE),
            (None, None, Some(key)) => Some(
                bounds::successor(&encode(key)?, K::MAX_SIZE)
                    .unwrap_or_else(|| bounds::highest(K::MAX_SIZE)),
            ),
            _ => {
                return Err(StoreError::InvalidArgument(
                    "at most one of end, end_before, end_after may be set".to_owned(),
                ));
            }
        };
        Ok(Some(bound))
    }
}

/// Normalize a borrowed key without consuming the selector.
fn normalized<K: KeyCodec>(key: &K) -> K {
    key.clone().normalize_key()
}

fn encode<K: KeyCodec>(key: &K) -> StoreResult<Vec<u8>> {
    Ok(normalized(key).encoded_key()?)
}

/// A selector resolved into inclusive encoded bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRange {
    /// Inclusive encoded lower bound.
    pub start: Vec<u8>,
    /// Inclusive encoded upper bound.
    pub end: Vec<u8>,
    /// Scan in descending order.
    pub reverse: bool,
    /// Maximum number of items to return, if capped.
    pub limit: Option<usize>,
    /// Return values alongside keys.
    pub return_values: bool,
}

impl NormalizedRange {
    /// A range no key can fall into.
    ///
    /// `start` is strictly greater than `end`, so `BETWEEN` matches nothing,
    /// not even the empty key.
    fn empty<K>(selector: &KeySelector<K>) -> Self {
        Self {
            start: vec![0x00],
            end: Vec::new(),
            reverse: selector.reverse,
            limit: selector.limit,
            return_values: selector.return_values,
        }
    }

    /// True if the bounds are inverted and the range matches nothing.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_KEY_SIZE;

    fn sel() -> KeySelector<String> {
        KeySelector::new()
    }

    fn s(v: &str) -> String {
        v.to_owned()
    }

    fn within(range: &NormalizedRange, key: &str) -> bool {
        let key = key.as_bytes();
        range.start.as_slice() <= key && key <= range.end.as_slice()
    }

    #[test]
    fn default_covers_everything() {
        let range = sel().normalize().unwrap();
        assert!(range.start.is_empty());
        assert_eq!(range.end, vec![0xFF; MAX_KEY_SIZE]);
        assert!(range.return_values);
        assert!(!range.reverse);
        assert_eq!(range.limit, None);
        assert!(within(&range, ""));
        assert!(within(&range, "zzzz"));
    }

    #[test]
    fn exclusive_bounds_become_inclusive() {
        let range = sel().start_after(s("b")).end_before(s("e")).normalize().unwrap();
        let hits: Vec<_> =
            ["a", "b", "c", "d", "e"].into_iter().filter(|k| within(&range, k)).collect();
        assert_eq!(hits, ["c", "d"]);
        // Children of "d" are below "e" and stay in range.
        assert!(within(&range, "dz"));
    }

    #[test]
    fn inclusive_bounds_keep_endpoints() {
        let range = sel().start(s("b")).end(s("d")).normalize().unwrap();
        let hits: Vec<_> =
            ["a", "b", "c", "d", "e"].into_iter().filter(|k| within(&range, k)).collect();
        assert_eq!(hits, ["b", "c", "d"]);
        assert!(!within(&range, "d0"));
    }

    #[test]
    fn before_and_after_shift_by_one_key() {
        let range = sel().start_before(s("b")).end_after(s("d")).normalize().unwrap();
        assert!(within(&range, "b"));
        assert!(within(&range, "d"));
        assert!(within(&range, "d\u{0}"));
        assert!(!within(&range, "d\u{1}"));
        assert!(!within(&range, "a"));
        assert!(!within(&range, "az"));
    }

    #[test]
    fn after_bounds_at_size_cap() {
        let full = vec![5u8; MAX_KEY_SIZE];
        let mut next = vec![5u8; MAX_KEY_SIZE - 1];
        next.push(6);

        let range = KeySelector::new().end_after(full.clone()).normalize().unwrap();
        assert_eq!(range.end, next);
        assert!(range.start.as_slice() <= full.as_slice());

        let range = KeySelector::new().start_after(full.clone()).normalize().unwrap();
        assert_eq!(range.start, next);

        let top = vec![0xFFu8; MAX_KEY_SIZE];
        let range = KeySelector::new().end_after(top.clone()).normalize().unwrap();
        assert_eq!(range.end, top);
        assert!(KeySelector::new().start_after(top).normalize().unwrap().is_empty());
    }

    #[test]
    fn prefix_selects_shared_prefix() {
        let range = sel().prefix(s("x")).normalize().unwrap();
        let hits: Vec<_> =
            ["w9", "x", "x1", "x2", "y1"].into_iter().filter(|k| within(&range, k)).collect();
        assert_eq!(hits, ["x", "x1", "x2"]);
    }

    #[test]
    fn prefix_intersects_explicit_bounds() {
        let range = sel().prefix(s("x")).start(s("x2")).normalize().unwrap();
        assert!(!within(&range, "x1"));
        assert!(within(&range, "x2"));
        assert!(within(&range, "x9"));
        assert!(!within(&range, "y"));

        let range = sel().prefix(s("x")).end(s("zzz")).normalize().unwrap();
        assert!(!within(&range, "y"));
    }

    #[test]
    fn end_before_empty_key_is_empty() {
        let range = sel().end_before(s("")).normalize().unwrap();
        assert!(range.is_empty());
        assert!(!within(&range, ""));
    }

    #[test]
    fn conflicting_lower_bounds_rejected() {
        let err = sel().start(s("a")).start_after(s("b")).normalize().unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
        let err = sel().start_after(s("a")).start_before(s("b")).normalize().unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }

    #[test]
    fn conflicting_upper_bounds_rejected() {
        let err = sel().end(s("a")).end_before(s("b")).normalize().unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
        let err = sel().end(s("a")).end_after(s("b")).normalize().unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }

    #[test]
    fn modifiers_pass_through() {
        let range = sel().reverse(true).limit(2).return_values(false).normalize().unwrap();
        assert!(range.reverse);
        assert_eq!(range.limit, Some(2));
        assert!(!range.return_values);
    }

    #[test]
    fn oversized_bound_is_codec_error() {
        let err = sel().start("k".repeat(MAX_KEY_SIZE + 1)).normalize().unwrap_err();
        assert!(matches!(err, StoreError::Codec(_)));
    }
}
