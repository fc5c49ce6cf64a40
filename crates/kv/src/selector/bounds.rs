//! Bound arithmetic over encoded keys.
//!
//! Encoded keys are byte strings of at most `max` bytes compared
//! lexicographically. Within that bounded space every key has an immediate
//! successor and, except for the empty key, an immediate predecessor.

/// The largest encoded key of at most `max` bytes.
pub(crate) fn highest(max: usize) -> Vec<u8> {
    vec![0xFF; max]
}

/// Pad `key` with `0xFF` up to `max` bytes.
///
/// The result is the largest key of at most `max` bytes that starts with
/// `key`.
pub(crate) fn pad_high(key: &[u8], max: usize) -> Vec<u8> {
    let mut out = key.to_vec();
    if out.len() < max {
        out.resize(max, 0xFF);
    }
    out
}

/// The smallest key of at most `max` bytes strictly greater than `key`.
///
/// Returns `None` for the highest key, which has no successor.
pub(crate) fn successor(key: &[u8], max: usize) -> Option<Vec<u8>> {
    if key.len() < max {
        let mut out = Vec::with_capacity(key.len() + 1);
        out.extend_from_slice(key);
        out.push(0x00);
        return Some(out);
    }
    // At the size cap: drop trailing 0xFF bytes and bump the last one left.
    let end = key.iter().rposition(|&b| b != 0xFF)?;
    let mut out = key[..=end].to_vec();
    out[end] += 1;
    Some(out)
}

/// The largest key of at most `max` bytes strictly less than `key`.
///
/// Returns `None` for the empty key, which has no predecessor.
pub(crate) fn predecessor(key: &[u8], max: usize) -> Option<Vec<u8>> {
    let (&last, init) = key.split_last()?;
    if last == 0x00 {
        return Some(init.to_vec());
    }
    let mut out = init.to_vec();
    out.push(last - 1);
    Some(pad_high(&out, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successor_appends_zero() {
        assert_eq!(successor(b"b", 8).unwrap(), b"b\x00");
        assert_eq!(successor(b"", 8).unwrap(), b"\x00");
    }

    #[test]
    fn successor_at_size_cap_increments() {
        let key = vec![5u8; 255];
        let next = successor(&key, 255).unwrap();
        let mut expected = vec![5u8; 254];
        expected.push(6);
        assert_eq!(next, expected);
        assert!(key < next);

        assert_eq!(successor(b"a\xFF\xFF", 3).unwrap(), b"b");
        assert_eq!(successor(&highest(4), 4), None);
    }

    #[test]
    fn predecessor_of_empty_is_none() {
        assert_eq!(predecessor(b"", 8), None);
    }

    #[test]
    fn predecessor_strips_trailing_zero() {
        assert_eq!(predecessor(b"a\x00", 8).unwrap(), b"a");
    }

    #[test]
    fn predecessor_decrements_and_pads() {
        let p = predecessor(b"e", 4).unwrap();
        assert_eq!(p, b"d\xFF\xFF\xFF");
        assert!(p.as_slice() < b"e".as_slice());
        // Everything in the bounded space that sorts before "e" also sorts
        // at or before the predecessor.
        assert!(b"d\xFF\xFF".as_slice() <= p.as_slice());
        assert!(b"dzzz".as_slice() <= p.as_slice());
    }

    #[test]
    fn pad_high_keeps_long_keys() {
        assert_eq!(pad_high(b"abc", 2), b"abc");
        assert_eq!(pad_high(b"a", 3), b"a\xFF\xFF");
        assert_eq!(highest(2), b"\xFF\xFF");
    }
}
