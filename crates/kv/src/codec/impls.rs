use crate::{CodecError, KeyCodec, ValueCodec};
use serde::{Serialize, de::DeserializeOwned};

/// Check that `data` holds exactly `N` bytes.
fn exact<const N: usize>(data: &[u8]) -> Result<[u8; N], CodecError> {
    if data.len() < N {
        return Err(CodecError::InsufficientData { needed: N, available: data.len() });
    }
    data.try_into().map_err(|_| CodecError::InexactDecode { extra_bytes: data.len() - N })
}

macro_rules! delegate_val_to_key {
    ($ty:ty) => {
        impl ValueCodec for $ty {
            fn encode_value(&self) -> Result<Vec<u8>, CodecError> {
                KeyCodec::encode_key(self)
            }

            fn decode_value(data: &[u8]) -> Result<Self, CodecError> {
                KeyCodec::decode_key(data)
            }
        }
    };
}

macro_rules! codec_be_unsigned {
    ($ty:ty, $size:expr) => {
        impl KeyCodec for $ty {
            fn encode_key(&self) -> Result<Vec<u8>, CodecError> {
                Ok(self.to_be_bytes().to_vec())
            }

            fn decode_key(data: &[u8]) -> Result<Self, CodecError> {
                exact::<{ $size }>(data).map(<$ty>::from_be_bytes)
            }
        }

        delegate_val_to_key!($ty);
    };
    ($($ty:ty, $size:expr);* $(;)?) => {
        $(
            codec_be_unsigned!($ty, $size);
        )+
    };
}

// Signed integers flip the sign bit so negative numbers sort before
// positive ones under bytewise comparison.
macro_rules! codec_be_signed {
    ($ty:ty, $unsigned:ty, $size:expr) => {
        impl KeyCodec for $ty {
            fn encode_key(&self) -> Result<Vec<u8>, CodecError> {
                let flipped = (*self as $unsigned) ^ (1 << (<$unsigned>::BITS - 1));
                Ok(flipped.to_be_bytes().to_vec())
            }

            fn decode_key(data: &[u8]) -> Result<Self, CodecError> {
                let raw = <$unsigned>::from_be_bytes(exact::<{ $size }>(data)?);
                Ok((raw ^ (1 << (<$unsigned>::BITS - 1))) as $ty)
            }
        }

        delegate_val_to_key!($ty);
    };
    ($($ty:ty, $unsigned:ty, $size:expr);* $(;)?) => {
        $(
            codec_be_signed!($ty, $unsigned, $size);
        )+
    };
}

codec_be_unsigned!(
    u8, 1;
    u16, 2;
    u32, 4;
    u64, 8;
    u128, 16;
);

codec_be_signed!(
    i8, u8, 1;
    i16, u16, 2;
    i32, u32, 4;
    i64, u64, 8;
    i128, u128, 16;
);

impl KeyCodec for Vec<u8> {
    fn encode_key(&self) -> Result<Vec<u8>, CodecError> {
        Ok(self.clone())
    }

    fn decode_key(data: &[u8]) -> Result<Self, CodecError> {
        Ok(data.to_vec())
    }
}

delegate_val_to_key!(Vec<u8>);

impl KeyCodec for bytes::Bytes {
    fn encode_key(&self) -> Result<Vec<u8>, CodecError> {
        Ok(self.to_vec())
    }

    fn decode_key(data: &[u8]) -> Result<Self, CodecError> {
        Ok(Self::copy_from_slice(data))
    }
}

delegate_val_to_key!(bytes::Bytes);

// UTF-8 preserves code point order under bytewise comparison.
impl KeyCodec for String {
    fn encode_key(&self) -> Result<Vec<u8>, CodecError> {
        Ok(self.as_bytes().to_vec())
    }

    fn decode_key(data: &[u8]) -> Result<Self, CodecError> {
        Self::from_utf8(data.to_vec()).map_err(CodecError::from)
    }
}

delegate_val_to_key!(String);

/// Value wrapper storing any serde type as JSON.
///
/// ```
/// use pairs_kv::{Json, ValueCodec};
///
/// let encoded = Json(vec![1u32, 2, 3]).encode_value().unwrap();
/// assert_eq!(encoded, b"[1,2,3]");
/// let Json(decoded) = Json::<Vec<u32>>::decode_value(&encoded).unwrap();
/// assert_eq!(decoded, vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwrap the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> ValueCodec for Json<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn encode_value(&self) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(&self.0).map_err(CodecError::from)
    }

    fn decode_value(data: &[u8]) -> Result<Self, CodecError> {
        serde_json::from_slice(data).map(Json).map_err(CodecError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_KEY_SIZE;

    fn enc<K: KeyCodec>(k: K) -> Vec<u8> {
        k.encoded_key().unwrap()
    }

    #[test]
    fn signed_keys_preserve_order() {
        let keys = [i64::MIN, -1_000, -1, 0, 1, 42, i64::MAX];
        for pair in keys.windows(2) {
            assert!(enc(pair[0]) < enc(pair[1]), "{} should sort before {}", pair[0], pair[1]);
        }
        for k in keys {
            assert_eq!(i64::decode_key(&enc(k)).unwrap(), k);
        }
    }

    #[test]
    fn unsigned_keys_preserve_order() {
        assert!(enc(255u32) < enc(256u32));
        assert_eq!(u32::decode_key(&enc(256u32)).unwrap(), 256);
    }

    #[test]
    fn numeric_decode_checks_length() {
        assert!(matches!(
            u64::decode_key(&[1, 2, 3]),
            Err(CodecError::InsufficientData { needed: 8, available: 3 })
        ));
        assert!(matches!(
            u16::decode_key(&[1, 2, 3]),
            Err(CodecError::InexactDecode { extra_bytes: 1 })
        ));
    }

    #[test]
    fn string_keys_round_trip() {
        let key = String::from("user:héllo");
        assert_eq!(String::decode_key(&enc(key.clone())).unwrap(), key);
        assert!(matches!(String::decode_key(&[0xff, 0xfe]), Err(CodecError::Utf8(_))));
    }

    #[test]
    fn oversized_key_rejected() {
        let key = vec![7u8; MAX_KEY_SIZE + 1];
        assert!(matches!(
            key.encoded_key(),
            Err(CodecError::KeyTooLong { len, max: MAX_KEY_SIZE }) if len == MAX_KEY_SIZE + 1
        ));
    }

    #[test]
    fn prefix_bounds_pad_to_max() {
        let (start, end) = String::from("x").prefix_bounds().unwrap();
        assert_eq!(start, b"x");
        assert_eq!(end.len(), MAX_KEY_SIZE);
        assert_eq!(end[0], b'x');
        assert!(end[1..].iter().all(|b| *b == 0xFF));
        assert!(enc(String::from("x1")) <= end);
        assert!(enc(String::from("y")) > end);
    }

    #[test]
    fn json_values_round_trip() {
        let value = Json(serde_json::json!({"name": "alice", "age": 31}));
        let encoded = value.encode_value().unwrap();
        assert_eq!(Json::<serde_json::Value>::decode_value(&encoded).unwrap(), value);
        assert!(matches!(Json::<u32>::decode_value(b"not json"), Err(CodecError::Json(_))));
    }
}
