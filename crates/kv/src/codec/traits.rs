use crate::{CodecError, selector::bounds};

/// Default maximum encoded key size in bytes.
pub const MAX_KEY_SIZE: usize = 255;

/// Trait for order-preserving key encoding.
///
/// The encoding must preserve ordering, i.e., for any two keys `k1` and `k2`,
/// if `k1 > k2`, then the encoded bytes of `k1` must be lexicographically
/// greater than those of `k2`. Encoded keys are at most `MAX_SIZE` bytes and
/// `decode_key(encode_key(k)) == k` must hold for every normalized key.
pub trait KeyCodec: Clone + core::fmt::Debug + Send + Sync + Sized {
    /// Maximum size of an encoded key in bytes.
    const MAX_SIZE: usize = MAX_KEY_SIZE;

    /// Bring a key into its canonical form before encoding.
    ///
    /// The default implementation returns the key unchanged.
    fn normalize_key(self) -> Self {
        self
    }

    /// Encode the key into its storable, order-preserving form.
    fn encode_key(&self) -> Result<Vec<u8>, CodecError>;

    /// Decode a key from its stored form.
    fn decode_key(data: &[u8]) -> Result<Self, CodecError>;

    /// Encode the key and check it against [`Self::MAX_SIZE`].
    fn encoded_key(&self) -> Result<Vec<u8>, CodecError> {
        let encoded = self.encode_key()?;
        if encoded.len() > Self::MAX_SIZE {
            return Err(CodecError::KeyTooLong { len: encoded.len(), max: Self::MAX_SIZE });
        }
        Ok(encoded)
    }

    /// Inclusive encoded bounds covering every key that starts with this
    /// key's encoding.
    ///
    /// The default pads the encoded prefix with `0xFF` up to `MAX_SIZE` for
    /// the upper bound. Codecs whose encoding does not map key prefixes onto
    /// byte prefixes should override this.
    fn prefix_bounds(&self) -> Result<(Vec<u8>, Vec<u8>), CodecError> {
        let start = self.encoded_key()?;
        let end = bounds::pad_high(&start, Self::MAX_SIZE);
        Ok((start, end))
    }
}

/// Trait for value encoding.
///
/// Values may be of any size. `decode_value(encode_value(v)) == v` must hold.
pub trait ValueCodec: Send + Sync + Sized {
    /// Encode the value into its storable form.
    fn encode_value(&self) -> Result<Vec<u8>, CodecError>;

    /// Decode a value from its stored form.
    fn decode_value(data: &[u8]) -> Result<Self, CodecError>;
}
