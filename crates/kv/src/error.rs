//! Error types for pair store operations.

/// Result type alias for pair store operations.
pub type StoreResult<T, E = StoreError> = Result<T, E>;

/// Error type for pair store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested key is not in the table.
    #[error("item not found (key={0})")]
    NotFound(String),

    /// An insert-only write hit an existing key.
    #[error("item already exists (key={0})")]
    AlreadyExists(String),

    /// A batch get did not find every requested key.
    #[error("some items not found ({} of {requested} missing)", missing.len())]
    PartialNotFound {
        /// Number of keys requested.
        requested: usize,
        /// Debug renderings of the keys that were not found, in request
        /// order.
        missing: Vec<String>,
    },

    /// The caller supplied malformed input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend returned a result shape the statement did not expect.
    #[error("invalid result: {0}")]
    InvalidResult(String),

    /// Encoding or decoding a key or value failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The connection failed to execute a statement.
    #[error("backend error: {0}")]
    Backend(Box<dyn core::error::Error + Send + Sync + 'static>),
}

impl StoreError {
    /// Create a new backend error from any error type.
    pub fn backend<E>(error: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(error))
    }

    /// True for [`StoreError::NotFound`] and [`StoreError::PartialNotFound`].
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::PartialNotFound { .. })
    }
}

impl From<ConnectionError> for StoreError {
    fn from(error: ConnectionError) -> Self {
        match error {
            ConnectionError::UniqueViolation(msg) => Self::AlreadyExists(msg),
            ConnectionError::Backend(err) => Self::Backend(err),
        }
    }
}

/// Error reported by a [`Connection`](crate::Connection) while executing a
/// statement.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The statement violated the table's key uniqueness constraint.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Any other driver or transport failure.
    #[error("backend error: {0}")]
    Backend(#[from] Box<dyn core::error::Error + Send + Sync + 'static>),
}

impl ConnectionError {
    /// Create a new backend error from any error type.
    pub fn backend<E>(error: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(error))
    }
}

/// Error type for key and value codecs.
///
/// Erases the underlying error type to a boxed trait object or a string
/// message where no specific variant applies.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The encoded key is longer than the codec's size cap.
    #[error("encoded key is {len} bytes, exceeding the {max} byte limit")]
    KeyTooLong {
        /// Length of the encoded key.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Not enough data to complete decoding.
    #[error("insufficient data: needed {needed} bytes, but only {available} available")]
    InsufficientData {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Decoding ended with extra bytes remaining.
    #[error("inexact decoding: {extra_bytes} extra bytes remaining")]
    InexactDecode {
        /// Number of extra bytes remaining after decoding.
        extra_bytes: usize,
    },

    /// A string key or value was not valid UTF-8.
    #[error("invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A JSON value failed to serialize or deserialize.
    #[error("json codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// Boxed error from a custom codec.
    #[error(transparent)]
    Boxed(Box<dyn core::error::Error + Send + Sync + 'static>),

    /// String error message.
    #[error("{0}")]
    Message(String),
}

impl From<&str> for CodecError {
    fn from(err: &str) -> Self {
        Self::Message(err.to_owned())
    }
}

impl CodecError {
    /// Box an error into a `CodecError`.
    pub fn boxed<E>(err: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Boxed(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_maps_to_already_exists() {
        let err: StoreError = ConnectionError::UniqueViolation("pairs.key".into()).into();
        assert!(matches!(err, StoreError::AlreadyExists(ref m) if m == "pairs.key"));
    }

    #[test]
    fn partial_not_found_message_counts_missing() {
        let err = StoreError::PartialNotFound {
            requested: 3,
            missing: vec!["\"a\"".into(), "\"c\"".into()],
        };
        assert_eq!(err.to_string(), "some items not found (2 of 3 missing)");
        assert!(err.is_not_found());
    }
}
