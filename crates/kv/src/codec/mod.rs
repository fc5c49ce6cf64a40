//! Key and value codecs.
//!
//! The store never interprets application keys or values directly. It
//! relies on two traits implemented by the application types:
//!
//! - [`KeyCodec`]: Order-preserving key encoding, capped at
//!   [`KeyCodec::MAX_SIZE`] bytes.
//! - [`ValueCodec`]: Value encoding with no ordering requirement.
//!
//! ## Key Ordering
//!
//! Every range operation is answered by the database comparing encoded keys
//! bytewise. A key codec must therefore guarantee that `a < b` implies
//! `encode(a) < encode(b)` lexicographically. The size cap guarantees that a
//! maximal encoded key exists (`[0xFF; MAX_SIZE]`), which the selector
//! normalizer relies on for open upper bounds and prefix ranges.

mod impls;
pub use impls::Json;

mod traits;
pub use traits::{KeyCodec, MAX_KEY_SIZE, ValueCodec};
