//! Per-operation option bags.
//!
//! Each point and batch operation takes an options struct. `Default` gives
//! the strict behaviour: missing keys are errors and puts overwrite.

/// Options for [`PairStore::get`](crate::PairStore::get).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOptions {
    /// Fail with [`StoreError::NotFound`](crate::StoreError::NotFound)
    /// instead of returning `None`.
    pub error_if_missing: bool,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self { error_if_missing: true }
    }
}

impl GetOptions {
    /// Return `None` for missing keys.
    pub const fn lenient() -> Self {
        Self { error_if_missing: false }
    }
}

/// How a put writes its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PutMode {
    /// Plain insert; an existing key is an error.
    Insert,
    /// Insert, or overwrite an existing key.
    Upsert,
    /// Overwrite an existing key; a missing key is an error.
    Update,
}

/// Options for [`PairStore::put`](crate::PairStore::put).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PutOptions {
    /// Create the pair if the key does not exist.
    pub create_if_missing: bool,
    /// Fail with [`StoreError::AlreadyExists`](crate::StoreError::AlreadyExists)
    /// if the key exists. Takes precedence over `create_if_missing`.
    pub error_if_exists: bool,
}

impl Default for PutOptions {
    fn default() -> Self {
        Self { create_if_missing: true, error_if_exists: false }
    }
}

impl PutOptions {
    /// Only create new pairs.
    pub const fn create_only() -> Self {
        Self { create_if_missing: true, error_if_exists: true }
    }

    /// Only overwrite existing pairs.
    pub const fn update_only() -> Self {
        Self { create_if_missing: false, error_if_exists: false }
    }

    /// The write mode selected by the flags.
    pub const fn mode(&self) -> PutMode {
        if self.error_if_exists {
            PutMode::Insert
        } else if self.create_if_missing {
            PutMode::Upsert
        } else {
            PutMode::Update
        }
    }
}

/// Options for [`PairStore::del`](crate::PairStore::del).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelOptions {
    /// Fail with [`StoreError::NotFound`](crate::StoreError::NotFound) if
    /// nothing was deleted.
    pub error_if_missing: bool,
}

impl Default for DelOptions {
    fn default() -> Self {
        Self { error_if_missing: true }
    }
}

impl DelOptions {
    /// Deleting a missing key is not an error.
    pub const fn lenient() -> Self {
        Self { error_if_missing: false }
    }
}

/// Options for [`PairStore::get_many`](crate::PairStore::get_many).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetManyOptions {
    /// Fail with
    /// [`StoreError::PartialNotFound`](crate::StoreError::PartialNotFound)
    /// if any requested key is missing.
    pub error_if_missing: bool,
    /// Fetch values. When `false` only keys are selected and every item's
    /// value is `None`.
    pub return_values: bool,
}

impl Default for GetManyOptions {
    fn default() -> Self {
        Self { error_if_missing: true, return_values: true }
    }
}

impl GetManyOptions {
    /// Set `error_if_missing`.
    pub const fn error_if_missing(mut self, error_if_missing: bool) -> Self {
        self.error_if_missing = error_if_missing;
        self
    }

    /// Set `return_values`.
    pub const fn return_values(mut self, return_values: bool) -> Self {
        self.return_values = return_values;
        self
    }
}
