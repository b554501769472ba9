//! Settings-store trait definitions.

use crate::error::StoreResult;

/// Maximum length of a record key, in bytes.
///
/// Keys are conventionally null-terminated setting names; the terminator
/// counts toward this limit.
pub const MAX_KEY_LEN: usize = 127;

/// Configuration for a settings store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Human-readable store name, used in diagnostics.
    pub name: String,
    /// Maximum space usable by live records, in bytes (keys + values).
    ///
    /// Once exceeded, writes fail with
    /// [`StoreError::OutOfSpace`](crate::StoreError::OutOfSpace).
    pub max_space: usize,
}

impl StoreConfig {
    /// Creates a config with the given name and space budget.
    pub fn new(name: impl Into<String>, max_space: usize) -> Self {
        Self {
            name: name.into(),
            max_space,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("prefs", 8192)
    }
}

/// A view of one record during enumeration.
///
/// Borrowed from the store for the duration of a single visitor call.
#[derive(Debug, Clone, Copy)]
pub struct RecordInfo<'a> {
    /// The record's key bytes.
    pub key: &'a [u8],
    /// When the record was last mutated, in unix seconds.
    pub last_modified: u64,
    /// True if the record changed since its last acknowledged sync.
    pub dirty: bool,
}

/// Provider of scoped settings-store handles.
///
/// Each caller opens its own handle for exactly one logical action and
/// releases it on every exit path; dropping the [`SettingsFile`] closes
/// the store. Holding a handle across unrelated operations is not part
/// of the contract.
pub trait StoreProvider: Send + Sync {
    /// The handle type produced by [`open`](Self::open).
    type File: SettingsFile;

    /// Opens the store, yielding a scoped handle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OpenFailed`](crate::StoreError::OpenFailed)
    /// if the store cannot be opened.
    fn open(&self) -> StoreResult<Self::File>;
}

impl<P: StoreProvider> StoreProvider for std::sync::Arc<P> {
    type File = P::File;

    fn open(&self) -> StoreResult<Self::File> {
        (**self).open()
    }
}

/// An open settings store.
///
/// All operations are atomic: a crash mid-write leaves either the old or
/// the new value, never a torn record. Operations are not required to be
/// thread-safe across handles; serialization is the implementation's
/// concern.
pub trait SettingsFile {
    /// Inserts or replaces a record.
    ///
    /// A successful set marks the record dirty and stamps its
    /// `last_modified` time.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is too long or the store is full.
    fn set(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Returns the length of a record's value, in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist.
    fn get_len(&self, key: &[u8]) -> StoreResult<usize>;

    /// Reads a record's value.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist.
    fn get(&self, key: &[u8]) -> StoreResult<Vec<u8>>;

    /// Returns true if a record exists for the key.
    fn exists(&self, key: &[u8]) -> bool;

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist.
    fn delete(&mut self, key: &[u8]) -> StoreResult<()>;

    /// Clears a record's dirty flag.
    ///
    /// The flag stays clear until the record is next overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist.
    fn mark_synced(&mut self, key: &[u8]) -> StoreResult<()>;

    /// Visits every record in a single pass.
    ///
    /// The visitor returns `true` to continue and `false` to stop the
    /// enumeration early. Enumeration order is stable for an unchanged
    /// store.
    fn for_each(&self, visitor: &mut dyn FnMut(RecordInfo<'_>) -> bool);
}
