//! Error types for settings-store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
///
/// These are the store-specific failure codes surfaced across the sync
/// boundary. Callers above the store pass them through unchanged rather
/// than wrapping or reinterpreting them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("record does not exist")]
    DoesNotExist,

    /// The key exceeds the maximum key length.
    #[error("key too long: {len} bytes (max {max})")]
    KeyTooLong {
        /// Length of the offending key.
        len: usize,
        /// Maximum key length the store accepts.
        max: usize,
    },

    /// The store has no room for the record.
    #[error("store full: {needed} bytes needed, {available} available")]
    OutOfSpace {
        /// Space the write would occupy.
        needed: usize,
        /// Space remaining in the store.
        available: usize,
    },

    /// The store could not be opened.
    #[error("failed to open settings store: {0}")]
    OpenFailed(String),
}
