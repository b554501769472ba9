//! Error types for sync-database operations.

use prefsync_store::StoreError;
use thiserror::Error;

/// Result type for sync-database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur during sync-database operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DbError {
    /// The database was used before `init`.
    #[error("settings database not initialized")]
    NotInitialized,

    /// A mutating operation targeted a key outside the sync whitelist.
    #[error("operation not permitted for setting {key:?}")]
    NotPermitted {
        /// The rejected key, lossily decoded for diagnostics.
        key: String,
    },

    /// A store failure, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}
