//! # prefsync store
//!
//! Settings-store contract and implementations for prefsync.
//!
//! This crate defines the lowest-level storage abstraction the settings
//! sync adapter depends on: a small persistent key-value store with
//! per-record sync bookkeeping. The store is **opaque to sync policy** -
//! it tracks which records changed since their last acknowledged sync,
//! but it does not know which records are allowed to sync at all.
//!
//! ## Design Principles
//!
//! - Every write is atomic per operation; there is no explicit flush
//! - Each record carries a `dirty` flag and a `last_modified` timestamp
//! - Handles are scoped: opening yields a [`SettingsFile`], dropping it
//!   closes the store
//! - Providers must be `Send + Sync` so one provider can back adapters
//!   shared across threads
//!
//! ## Available Implementations
//!
//! - [`MemoryStore`] - For testing and ephemeral storage
//!
//! ## Example
//!
//! ```rust
//! use prefsync_store::{MemoryStore, SettingsFile, StoreConfig, StoreProvider};
//!
//! let store = MemoryStore::new(StoreConfig::default());
//! let mut file = store.open().unwrap();
//! file.set(b"clock24h\0", &[1]).unwrap();
//! assert!(file.get(b"clock24h\0").unwrap() == vec![1]);
//! ```

mod error;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryFile, MemoryStore};
pub use store::{RecordInfo, SettingsFile, StoreConfig, StoreProvider, MAX_KEY_LEN};
