//! # prefsync db
//!
//! Whitelisted sync-database adapter for device settings.
//!
//! This crate sits between the persistent settings store and the generic
//! record-sync layer. It exposes the store through the [`SyncDatabase`]
//! contract the sync layer speaks, while enforcing a privacy boundary:
//! only settings on a fixed whitelist are ever handed to the companion
//! device. Sensitive records (pairing data, debug flags, device-only
//! state) stay local even when they are dirty.
//!
//! ## Key Invariants
//!
//! - Whitelist membership is full-length byte equality, never a prefix
//!   match
//! - Mutating calls (`insert`, `delete`) on non-whitelisted keys are
//!   rejected before the store is touched
//! - Dirty enumeration never yields a non-whitelisted key, even if that
//!   key is dirty in the store
//! - Every operation opens its own store handle and releases it on every
//!   exit path

mod api;
mod error;
mod settings_db;
mod whitelist;

pub use api::{DatabaseId, DirtyItem, SyncDatabase};
pub use error::{DbError, DbResult};
pub use settings_db::SettingsDb;
pub use whitelist::{DeviceCapabilities, Whitelist};
