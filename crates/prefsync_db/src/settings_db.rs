//! The whitelisted settings database.
//!
//! [`SettingsDb`] implements the [`SyncDatabase`] contract over the
//! persistent settings store, so the companion application can reconcile
//! device preferences through the generic record-sync protocol. Mutating
//! calls are gated by the sync whitelist; dirty enumeration filters the
//! store through the same whitelist.

use crate::api::{DirtyItem, SyncDatabase};
use crate::error::{DbError, DbResult};
use crate::whitelist::Whitelist;
use prefsync_store::{SettingsFile, StoreProvider};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Bound on how many key bytes are logged for a rejected setting.
const KEY_LOG_MAX: usize = 128;

/// The settings sync database.
///
/// One instance is constructed at process start and shared with the sync
/// layer. Every operation opens its own store handle and releases it on
/// every exit path, so a failure in one operation never leaks a handle
/// into the next.
///
/// Operations fail with [`DbError::NotInitialized`] until
/// [`init`](SyncDatabase::init) has run.
pub struct SettingsDb<P: StoreProvider> {
    provider: P,
    whitelist: Whitelist,
    initialized: AtomicBool,
}

impl<P: StoreProvider> SettingsDb<P> {
    /// Creates the settings database over a store provider.
    pub fn new(provider: P, whitelist: Whitelist) -> Self {
        Self {
            provider,
            whitelist,
            initialized: AtomicBool::new(false),
        }
    }

    /// Returns the whitelist this database enforces.
    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    fn check_initialized(&self) -> DbResult<()> {
        if self.initialized.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DbError::NotInitialized)
        }
    }

    /// Renders a key for diagnostics: terminator stripped, lossily
    /// decoded, bounded length.
    fn key_for_log(key: &[u8]) -> String {
        let trimmed = key.strip_suffix(&[0]).unwrap_or(key);
        let bounded = &trimmed[..trimmed.len().min(KEY_LOG_MAX)];
        String::from_utf8_lossy(bounded).into_owned()
    }
}

impl<P: StoreProvider> SyncDatabase for SettingsDb<P> {
    fn init(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(
            whitelisted = self.whitelist.len(),
            "settings database initialized"
        );
    }

    fn insert(&self, key: &[u8], value: &[u8]) -> DbResult<()> {
        self.check_initialized()?;

        if !self.whitelist.is_syncable(key) {
            let key = Self::key_for_log(key);
            warn!(%key, "rejecting non-whitelisted setting");
            return Err(DbError::NotPermitted { key });
        }

        let mut file = self.provider.open()?;
        file.set(key, value)?;
        Ok(())
    }

    fn get_len(&self, key: &[u8]) -> DbResult<usize> {
        self.check_initialized()?;

        let file = self.provider.open()?;
        Ok(file.get_len(key)?)
    }

    fn read(&self, key: &[u8]) -> DbResult<Vec<u8>> {
        self.check_initialized()?;

        let file = self.provider.open()?;
        Ok(file.get(key)?)
    }

    fn delete(&self, key: &[u8]) -> DbResult<()> {
        self.check_initialized()?;

        if !self.whitelist.is_syncable(key) {
            return Err(DbError::NotPermitted {
                key: Self::key_for_log(key),
            });
        }

        let mut file = self.provider.open()?;
        file.delete(key)?;
        Ok(())
    }

    fn get_dirty_list(&self) -> Option<Vec<DirtyItem>> {
        if self.check_initialized().is_err() {
            return None;
        }

        let file = match self.provider.open() {
            Ok(file) => file,
            Err(_) => return None,
        };

        let mut items = Vec::new();
        file.for_each(&mut |info| {
            if info.dirty && self.whitelist.is_syncable(info.key) {
                items.push(DirtyItem {
                    key: info.key.to_vec(),
                    last_updated: info.last_modified,
                });
            }
            true
        });

        Some(items)
    }

    fn mark_synced(&self, key: &[u8]) -> DbResult<()> {
        self.check_initialized()?;

        let mut file = self.provider.open()?;
        file.mark_synced(key)?;
        Ok(())
    }

    fn is_dirty(&self) -> DbResult<bool> {
        self.check_initialized()?;

        let file = self.provider.open()?;
        let mut found = false;
        file.for_each(&mut |info| {
            if info.dirty && self.whitelist.is_syncable(info.key) {
                found = true;
                return false;
            }
            true
        });

        Ok(found)
    }

    fn flush(&self) -> DbResult<()> {
        self.check_initialized()?;

        // Store writes are atomic per operation; nothing to do.
        debug!("settings database flush (no-op)");
        Ok(())
    }
}
