//! The sync-database contract shared with the generic sync layer.
//!
//! A sync database is one of several key/value stores on the device that
//! the companion application reconciles over the record-sync protocol.
//! Each database implements this contract; the sync layer addresses them
//! by [`DatabaseId`]. A database is not guaranteed to persist across
//! reboots, but a command that returns success has been executed.

use crate::error::DbResult;

/// Identifies one sync database on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DatabaseId {
    /// Loopback database for protocol testing.
    Test = 0x00,
    /// Timeline pins.
    Pins = 0x01,
    /// Installed applications.
    Apps = 0x02,
    /// Reminders.
    Reminders = 0x03,
    /// Notifications.
    Notifications = 0x04,
    /// Weather data.
    Weather = 0x05,
    /// iOS notification preferences.
    IosNotifPref = 0x06,
    /// Legacy preference records.
    Prefs = 0x07,
    /// Contacts.
    Contacts = 0x08,
    /// Per-app preferences.
    WatchAppPrefs = 0x09,
    /// Health data.
    Health = 0x0A,
    /// App glances.
    AppGlance = 0x0B,
    /// Whitelisted device settings.
    Settings = 0x0C,
}

impl DatabaseId {
    /// Returns the wire identifier for this database.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One unsynced record, as reported by [`SyncDatabase::get_dirty_list`].
///
/// Owned by the caller after return; the sync layer consumes the list
/// once the records have been transmitted and acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyItem {
    /// The record's key bytes.
    pub key: Vec<u8>,
    /// When the record was last mutated, in unix seconds.
    pub last_updated: u64,
}

/// The contract a sync database exposes to the generic sync layer.
///
/// Keys and values are raw byte sequences with explicit lengths; values
/// carry no implicit null termination.
pub trait SyncDatabase {
    /// Initializes the database. Called once at boot; idempotent.
    fn init(&self);

    /// Inserts or replaces a record. Blocking; the record is dirty
    /// afterwards until acknowledged.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is uninitialized, the key is not
    /// permitted to sync, or the store fails.
    fn insert(&self, key: &[u8], value: &[u8]) -> DbResult<()>;

    /// Returns the length of a record's value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is uninitialized or the store
    /// fails.
    fn get_len(&self, key: &[u8]) -> DbResult<usize>;

    /// Reads a record's value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is uninitialized or the store
    /// fails.
    fn read(&self, key: &[u8]) -> DbResult<Vec<u8>>;

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is uninitialized, the key is not
    /// permitted to sync, or the store fails.
    fn delete(&self, key: &[u8]) -> DbResult<()>;

    /// Returns every unsynced record the sync layer should transmit, in
    /// enumeration order.
    ///
    /// Returns `None` if the store could not be opened and an empty list
    /// if nothing needs syncing. The return value is the sole signal; no
    /// richer error channel exists on this path.
    fn get_dirty_list(&self) -> Option<Vec<DirtyItem>>;

    /// Acknowledges a record as synced, clearing its dirty flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is uninitialized or the store
    /// fails.
    fn mark_synced(&self, key: &[u8]) -> DbResult<()>;

    /// Returns true if any record needs syncing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is uninitialized or the store
    /// cannot be opened.
    fn is_dirty(&self) -> DbResult<bool>;

    /// Flushes pending writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is uninitialized.
    fn flush(&self) -> DbResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_ids_match_wire_values() {
        assert_eq!(DatabaseId::Test.as_u8(), 0x00);
        assert_eq!(DatabaseId::Prefs.as_u8(), 0x07);
        assert_eq!(DatabaseId::Settings.as_u8(), 0x0C);
    }
}
