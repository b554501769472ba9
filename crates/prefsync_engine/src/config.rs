//! Controller configuration.

use prefsync_db::DatabaseId;

/// Configuration for the connection-triggered sync controller.
#[derive(Debug, Clone, Copy)]
pub struct TriggerConfig {
    /// The sync database the controller wakes on connect.
    pub db_id: DatabaseId,
}

impl TriggerConfig {
    /// Creates a config targeting the given database.
    pub fn new(db_id: DatabaseId) -> Self {
        Self { db_id }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self::new(DatabaseId::Settings)
    }
}
