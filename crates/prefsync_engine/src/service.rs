//! The generic sync layer contract.

use parking_lot::Mutex;
use prefsync_db::DatabaseId;

/// Outcome of asking the sync layer to reconcile a database.
///
/// This is the status vocabulary surfaced across the sync boundary. All
/// variants are local returns; none of them carries a retry obligation
/// for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// A sync session was started.
    Started,
    /// Every record is already acknowledged; nothing to do.
    NoActionRequired,
    /// A sync for this database is already in flight.
    Busy,
    /// The sync layer could not start a session.
    Failed(String),
}

/// The external protocol component that reconciles records with the
/// companion device.
///
/// Given a database identifier, the sync layer pulls the database's
/// dirty list, transmits records, and acknowledges them back through the
/// database's `mark_synced`. A request, once handed over, cannot be
/// cancelled from this side; [`SyncStatus::Busy`] is the only
/// backpressure signal.
pub trait SyncService: Send + Sync {
    /// Requests reconciliation of one database.
    fn sync_db(&self, db_id: DatabaseId) -> SyncStatus;
}

/// A mock sync service for testing.
///
/// Records every request and answers with a settable status.
#[derive(Debug)]
pub struct MockSyncService {
    status: Mutex<SyncStatus>,
    calls: Mutex<Vec<DatabaseId>>,
}

impl MockSyncService {
    /// Creates a mock that answers [`SyncStatus::Started`].
    pub fn new() -> Self {
        Self {
            status: Mutex::new(SyncStatus::Started),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sets the status returned by subsequent requests.
    pub fn set_status(&self, status: SyncStatus) {
        *self.status.lock() = status;
    }

    /// Returns every database id requested so far, in order.
    pub fn calls(&self) -> Vec<DatabaseId> {
        self.calls.lock().clone()
    }
}

impl Default for MockSyncService {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncService for MockSyncService {
    fn sync_db(&self, db_id: DatabaseId) -> SyncStatus {
        self.calls.lock().push(db_id);
        self.status.lock().clone()
    }
}
