//! The connection-triggered sync controller.

use crate::config::TriggerConfig;
use crate::events::{ConnectionMonitor, SubscriptionId};
use crate::service::{SyncService, SyncStatus};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
struct TriggerState {
    initialized: bool,
    connected: bool,
    subscription: Option<SubscriptionId>,
}

/// Wakes the sync layer whenever the companion connects.
///
/// The controller tracks the debounced connection state and, on each
/// connect transition, asks the sync layer to reconcile the settings
/// database. It also exposes a manual [`trigger`](Self::trigger) with
/// the same semantics. Every outcome of the sync request is absorbed
/// and logged; the next connect event or manual trigger is the only
/// retry mechanism.
///
/// One instance is constructed at process start; there is no hidden
/// process-wide state.
pub struct SyncTrigger<M: ConnectionMonitor, S: SyncService> {
    monitor: Arc<M>,
    service: Arc<S>,
    config: TriggerConfig,
    state: Mutex<TriggerState>,
}

impl<M, S> SyncTrigger<M, S>
where
    M: ConnectionMonitor + 'static,
    S: SyncService + 'static,
{
    /// Creates a controller. Call [`init`](Self::init) to start it.
    pub fn new(monitor: Arc<M>, service: Arc<S>, config: TriggerConfig) -> Arc<Self> {
        Arc::new(Self {
            monitor,
            service,
            config,
            state: Mutex::new(TriggerState::default()),
        })
    }

    /// Subscribes to connection events and arms the controller.
    ///
    /// Starts in the disconnected state until the first event arrives.
    /// Idempotent.
    pub fn init(self: &Arc<Self>) {
        {
            let mut state = self.state.lock();
            if state.initialized {
                warn!("settings sync trigger already initialized");
                return;
            }
            state.initialized = true;
            state.connected = false;
        }

        let weak = Arc::downgrade(self);
        let subscription = self.monitor.subscribe(Box::new(move |connected| {
            if let Some(trigger) = weak.upgrade() {
                trigger.handle_connection_event(connected);
            }
        }));
        self.state.lock().subscription = Some(subscription);

        info!(db_id = self.config.db_id.as_u8(), "settings sync trigger initialized");
    }

    /// Unsubscribes from connection events and disarms the controller.
    ///
    /// Idempotent.
    pub fn deinit(&self) {
        let subscription = {
            let mut state = self.state.lock();
            if !state.initialized {
                return;
            }
            state.initialized = false;
            state.connected = false;
            state.subscription.take()
        };

        if let Some(id) = subscription {
            self.monitor.unsubscribe(id);
        }
        info!("settings sync trigger deinitialized");
    }

    /// Returns true if the companion is currently connected.
    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    /// Manually requests a settings sync.
    ///
    /// A no-op unless the controller is initialized and the companion is
    /// connected; the outcome handling matches the automatic path.
    pub fn trigger(&self) {
        {
            let state = self.state.lock();
            if !state.initialized {
                warn!("settings sync trigger not initialized");
                return;
            }
            if !state.connected {
                warn!("companion not connected, cannot sync settings");
                return;
            }
        }

        info!("manually requesting settings sync");
        self.request_sync();
    }

    fn handle_connection_event(&self, connected: bool) {
        {
            let mut state = self.state.lock();
            if !state.initialized {
                // Stale event delivered after deinit.
                return;
            }
            state.connected = connected;
        }

        if connected {
            info!("companion connected, requesting settings sync");
            self.request_sync();
        } else {
            info!("companion disconnected");
        }
    }

    /// Hands the sync request to the sync layer and absorbs the outcome.
    ///
    /// No retry is scheduled on any path. A busy sync layer already
    /// coordinates record acknowledgement, so waking it again would be
    /// redundant.
    fn request_sync(&self) {
        match self.service.sync_db(self.config.db_id) {
            SyncStatus::Started => info!("settings sync started"),
            SyncStatus::NoActionRequired => debug!("no settings need syncing"),
            SyncStatus::Busy => debug!("settings sync already in progress"),
            SyncStatus::Failed(reason) => {
                error!(%reason, "failed to start settings sync");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryConnectionMonitor;
    use crate::service::MockSyncService;
    use prefsync_db::DatabaseId;

    type TestTrigger = Arc<SyncTrigger<MemoryConnectionMonitor, MockSyncService>>;

    fn controller() -> (Arc<MemoryConnectionMonitor>, Arc<MockSyncService>, TestTrigger) {
        let monitor = Arc::new(MemoryConnectionMonitor::new());
        let service = Arc::new(MockSyncService::new());
        let trigger = SyncTrigger::new(
            Arc::clone(&monitor),
            Arc::clone(&service),
            TriggerConfig::default(),
        );
        (monitor, service, trigger)
    }

    #[test]
    fn trigger_before_init_issues_no_sync() {
        let (_, service, trigger) = controller();
        trigger.trigger();
        assert!(service.calls().is_empty());
    }

    #[test]
    fn trigger_while_disconnected_issues_no_sync() {
        let (_, service, trigger) = controller();
        trigger.init();
        trigger.trigger();
        assert!(service.calls().is_empty());
    }

    #[test]
    fn connect_event_requests_exactly_one_sync() {
        let (monitor, service, trigger) = controller();
        trigger.init();

        monitor.publish(true);
        assert_eq!(service.calls(), vec![DatabaseId::Settings]);
        assert!(trigger.is_connected());
    }

    #[test]
    fn disconnect_event_requests_nothing() {
        let (monitor, service, trigger) = controller();
        trigger.init();

        monitor.publish(false);
        assert!(service.calls().is_empty());
        assert!(!trigger.is_connected());
    }

    #[test]
    fn rapid_reconnects_sync_once_per_connect() {
        let (monitor, service, trigger) = controller();
        trigger.init();

        monitor.publish(true);
        monitor.publish(false);
        monitor.publish(true);
        assert_eq!(
            service.calls(),
            vec![DatabaseId::Settings, DatabaseId::Settings]
        );
    }

    #[test]
    fn manual_trigger_while_connected_requests_sync() {
        let (monitor, service, trigger) = controller();
        trigger.init();
        monitor.publish(true);

        trigger.trigger();
        assert_eq!(service.calls().len(), 2);
    }

    #[test]
    fn benign_and_failed_outcomes_are_absorbed() {
        let (monitor, service, trigger) = controller();
        trigger.init();

        for status in [
            SyncStatus::NoActionRequired,
            SyncStatus::Busy,
            SyncStatus::Failed("endpoint gone".into()),
        ] {
            service.set_status(status);
            monitor.publish(true);
            monitor.publish(false);
        }

        // One request per connect; no retries were scheduled for any
        // outcome.
        assert_eq!(service.calls().len(), 3);
    }

    #[test]
    fn init_is_idempotent() {
        let (monitor, _, trigger) = controller();
        trigger.init();
        trigger.init();
        assert_eq!(monitor.subscriber_count(), 1);
    }

    #[test]
    fn deinit_unsubscribes_and_disarms() {
        let (monitor, service, trigger) = controller();
        trigger.init();
        monitor.publish(true);
        assert_eq!(service.calls().len(), 1);

        trigger.deinit();
        assert_eq!(monitor.subscriber_count(), 0);
        assert!(!trigger.is_connected());

        monitor.publish(true);
        trigger.trigger();
        assert_eq!(service.calls().len(), 1);

        trigger.deinit();
    }

    #[test]
    fn reinit_after_deinit_resubscribes() {
        let (monitor, service, trigger) = controller();
        trigger.init();
        trigger.deinit();
        trigger.init();

        monitor.publish(true);
        assert_eq!(service.calls().len(), 1);
    }
}
