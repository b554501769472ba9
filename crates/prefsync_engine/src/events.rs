//! The connection-event contract.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handler invoked with the debounced connection state.
///
/// `true` means the companion session opened, `false` that it closed.
pub type ConnectionHandler = Box<dyn Fn(bool) + Send + Sync>;

/// Identifies one subscription on a [`ConnectionMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Source of debounced connection-state events.
///
/// Events are delivered strictly serialized: a subscriber never observes
/// overlapping open/close notifications. Debouncing happens upstream of
/// this contract.
pub trait ConnectionMonitor: Send + Sync {
    /// Registers a handler for connection-state changes.
    fn subscribe(&self, handler: ConnectionHandler) -> SubscriptionId;

    /// Removes a previously registered handler.
    ///
    /// Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// An in-process connection monitor.
///
/// Delivers events synchronously on the publisher's thread, which is
/// exactly the serialized delivery the contract promises. Used in tests
/// and in hosts that bridge their own session events into prefsync.
#[derive(Default)]
pub struct MemoryConnectionMonitor {
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<u64, ConnectionHandler>>,
}

impl MemoryConnectionMonitor {
    /// Creates a monitor with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Delivers a connection-state change to every subscriber.
    pub fn publish(&self, connected: bool) {
        let subscribers = self.subscribers.read();
        for handler in subscribers.values() {
            handler(connected);
        }
    }
}

impl ConnectionMonitor for MemoryConnectionMonitor {
    fn subscribe(&self, handler: ConnectionHandler) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.subscribers.write().insert(id, handler);
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.write().remove(&id.0);
    }
}
