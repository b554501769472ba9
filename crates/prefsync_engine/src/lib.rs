//! # prefsync engine
//!
//! Connection-triggered sync controller for device settings.
//!
//! The settings database does the filtering and bookkeeping; this crate
//! decides *when* to wake the generic sync layer. Sync is edge-triggered
//! on the connection transition: when the companion connects, the
//! controller asks the sync layer to reconcile the settings database,
//! and otherwise stays quiet. Record-level acknowledgement is the sync
//! layer's job, so the controller never retries - a "busy" answer means
//! a sync is already doing the work.
//!
//! ## Key Invariants
//!
//! - Exactly one sync request per connect transition, none on disconnect
//! - "Busy" and "no action required" are benign outcomes, never errors
//! - The manual trigger is a no-op unless initialized and connected
//! - No retries anywhere; the next connect or manual trigger is the
//!   retry

mod config;
mod events;
mod service;
mod trigger;

pub use config::TriggerConfig;
pub use events::{ConnectionHandler, ConnectionMonitor, MemoryConnectionMonitor, SubscriptionId};
pub use service::{MockSyncService, SyncService, SyncStatus};
pub use trigger::SyncTrigger;
