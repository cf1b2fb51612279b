//! # Event Sinks
//!
//! Implementations of `VaultEventSink`.
//!
//! - `BroadcastEventSink` - fans events out over `tokio::sync::broadcast`
//! - `LoggingEventSink` - writes every event through `tracing`

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::domain::entities::VaultEvent;
use crate::ports::outbound::VaultEventSink;
use shared_types::short_hex;

/// Default broadcast channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Multi-consumer event fan-out.
///
/// Publishing never blocks; with no subscriber the event is dropped. Slow
/// subscribers observe `RecvError::Lagged`.
pub struct BroadcastEventSink {
    sender: broadcast::Sender<VaultEvent>,
    events_published: AtomicU64,
}

impl BroadcastEventSink {
    /// Create a sink with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create a sink with the given channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            events_published: AtomicU64::new(0),
        }
    }

    /// Subscribe to every subsequent event.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<VaultEvent> {
        debug!("[vault] New event subscription");
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total events handed to `publish`.
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl Default for BroadcastEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultEventSink for BroadcastEventSink {
    fn publish(&self, event: VaultEvent) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        // Err only means nobody is subscribed.
        let _ = self.sender.send(event);
    }
}

/// Writes events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventSink;

impl VaultEventSink for LoggingEventSink {
    fn publish(&self, event: VaultEvent) {
        match event {
            VaultEvent::KeySetRegistered {
                principal,
                total_keys,
                generation,
                ..
            } => info!(
                "[vault] 🔐 KeySetRegistered principal={} keys={} generation={}",
                short_hex(&principal),
                total_keys,
                generation
            ),
            VaultEvent::KeySetRotated {
                principal,
                total_keys,
                generation,
                ..
            } => info!(
                "[vault] 🔄 KeySetRotated principal={} keys={} generation={}",
                short_hex(&principal),
                total_keys,
                generation
            ),
            VaultEvent::KeySetRevoked {
                principal,
                generation,
            } => info!(
                "[vault] 🔓 KeySetRevoked principal={} generation={}",
                short_hex(&principal),
                generation
            ),
            VaultEvent::KeyConsumed {
                principal,
                key_index,
                remaining_keys,
            } => info!(
                "[vault] ✅ KeyConsumed principal={} index={} remaining={}",
                short_hex(&principal),
                key_index,
                remaining_keys
            ),
            VaultEvent::KeysExhausted {
                principal,
                generation,
            } => warn!(
                "[vault] ⚠️ KeysExhausted principal={} generation={}: rotate required",
                short_hex(&principal),
                generation
            ),
            VaultEvent::ProtectedTargetUpdated { target, protected } => info!(
                "[vault] 🛡️ ProtectedTargetUpdated target={} protected={}",
                short_hex(&target),
                protected
            ),
            VaultEvent::ThresholdUpdated { threshold } => {
                info!("[vault] 🛡️ ThresholdUpdated threshold={}", threshold)
            }
        }
    }
}
