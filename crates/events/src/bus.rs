//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the controller (the
//! only publisher) and any number of presentation subscribers.

use serde::Serialize;
use tokio::sync::broadcast;

use phm_core::alert::Alert;
use phm_core::ingest::RejectedMachine;
use phm_core::machine::FleetSnapshot;
use phm_core::summary::FleetSummary;
use phm_core::types::Timestamp;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// The outcome of one successful tick.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickEvent {
    /// Monotonic tick counter, starting at 1 for the initial load.
    pub tick: u64,
    pub generated_at: Timestamp,
    pub machines: FleetSnapshot,
    pub alerts: Vec<Alert>,
    pub summary: FleetSummary,
    pub rejected: Vec<RejectedMachine>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FleetEvent {
    /// A tick replaced the fleet state.
    Tick(TickEvent),
    /// A tick failed; subscribers keep showing the previous state.
    TickFailed { at: Timestamp, error: String },
}

impl FleetEvent {
    pub fn tick_failed(at: Timestamp, error: impl Into<String>) -> Self {
        Self::TickFailed {
            at,
            error: error.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 64;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use phm_events::bus::{EventBus, FleetEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(FleetEvent::tick_failed(chrono::Utc::now(), "source offline"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<FleetEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: FleetEvent) {
        // SendError only means there are zero receivers.
        if self.sender.send(event).is_err() {
            tracing::trace!("Fleet event dropped, no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FleetEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
