//! Broadcast channel for domain events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Every persisted
//! sample and simulation lifecycle transition publishes a
//! [`TrackingEvent`] through the bus, and all WebSocket connections
//! subscribe to receive filtered events.
//!
//! Delivery is best-effort: no replay, no per-observer retry. A receiver
//! that falls behind the ring buffer loses the oldest events.

use tokio::sync::broadcast;

use super::TrackingEvent;

/// Broadcast bus for [`TrackingEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity
/// (default 10 000). Created once at process start; the channel closes when
/// the last sender clone drops at shutdown.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TrackingEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: TrackingEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future events.
    ///
    /// Each WebSocket connection should call this once on connect.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TrackingEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
