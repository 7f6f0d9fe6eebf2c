//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes an enveloped event to the client
//! for every published tracking event. Delivery is best-effort: events
//! published while a client is disconnected are not redelivered; the
//! client catches up by pulling `latest`/`history` over REST.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
