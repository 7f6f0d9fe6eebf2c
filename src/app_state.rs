//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::{TrackingService, TripSimulator};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Tracking service for queries and position ingest.
    pub tracking: Arc<TrackingService>,
    /// Trip simulator for background run management.
    pub simulator: Arc<TripSimulator>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}
