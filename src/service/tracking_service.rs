//! Tracking service: position ingest and sanitized read queries.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{EventBus, LocationSample, NewSample, SampleSource, TrackingEvent};
use crate::error::GatewayError;
use crate::persistence::LocationStore;

/// Minimum history window, in hours.
pub const MIN_HISTORY_HOURS: i64 = 1;

/// Maximum history window, in hours.
pub const MAX_HISTORY_HOURS: i64 = 24;

/// Default history window, in hours.
pub const DEFAULT_HISTORY_HOURS: i64 = 4;

/// Default row bound for history queries.
pub const DEFAULT_HISTORY_ROWS: i64 = 200;

/// Read/ingest layer over the [`LocationStore`].
///
/// Stateless coordinator: every ingest follows the pattern validate →
/// persist → broadcast; every read sanitizes its inputs before delegating
/// to the store.
#[derive(Debug, Clone)]
pub struct TrackingService {
    store: LocationStore,
    event_bus: EventBus,
}

impl TrackingService {
    /// Creates a new `TrackingService`.
    #[must_use]
    pub fn new(store: LocationStore, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a clone of the store handle.
    #[must_use]
    pub fn store(&self) -> LocationStore {
        self.store.clone()
    }

    /// Persists an explicitly reported position and broadcasts it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on a bad employee id or
    /// out-of-domain coordinates, or a persistence error on store failure.
    pub async fn report_position(
        &self,
        employee_id: i32,
        latitude: f64,
        longitude: f64,
        recorded_at: Option<DateTime<Utc>>,
    ) -> Result<LocationSample, GatewayError> {
        let sample = NewSample::new(employee_id, latitude, longitude, recorded_at)?;
        let stored = self.store.save(sample).await?;

        let _ = self.event_bus.publish(TrackingEvent::SampleRecorded {
            sample: stored.clone(),
            source: SampleSource::Report,
        });

        tracing::info!(employee_id, sample_id = stored.id, "position reported");
        Ok(stored)
    }

    /// Returns the latest sample for an employee.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NoSamples`] if the employee has no samples,
    /// [`GatewayError::InvalidRequest`] on a non-positive id, or a
    /// persistence error on store failure.
    pub async fn latest(&self, employee_id: i32) -> Result<LocationSample, GatewayError> {
        crate::domain::sample::validate_employee_id(employee_id)?;
        self.store
            .latest(employee_id)
            .await?
            .ok_or(GatewayError::NoSamples(employee_id))
    }

    /// Returns history within a clamped time window, newest first.
    ///
    /// `hours` is clamped to [1, 24] (default 4) and translated into a
    /// `since` cutoff; `max_rows` defaults to 200 and is bounded by the
    /// store's [10, 1000] clamp. An employee with no matching samples gets
    /// an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on a non-positive id, or a
    /// persistence error on store failure.
    pub async fn history(
        &self,
        employee_id: i32,
        hours: Option<i64>,
        max_rows: Option<i64>,
    ) -> Result<Vec<LocationSample>, GatewayError> {
        crate::domain::sample::validate_employee_id(employee_id)?;

        let hours = hours
            .unwrap_or(DEFAULT_HISTORY_HOURS)
            .clamp(MIN_HISTORY_HOURS, MAX_HISTORY_HOURS);
        let since = Utc::now() - Duration::hours(hours);
        let max_rows = max_rows.unwrap_or(DEFAULT_HISTORY_ROWS);

        self.store.recent(employee_id, since, max_rows).await
    }
}
