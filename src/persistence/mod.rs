//! Persistence layer: the append-only location sample log.
//!
//! [`LocationStore`] is the single seam the rest of the gateway talks to.
//! It dispatches to either the PostgreSQL backend (production) or the
//! in-memory backend (tests and `PERSISTENCE_ENABLED=false` demo mode).
//! Samples are append-only: the store only inserts and reads, never
//! updates or deletes.

pub mod memory;
pub mod postgres;

use chrono::{DateTime, Utc};

use crate::domain::{LocationSample, NewSample};
use crate::error::GatewayError;
use memory::MemoryStore;
use postgres::PostgresStore;

/// Minimum row count any `recent` query returns room for.
pub const MIN_RECENT_ROWS: i64 = 10;

/// Maximum row count any `recent` query may return.
pub const MAX_RECENT_ROWS: i64 = 1000;

/// Append-only store of location samples, queryable by employee.
///
/// Cheap to clone: both backends are handles around shared state, so a
/// background task can hold its own clone independent of any request
/// lifetime.
#[derive(Debug, Clone)]
pub enum LocationStore {
    /// PostgreSQL-backed store via `sqlx`.
    Postgres(PostgresStore),
    /// In-memory store for tests and persistence-disabled mode.
    Memory(MemoryStore),
}

impl LocationStore {
    /// Persists a validated sample, returning it with its assigned id.
    ///
    /// Each save is an independent, atomic single-row append; no
    /// transaction spans multiple samples.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on backend failure.
    pub async fn save(&self, sample: NewSample) -> Result<LocationSample, GatewayError> {
        match self {
            Self::Postgres(store) => store.save(sample).await,
            Self::Memory(store) => Ok(store.save(sample).await),
        }
    }

    /// Returns the sample with the greatest timestamp for the employee,
    /// or `None` if the employee has no samples.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on backend failure.
    pub async fn latest(&self, employee_id: i32) -> Result<Option<LocationSample>, GatewayError> {
        match self {
            Self::Postgres(store) => store.latest(employee_id).await,
            Self::Memory(store) => Ok(store.latest(employee_id).await),
        }
    }

    /// Returns samples recorded at or after `since`, descending by
    /// timestamp. `max_rows` is clamped to [10, 1000] here regardless of
    /// what the caller requests.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on backend failure.
    pub async fn recent(
        &self,
        employee_id: i32,
        since: DateTime<Utc>,
        max_rows: i64,
    ) -> Result<Vec<LocationSample>, GatewayError> {
        let limit = max_rows.clamp(MIN_RECENT_ROWS, MAX_RECENT_ROWS);
        match self {
            Self::Postgres(store) => store.recent(employee_id, since, limit).await,
            Self::Memory(store) => Ok(store.recent(employee_id, since, limit).await),
        }
    }
}
