//! PostgreSQL implementation of the location sample log.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{LocationSample, NewSample};
use crate::error::GatewayError;

/// PostgreSQL-backed sample store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends a sample to the `location_samples` table.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn save(&self, sample: NewSample) -> Result<LocationSample, GatewayError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO location_samples (employee_id, latitude, longitude, recorded_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(sample.employee_id)
        .bind(sample.latitude)
        .bind(sample.longitude)
        .bind(sample.recorded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(LocationSample {
            id,
            employee_id: sample.employee_id,
            latitude: sample.latitude,
            longitude: sample.longitude,
            recorded_at: sample.recorded_at,
        })
    }

    /// Loads the most recent sample for an employee.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn latest(&self, employee_id: i32) -> Result<Option<LocationSample>, GatewayError> {
        let row = sqlx::query_as::<_, (i64, i32, f64, f64, DateTime<Utc>)>(
            "SELECT id, employee_id, latitude, longitude, recorded_at \
             FROM location_samples WHERE employee_id = $1 \
             ORDER BY recorded_at DESC, id DESC LIMIT 1",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(row.map(Self::into_sample))
    }

    /// Loads samples recorded at or after `since`, newest first, bounded
    /// by `limit` (already clamped by the caller).
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn recent(
        &self,
        employee_id: i32,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<LocationSample>, GatewayError> {
        let rows = sqlx::query_as::<_, (i64, i32, f64, f64, DateTime<Utc>)>(
            "SELECT id, employee_id, latitude, longitude, recorded_at \
             FROM location_samples WHERE employee_id = $1 AND recorded_at >= $2 \
             ORDER BY recorded_at DESC, id DESC LIMIT $3",
        )
        .bind(employee_id)
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(rows.into_iter().map(Self::into_sample).collect())
    }

    fn into_sample(row: (i64, i32, f64, f64, DateTime<Utc>)) -> LocationSample {
        let (id, employee_id, latitude, longitude, recorded_at) = row;
        LocationSample {
            id,
            employee_id,
            latitude,
            longitude,
            recorded_at,
        }
    }
}
