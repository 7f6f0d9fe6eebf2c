//! In-memory implementation of the location sample log.
//!
//! Used by the test suite and when the gateway runs with
//! `PERSISTENCE_ENABLED=false`. Mirrors the PostgreSQL backend's
//! semantics: monotonically increasing ids, newest-first ordering with id
//! as the tiebreaker.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{LocationSample, NewSample};

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: i64,
    samples: HashMap<i32, Vec<LocationSample>>,
}

/// In-memory sample store keyed by employee id.
///
/// Clones share the same underlying map, so a clone handed to a
/// background task sees the same data as the original.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryInner>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample, assigning the next id.
    pub async fn save(&self, sample: NewSample) -> LocationSample {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let stored = LocationSample {
            id: inner.next_id,
            employee_id: sample.employee_id,
            latitude: sample.latitude,
            longitude: sample.longitude,
            recorded_at: sample.recorded_at,
        };
        inner
            .samples
            .entry(sample.employee_id)
            .or_default()
            .push(stored.clone());
        stored
    }

    /// Returns the most recent sample for an employee, if any.
    pub async fn latest(&self, employee_id: i32) -> Option<LocationSample> {
        let inner = self.inner.read().await;
        inner
            .samples
            .get(&employee_id)?
            .iter()
            .max_by_key(|s| (s.recorded_at, s.id))
            .cloned()
    }

    /// Returns samples recorded at or after `since`, newest first, bounded
    /// by `limit` (already clamped by the caller).
    pub async fn recent(
        &self,
        employee_id: i32,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Vec<LocationSample> {
        let inner = self.inner.read().await;
        let Some(all) = inner.samples.get(&employee_id) else {
            return Vec::new();
        };
        let mut rows: Vec<LocationSample> = all
            .iter()
            .filter(|s| s.recorded_at >= since)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.recorded_at, b.id).cmp(&(a.recorded_at, a.id)));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        rows
    }

    /// Returns the total number of samples stored for an employee.
    pub async fn count(&self, employee_id: i32) -> usize {
        let inner = self.inner.read().await;
        inner.samples.get(&employee_id).map_or(0, Vec::len)
    }
}
