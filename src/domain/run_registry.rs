//! Concurrent registry of active simulation runs.
//!
//! [`RunRegistry`] tracks every in-flight trip simulation so that a run can
//! be cancelled independently of the HTTP request that started it. Each
//! entry carries the run's [`CancellationToken`]; the background task
//! removes its own entry when it terminates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use super::SimulationId;
use crate::error::GatewayError;

/// Handle to one active simulation run.
#[derive(Debug, Clone)]
pub struct RunHandle {
    /// Run identifier.
    pub simulation_id: SimulationId,
    /// Employee being simulated.
    pub employee_id: i32,
    /// Number of interpolation steps planned for the run.
    pub steps: u32,
    /// Delay between waypoints, in seconds.
    pub interval_secs: u64,
    /// When the run was accepted.
    pub started_at: DateTime<Utc>,
    /// Cancellation signal observed at each iteration boundary.
    pub token: CancellationToken,
}

/// Serializable view of an active run for the listing endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Run identifier.
    pub simulation_id: SimulationId,
    /// Employee being simulated.
    pub employee_id: i32,
    /// Number of interpolation steps planned for the run.
    pub steps: u32,
    /// Delay between waypoints, in seconds.
    pub interval_secs: u64,
    /// When the run was accepted.
    pub started_at: DateTime<Utc>,
}

impl From<&RunHandle> for RunSummary {
    fn from(handle: &RunHandle) -> Self {
        Self {
            simulation_id: handle.simulation_id,
            employee_id: handle.employee_id,
            steps: handle.steps,
            interval_secs: handle.interval_secs,
            started_at: handle.started_at,
        }
    }
}

/// Central store for all active simulation runs.
///
/// Uses a `RwLock<HashMap<...>>`; handles are cheap clones (the token is
/// internally reference-counted), so reads copy out rather than holding
/// the lock across awaits.
#[derive(Debug, Default)]
pub struct RunRegistry {
    runs: RwLock<HashMap<SimulationId, RunHandle>>,
}

impl RunRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new run handle.
    pub async fn insert(&self, handle: RunHandle) {
        let mut map = self.runs.write().await;
        map.insert(handle.simulation_id, handle);
    }

    /// Signals cancellation for the given run. The entry stays in the
    /// registry until the run itself observes the token and removes it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SimulationNotFound`] if no active run with
    /// the given id exists.
    pub async fn cancel(&self, simulation_id: SimulationId) -> Result<(), GatewayError> {
        let map = self.runs.read().await;
        let handle = map
            .get(&simulation_id)
            .ok_or(GatewayError::SimulationNotFound(simulation_id))?;
        handle.token.cancel();
        Ok(())
    }

    /// Removes a run from the registry, returning its handle if present.
    /// Called by the background task itself on termination, so a missing
    /// entry is not an error.
    pub async fn remove(&self, simulation_id: SimulationId) -> Option<RunHandle> {
        let mut map = self.runs.write().await;
        map.remove(&simulation_id)
    }

    /// Signals cancellation for every active run. Used at process shutdown.
    pub async fn cancel_all(&self) {
        let map = self.runs.read().await;
        for handle in map.values() {
            handle.token.cancel();
        }
    }

    /// Returns summaries of all active runs.
    pub async fn list(&self) -> Vec<RunSummary> {
        let map = self.runs.read().await;
        map.values().map(RunSummary::from).collect()
    }

    /// Returns the number of active runs.
    pub async fn len(&self) -> usize {
        self.runs.read().await.len()
    }

    /// Returns `true` if no runs are active.
    pub async fn is_empty(&self) -> bool {
        self.runs.read().await.is_empty()
    }
}
