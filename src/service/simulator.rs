//! Trip simulator: background generation of interpolated waypoints.
//!
//! Each accepted [`TripPlan`] is run on a detached `tokio` task that owns
//! its own clone of the store handle, so the run outlives the HTTP request
//! that started it. The run observes its [`CancellationToken`] at every
//! iteration boundary: before computing a point and while sleeping between
//! points. Failures inside a run are logged and suppressed; they never
//! reach the original caller, who already received a 202.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    EventBus, NewSample, RunHandle, RunRegistry, RunSummary, SampleSource, SimulationId,
    SimulationOutcome, TrackingEvent, TripPlan,
};
use crate::error::GatewayError;
use crate::persistence::LocationStore;

/// Spawns and tracks trip simulation runs.
#[derive(Debug, Clone)]
pub struct TripSimulator {
    store: LocationStore,
    event_bus: EventBus,
    runs: Arc<RunRegistry>,
}

impl TripSimulator {
    /// Creates a new `TripSimulator`.
    #[must_use]
    pub fn new(store: LocationStore, event_bus: EventBus, runs: Arc<RunRegistry>) -> Self {
        Self {
            store,
            event_bus,
            runs,
        }
    }

    /// Accepts a validated plan and spawns its background run, returning
    /// the run id immediately.
    ///
    /// The spawned task gets its own clones of the store handle and event
    /// bus; nothing request-scoped crosses into it.
    pub async fn start(&self, plan: TripPlan) -> SimulationId {
        let simulation_id = SimulationId::new();
        let token = CancellationToken::new();

        self.runs
            .insert(RunHandle {
                simulation_id,
                employee_id: plan.employee_id,
                steps: plan.steps,
                interval_secs: plan.interval_secs,
                started_at: Utc::now(),
                token: token.clone(),
            })
            .await;

        let _ = self.event_bus.publish(TrackingEvent::SimulationStarted {
            simulation_id,
            employee_id: plan.employee_id,
            steps: plan.steps,
            interval_secs: plan.interval_secs,
            timestamp: Utc::now(),
        });

        tracing::info!(
            %simulation_id,
            employee_id = plan.employee_id,
            steps = plan.steps,
            interval_secs = plan.interval_secs,
            "simulation accepted"
        );

        let store = self.store.clone();
        let event_bus = self.event_bus.clone();
        let runs = Arc::clone(&self.runs);
        tokio::spawn(run_trip(store, event_bus, runs, plan, simulation_id, token));

        simulation_id
    }

    /// Signals cancellation for an active run.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SimulationNotFound`] if no run with the
    /// given id is active.
    pub async fn cancel(&self, simulation_id: SimulationId) -> Result<(), GatewayError> {
        self.runs.cancel(simulation_id).await?;
        tracing::info!(%simulation_id, "simulation cancellation requested");
        Ok(())
    }

    /// Returns summaries of all active runs.
    pub async fn active(&self) -> Vec<RunSummary> {
        self.runs.list().await
    }

    /// Cancels every active run. Called at process shutdown.
    pub async fn shutdown(&self) {
        self.runs.cancel_all().await;
    }
}

/// The generation loop for one simulation run.
///
/// Waypoints are persisted and broadcast strictly in index order; the loop
/// is sequential. Each point is timestamped at the moment it is computed.
async fn run_trip(
    store: LocationStore,
    event_bus: EventBus,
    runs: Arc<RunRegistry>,
    plan: TripPlan,
    simulation_id: SimulationId,
    token: CancellationToken,
) {
    let mut points_recorded: u32 = 0;
    let mut outcome = SimulationOutcome::Completed;

    for i in 0..=plan.steps {
        if token.is_cancelled() {
            outcome = SimulationOutcome::Cancelled;
            break;
        }

        let (latitude, longitude) = plan.waypoint(i);
        let sample = match NewSample::new(plan.employee_id, latitude, longitude, None) {
            Ok(sample) => sample,
            Err(e) => {
                tracing::error!(%simulation_id, employee_id = plan.employee_id, error = %e,
                    "waypoint validation failed");
                outcome = SimulationOutcome::Failed;
                break;
            }
        };

        match store.save(sample).await {
            Ok(stored) => {
                points_recorded += 1;
                let _ = event_bus.publish(TrackingEvent::SampleRecorded {
                    sample: stored,
                    source: SampleSource::Simulation,
                });
            }
            Err(e) => {
                tracing::error!(%simulation_id, employee_id = plan.employee_id, error = %e,
                    "simulation step failed to persist");
                outcome = SimulationOutcome::Failed;
                break;
            }
        }

        if i < plan.steps {
            tokio::select! {
                () = token.cancelled() => {
                    outcome = SimulationOutcome::Cancelled;
                    break;
                }
                () = tokio::time::sleep(Duration::from_secs(plan.interval_secs)) => {}
            }
        }
    }

    // Remove before announcing so observers of SimulationEnded never see
    // the run still listed as active.
    let _ = runs.remove(simulation_id).await;

    match outcome {
        SimulationOutcome::Completed => {
            tracing::info!(%simulation_id, employee_id = plan.employee_id, points_recorded,
                "simulation completed");
        }
        SimulationOutcome::Cancelled => {
            tracing::info!(%simulation_id, employee_id = plan.employee_id, points_recorded,
                "simulation cancelled");
        }
        SimulationOutcome::Failed => {
            tracing::warn!(%simulation_id, employee_id = plan.employee_id, points_recorded,
                "simulation failed");
        }
    }

    let _ = event_bus.publish(TrackingEvent::SimulationEnded {
        simulation_id,
        employee_id: plan.employee_id,
        outcome,
        points_recorded,
        timestamp: Utc::now(),
    });
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::TripRequest;
    use crate::persistence::memory::MemoryStore;
    use tokio::sync::broadcast;

    fn make_simulator() -> (TripSimulator, MemoryStore) {
        let memory = MemoryStore::new();
        let store = LocationStore::Memory(memory.clone());
        let event_bus = EventBus::new(4096);
        let runs = Arc::new(RunRegistry::new());
        (TripSimulator::new(store, event_bus, runs), memory)
    }

    fn small_plan(employee_id: i32, steps: u32) -> TripPlan {
        TripPlan {
            employee_id,
            start_latitude: 0.0,
            start_longitude: 0.0,
            end_latitude: 10.0,
            end_longitude: 10.0,
            steps,
            interval_secs: 1,
        }
    }

    /// Drains events until the run with `id` ends, returning the outcome,
    /// the reported point count, and the number of samples observed.
    async fn await_ended(
        rx: &mut broadcast::Receiver<TrackingEvent>,
        id: SimulationId,
    ) -> (SimulationOutcome, u32, u32) {
        let mut samples_seen = 0;
        loop {
            let event = rx.recv().await;
            let Ok(event) = event else {
                panic!("event bus closed before run ended");
            };
            match event {
                TrackingEvent::SampleRecorded { .. } => samples_seen += 1,
                TrackingEvent::SimulationEnded {
                    simulation_id,
                    outcome,
                    points_recorded,
                    ..
                } if simulation_id == id => return (outcome, points_recorded, samples_seen),
                _ => {}
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn full_run_emits_steps_plus_one_points() {
        let (simulator, memory) = make_simulator();
        let mut rx = simulator.event_bus.subscribe();

        let id = simulator.start(small_plan(1, 4)).await;
        let (outcome, points, seen) = await_ended(&mut rx, id).await;

        assert_eq!(outcome, SimulationOutcome::Completed);
        assert_eq!(points, 5);
        assert_eq!(seen, 5);
        assert_eq!(memory.count(1).await, 5);
        assert!(simulator.runs.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn clamped_request_runs_fifty_one_iterations() {
        let (simulator, memory) = make_simulator();
        let mut rx = simulator.event_bus.subscribe();

        let request = TripRequest {
            employee_id: 2,
            start_latitude: Some(0.0),
            start_longitude: Some(0.0),
            end_latitude: Some(1.0),
            end_longitude: Some(1.0),
            waypoints: Some(10),
            interval_seconds: Some(1),
        };
        let Ok(plan) = TripPlan::from_request(&request) else {
            panic!("valid request rejected");
        };

        let id = simulator.start(plan).await;
        let (outcome, points, _) = await_ended(&mut rx, id).await;

        assert_eq!(outcome, SimulationOutcome::Completed);
        assert_eq!(points, 51);
        assert_eq!(memory.count(2).await, 51);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_cleanly_at_iteration_boundary() {
        let (simulator, memory) = make_simulator();
        let mut rx = simulator.event_bus.subscribe();

        let id = simulator.start(small_plan(3, 400)).await;

        // Let a few points flow, then cancel.
        let mut early_samples: u32 = 0;
        while early_samples < 3 {
            let event = rx.recv().await;
            let Ok(event) = event else {
                panic!("event bus closed");
            };
            if matches!(event, TrackingEvent::SampleRecorded { .. }) {
                early_samples += 1;
            }
        }
        let result = simulator.cancel(id).await;
        assert!(result.is_ok());

        let (outcome, points, seen) = await_ended(&mut rx, id).await;
        assert_eq!(outcome, SimulationOutcome::Cancelled);
        assert!(points < 401);

        // Everything broadcast was persisted and nothing more: no partial
        // k+1th row, no samples after the end event.
        assert_eq!(points, early_samples + seen);
        assert_eq!(memory.count(3).await as u32, points);
        assert!(rx.try_recv().is_err());
        assert!(simulator.runs.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_runs_stay_independent() {
        let (simulator, memory) = make_simulator();
        let mut rx = simulator.event_bus.subscribe();

        let id_a = simulator.start(small_plan(10, 4)).await;
        let id_b = simulator.start(small_plan(11, 4)).await;

        let mut ended = 0;
        while ended < 2 {
            let event = rx.recv().await;
            let Ok(event) = event else {
                panic!("event bus closed");
            };
            if let TrackingEvent::SimulationEnded {
                simulation_id,
                outcome,
                ..
            } = event
            {
                assert!(simulation_id == id_a || simulation_id == id_b);
                assert_eq!(outcome, SimulationOutcome::Completed);
                ended += 1;
            }
        }

        // Each employee has its full, well-ordered sequence.
        for employee_id in [10, 11] {
            assert_eq!(memory.count(employee_id).await, 5);
            let since = Utc::now() - chrono::Duration::hours(1);
            let rows = memory.recent(employee_id, since, 100).await;
            for pair in rows.windows(2) {
                let [newer, older] = pair else {
                    panic!("window of two");
                };
                assert!(newer.id > older.id);
                assert!(newer.recorded_at >= older.recorded_at);
                // Interpolation runs start → end, so newer rows sit closer
                // to the end latitude.
                assert!(newer.latitude >= older.latitude);
            }
        }
    }

    #[tokio::test]
    async fn cancel_unknown_run_is_not_found() {
        let (simulator, _) = make_simulator();
        let result = simulator.cancel(SimulationId::new()).await;
        let Err(GatewayError::SimulationNotFound(_)) = result else {
            panic!("expected SimulationNotFound");
        };
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_active_runs() {
        let (simulator, _) = make_simulator();
        let mut rx = simulator.event_bus.subscribe();

        let id = simulator.start(small_plan(7, 400)).await;
        simulator.shutdown().await;

        let (outcome, _, _) = await_ended(&mut rx, id).await;
        assert_eq!(outcome, SimulationOutcome::Cancelled);
    }
}
