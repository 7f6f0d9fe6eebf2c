//! Domain events for the tracking pipeline.
//!
//! Every persisted sample and every simulation lifecycle transition emits a
//! [`TrackingEvent`] through the [`super::EventBus`]. Events are broadcast
//! to WebSocket subscribers; they are not persisted or replayed — an
//! observer that missed an event catches up by pulling history.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{LocationSample, SimulationId};

/// How a sample entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleSource {
    /// An explicit "report my position" call.
    Report,
    /// One step of a trip simulation run.
    Simulation,
}

/// Why a simulation run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationOutcome {
    /// The run produced every planned waypoint.
    Completed,
    /// The run observed its cancellation token and stopped early.
    Cancelled,
    /// The run hit an unexpected error and stopped early.
    Failed,
}

/// Domain event emitted on every tracking state change.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum TrackingEvent {
    /// Emitted after every sample is persisted, whether it originated from
    /// a direct report or a simulation step.
    SampleRecorded {
        /// The persisted sample, with its assigned id.
        sample: LocationSample,
        /// How the sample entered the system.
        source: SampleSource,
    },

    /// Emitted when a trip simulation run is accepted and spawned.
    SimulationStarted {
        /// Run identifier.
        simulation_id: SimulationId,
        /// Employee being simulated.
        employee_id: i32,
        /// Number of interpolation steps (the run emits `steps + 1` points).
        steps: u32,
        /// Effective delay between waypoints, in seconds.
        interval_secs: u64,
        /// Acceptance timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a trip simulation run terminates for any reason.
    SimulationEnded {
        /// Run identifier.
        simulation_id: SimulationId,
        /// Employee that was simulated.
        employee_id: i32,
        /// How the run terminated.
        outcome: SimulationOutcome,
        /// Number of waypoints actually persisted before termination.
        points_recorded: u32,
        /// Termination timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl TrackingEvent {
    /// Returns the employee id associated with this event.
    #[must_use]
    pub fn employee_id(&self) -> i32 {
        match self {
            Self::SampleRecorded { sample, .. } => sample.employee_id,
            Self::SimulationStarted { employee_id, .. }
            | Self::SimulationEnded { employee_id, .. } => *employee_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::SampleRecorded { .. } => "sample_recorded",
            Self::SimulationStarted { .. } => "simulation_started",
            Self::SimulationEnded { .. } => "simulation_ended",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_sample(employee_id: i32) -> LocationSample {
        LocationSample {
            id: 1,
            employee_id,
            latitude: 12.9757,
            longitude: 77.6011,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn sample_recorded_event_type() {
        let event = TrackingEvent::SampleRecorded {
            sample: make_sample(3),
            source: SampleSource::Report,
        };
        assert_eq!(event.event_type_str(), "sample_recorded");
        assert_eq!(event.employee_id(), 3);
    }

    #[test]
    fn sample_recorded_serializes() {
        let event = TrackingEvent::SampleRecorded {
            sample: make_sample(3),
            source: SampleSource::Simulation,
        };
        let json = serde_json::to_string(&event);
        assert!(json.is_ok());
        let json_str = json.unwrap_or_default();
        assert!(json_str.contains("sample_recorded"));
        assert!(json_str.contains("\"employeeId\":3"));
        assert!(json_str.contains("simulation"));
    }

    #[test]
    fn simulation_ended_carries_outcome() {
        let event = TrackingEvent::SimulationEnded {
            simulation_id: SimulationId::new(),
            employee_id: 9,
            outcome: SimulationOutcome::Cancelled,
            points_recorded: 12,
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "simulation_ended");
        assert_eq!(event.employee_id(), 9);
        let json_str = serde_json::to_string(&event).unwrap_or_default();
        assert!(json_str.contains("cancelled"));
    }
}
