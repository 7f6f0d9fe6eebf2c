//! Tracking DTOs for ingest, history, and simulation endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{SimulationId, TripPlan};

/// Request body for `POST /tracking/report`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportPositionRequest {
    /// Employee reporting the position. Must be positive.
    pub employee_id: i32,
    /// Latitude in decimal degrees, within [-90, 90].
    pub latitude: f64,
    /// Longitude in decimal degrees, within [-180, 180].
    pub longitude: f64,
    /// Observation instant. Defaults to the server's current time.
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Query parameters for `GET /tracking/{employee_id}/history`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct HistoryParams {
    /// Window size in hours, clamped to [1, 24]. Defaults to 4.
    pub hours: Option<i64>,
    /// Maximum rows returned, clamped to [10, 1000]. Defaults to 200.
    pub max: Option<i64>,
}

/// Response body for `POST /tracking/simulate-trip` (202 Accepted).
///
/// Echoes the parameters as actually accepted, after defaulting and
/// clamping, so the caller sees the effective plan.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulateTripResponse {
    /// Identifier of the spawned run; use it to cancel.
    pub simulation_id: SimulationId,
    /// Employee being simulated.
    pub employee_id: i32,
    /// Effective start latitude.
    pub start_latitude: f64,
    /// Effective start longitude.
    pub start_longitude: f64,
    /// Effective end latitude.
    pub end_latitude: f64,
    /// Effective end longitude.
    pub end_longitude: f64,
    /// Effective number of interpolation steps after clamping.
    pub waypoints: u32,
    /// Effective delay between waypoints after clamping, in seconds.
    pub interval_seconds: u64,
    /// Server acceptance timestamp.
    pub accepted_at: DateTime<Utc>,
}

impl SimulateTripResponse {
    /// Builds the acceptance echo from the effective plan.
    #[must_use]
    pub fn from_plan(simulation_id: SimulationId, plan: &TripPlan) -> Self {
        Self {
            simulation_id,
            employee_id: plan.employee_id,
            start_latitude: plan.start_latitude,
            start_longitude: plan.start_longitude,
            end_latitude: plan.end_latitude,
            end_longitude: plan.end_longitude,
            waypoints: plan.steps,
            interval_seconds: plan.interval_secs,
            accepted_at: Utc::now(),
        }
    }
}

/// Response body for `POST /tracking/simulations/{id}/cancel` (202).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelSimulationResponse {
    /// Run the cancellation was signalled for.
    pub simulation_id: SimulationId,
    /// Always `"cancellation_requested"`; the run terminates within one
    /// iteration boundary.
    pub status: String,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn report_request_deserializes_camel_case() {
        let json = r#"{"employeeId": 4, "latitude": 12.0, "longitude": 77.0}"#;
        let Ok(req) = serde_json::from_str::<ReportPositionRequest>(json) else {
            panic!("deserialization failed");
        };
        assert_eq!(req.employee_id, 4);
        assert!(req.recorded_at.is_none());
    }

    #[test]
    fn simulate_response_echoes_clamped_plan() {
        let plan = TripPlan {
            employee_id: 2,
            start_latitude: 1.0,
            start_longitude: 2.0,
            end_latitude: 3.0,
            end_longitude: 4.0,
            steps: 50,
            interval_secs: 2,
        };
        let response = SimulateTripResponse::from_plan(SimulationId::new(), &plan);
        assert_eq!(response.waypoints, 50);
        assert_eq!(response.interval_seconds, 2);

        let json = serde_json::to_string(&response).unwrap_or_default();
        assert!(json.contains("simulationId"));
        assert!(json.contains("intervalSeconds"));
    }
}
