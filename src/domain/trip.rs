//! Trip simulation requests and validated run plans.
//!
//! [`TripRequest`] is the raw, caller-supplied shape; [`TripPlan`] is the
//! validated and clamped form the simulator actually runs. The conversion
//! in [`TripPlan::from_request`] is the single place where defaulting and
//! clamping policy lives, so it is tested once rather than re-derived in
//! every layer.

use serde::Deserialize;
use utoipa::ToSchema;

use super::sample::{validate_coordinates, validate_employee_id};
use crate::error::GatewayError;

/// Minimum number of interpolation steps per run. Enforced as a floor even
/// when the caller requests fewer waypoints.
pub const MIN_WAYPOINTS: u32 = 50;

/// Maximum number of interpolation steps per run.
pub const MAX_WAYPOINTS: u32 = 500;

/// Default number of interpolation steps.
pub const DEFAULT_WAYPOINTS: u32 = 60;

/// Minimum delay between waypoints, in seconds.
pub const MIN_INTERVAL_SECS: u64 = 1;

/// Maximum delay between waypoints, in seconds.
pub const MAX_INTERVAL_SECS: u64 = 2;

/// Default start point: MG Road, Bengaluru.
pub const DEFAULT_START: (f64, f64) = (12.9757, 77.6011);

/// Default end point: Kempegowda International Airport, roughly 30 km from
/// the default start.
pub const DEFAULT_END: (f64, f64) = (13.1989, 77.7068);

/// Raw trip simulation request as received from the client.
///
/// Everything except the employee id is optional; missing fields fall back
/// to the documented defaults during plan construction.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    /// Employee to simulate. Must be positive.
    pub employee_id: i32,
    /// Start latitude. Defaults to MG Road, Bengaluru.
    pub start_latitude: Option<f64>,
    /// Start longitude.
    pub start_longitude: Option<f64>,
    /// End latitude. Defaults to Kempegowda International Airport.
    pub end_latitude: Option<f64>,
    /// End longitude.
    pub end_longitude: Option<f64>,
    /// Requested number of waypoints. Clamped to [50, 500], default 60.
    pub waypoints: Option<u32>,
    /// Requested delay between waypoints in seconds. Clamped to [1, 2],
    /// default 1.
    pub interval_seconds: Option<u64>,
}

/// Validated, clamped parameters for one simulation run.
///
/// Ephemeral: constructed per request, consumed by exactly one run, never
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    /// Employee to simulate (positive).
    pub employee_id: i32,
    /// Start latitude in decimal degrees.
    pub start_latitude: f64,
    /// Start longitude in decimal degrees.
    pub start_longitude: f64,
    /// End latitude in decimal degrees.
    pub end_latitude: f64,
    /// End longitude in decimal degrees.
    pub end_longitude: f64,
    /// Number of interpolation steps; the run emits `steps + 1` points
    /// (indices `0..=steps`).
    pub steps: u32,
    /// Effective delay between waypoints, in seconds.
    pub interval_secs: u64,
}

impl TripPlan {
    /// Validates and clamps a raw request into a runnable plan.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the employee id is not
    /// positive or any supplied coordinate is outside its domain. A
    /// degenerate trip (start == end) is valid and produces identical
    /// repeated points.
    pub fn from_request(request: &TripRequest) -> Result<Self, GatewayError> {
        validate_employee_id(request.employee_id)?;

        let start_latitude = request.start_latitude.unwrap_or(DEFAULT_START.0);
        let start_longitude = request.start_longitude.unwrap_or(DEFAULT_START.1);
        let end_latitude = request.end_latitude.unwrap_or(DEFAULT_END.0);
        let end_longitude = request.end_longitude.unwrap_or(DEFAULT_END.1);

        validate_coordinates(start_latitude, start_longitude)?;
        validate_coordinates(end_latitude, end_longitude)?;

        let steps = request
            .waypoints
            .unwrap_or(DEFAULT_WAYPOINTS)
            .clamp(MIN_WAYPOINTS, MAX_WAYPOINTS);
        let interval_secs = request
            .interval_seconds
            .unwrap_or(MIN_INTERVAL_SECS)
            .clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS);

        Ok(Self {
            employee_id: request.employee_id,
            start_latitude,
            start_longitude,
            end_latitude,
            end_longitude,
            steps,
            interval_secs,
        })
    }

    /// Computes the interpolated waypoint at step `i` (of `0..=steps`).
    ///
    /// Latitude and longitude are interpolated independently:
    /// `value = start + (end - start) * i / steps`.
    #[must_use]
    pub fn waypoint(&self, i: u32) -> (f64, f64) {
        let progress = f64::from(i.min(self.steps)) / f64::from(self.steps);
        (
            self.start_latitude + (self.end_latitude - self.start_latitude) * progress,
            self.start_longitude + (self.end_longitude - self.start_longitude) * progress,
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn request(employee_id: i32) -> TripRequest {
        TripRequest {
            employee_id,
            start_latitude: None,
            start_longitude: None,
            end_latitude: None,
            end_longitude: None,
            waypoints: None,
            interval_seconds: None,
        }
    }

    #[test]
    fn defaults_apply_when_fields_omitted() {
        let Ok(plan) = TripPlan::from_request(&request(1)) else {
            panic!("valid request rejected");
        };
        assert_eq!(plan.steps, DEFAULT_WAYPOINTS);
        assert_eq!(plan.interval_secs, 1);
        assert!((plan.start_latitude - DEFAULT_START.0).abs() < f64::EPSILON);
        assert!((plan.end_longitude - DEFAULT_END.1).abs() < f64::EPSILON);
    }

    #[test]
    fn waypoint_floor_of_fifty_applies() {
        let mut req = request(1);
        req.waypoints = Some(10);
        let Ok(plan) = TripPlan::from_request(&req) else {
            panic!("valid request rejected");
        };
        // 10 requested waypoints become 50 steps: 51 points at 0..=50.
        assert_eq!(plan.steps, 50);
    }

    #[test]
    fn waypoint_ceiling_applies() {
        let mut req = request(1);
        req.waypoints = Some(10_000);
        let Ok(plan) = TripPlan::from_request(&req) else {
            panic!("valid request rejected");
        };
        assert_eq!(plan.steps, MAX_WAYPOINTS);
    }

    #[test]
    fn interval_clamps_to_two_seconds() {
        let mut req = request(1);
        req.interval_seconds = Some(5);
        let Ok(plan) = TripPlan::from_request(&req) else {
            panic!("valid request rejected");
        };
        assert_eq!(plan.interval_secs, 2);
    }

    #[test]
    fn non_positive_employee_rejected() {
        assert!(TripPlan::from_request(&request(0)).is_err());
        assert!(TripPlan::from_request(&request(-3)).is_err());
    }

    #[test]
    fn out_of_domain_coordinates_rejected() {
        let mut req = request(1);
        req.start_latitude = Some(91.0);
        assert!(TripPlan::from_request(&req).is_err());

        let mut req = request(1);
        req.end_longitude = Some(-181.0);
        assert!(TripPlan::from_request(&req).is_err());
    }

    #[test]
    fn interpolation_is_linear() {
        let plan = TripPlan {
            employee_id: 1,
            start_latitude: 0.0,
            start_longitude: 0.0,
            end_latitude: 100.0,
            end_longitude: -100.0,
            steps: 4,
            interval_secs: 1,
        };
        let lats: Vec<f64> = (0..=4).map(|i| plan.waypoint(i).0).collect();
        assert_eq!(lats, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        let lons: Vec<f64> = (0..=4).map(|i| plan.waypoint(i).1).collect();
        assert_eq!(lons, vec![0.0, -25.0, -50.0, -75.0, -100.0]);
    }

    #[test]
    fn degenerate_trip_repeats_the_same_point() {
        let plan = TripPlan {
            employee_id: 1,
            start_latitude: 12.5,
            start_longitude: 77.5,
            end_latitude: 12.5,
            end_longitude: 77.5,
            steps: 50,
            interval_secs: 1,
        };
        for i in [0, 25, 50] {
            let (lat, lon) = plan.waypoint(i);
            assert!((lat - 12.5).abs() < f64::EPSILON);
            assert!((lon - 77.5).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn waypoint_index_saturates_at_steps() {
        let plan = TripPlan {
            employee_id: 1,
            start_latitude: 0.0,
            start_longitude: 0.0,
            end_latitude: 10.0,
            end_longitude: 10.0,
            steps: 4,
            interval_secs: 1,
        };
        assert_eq!(plan.waypoint(99), plan.waypoint(4));
    }

    #[test]
    fn request_deserializes_camel_case() {
        let json = r#"{
            "employeeId": 12,
            "startLatitude": 1.0,
            "startLongitude": 2.0,
            "endLatitude": 3.0,
            "endLongitude": 4.0,
            "waypoints": 80,
            "intervalSeconds": 2
        }"#;
        let Ok(req) = serde_json::from_str::<TripRequest>(json) else {
            panic!("deserialization failed");
        };
        assert_eq!(req.employee_id, 12);
        assert_eq!(req.waypoints, Some(80));
    }
}
