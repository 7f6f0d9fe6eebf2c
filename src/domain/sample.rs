//! Location samples: the single persisted record of this system.
//!
//! A [`LocationSample`] is one `(employee, latitude, longitude, timestamp)`
//! observation. Samples are append-only: created once by either a direct
//! position report or one step of the trip simulator, never updated or
//! deleted afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::GatewayError;

/// Valid latitude domain in decimal degrees.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Valid longitude domain in decimal degrees.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A persisted location sample with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    /// Monotonically increasing row id, assigned at persistence time.
    pub id: i64,
    /// Employee the sample belongs to.
    pub employee_id: i32,
    /// Latitude in decimal degrees, within [-90, 90].
    pub latitude: f64,
    /// Longitude in decimal degrees, within [-180, 180].
    pub longitude: f64,
    /// UTC instant the position was observed.
    pub recorded_at: DateTime<Utc>,
}

/// A validated sample awaiting persistence (no id yet).
///
/// Construction via [`NewSample::new`] is the single validation gate:
/// anything holding a `NewSample` carries in-domain coordinates and a
/// positive employee id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSample {
    /// Employee the sample belongs to.
    pub employee_id: i32,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// UTC instant the position was observed.
    pub recorded_at: DateTime<Utc>,
}

impl NewSample {
    /// Builds a validated sample. `recorded_at` defaults to now when the
    /// caller does not supply a timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the employee id is not
    /// positive or either coordinate falls outside its domain.
    pub fn new(
        employee_id: i32,
        latitude: f64,
        longitude: f64,
        recorded_at: Option<DateTime<Utc>>,
    ) -> Result<Self, GatewayError> {
        validate_employee_id(employee_id)?;
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            employee_id,
            latitude,
            longitude,
            recorded_at: recorded_at.unwrap_or_else(Utc::now),
        })
    }
}

/// Validates that an employee id is a positive identifier.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for zero or negative ids.
pub fn validate_employee_id(employee_id: i32) -> Result<(), GatewayError> {
    if employee_id <= 0 {
        return Err(GatewayError::InvalidRequest(format!(
            "employee id must be positive, got {employee_id}"
        )));
    }
    Ok(())
}

/// Validates a coordinate pair against the latitude/longitude domains.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] naming the offending value.
/// NaN is rejected by the range comparison.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), GatewayError> {
    if !(LATITUDE_RANGE.0..=LATITUDE_RANGE.1).contains(&latitude) {
        return Err(GatewayError::InvalidRequest(format!(
            "latitude {latitude} outside [{}, {}]",
            LATITUDE_RANGE.0, LATITUDE_RANGE.1
        )));
    }
    if !(LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&longitude) {
        return Err(GatewayError::InvalidRequest(format!(
            "longitude {longitude} outside [{}, {}]",
            LONGITUDE_RANGE.0, LONGITUDE_RANGE.1
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn valid_sample_is_accepted() {
        let result = NewSample::new(7, 12.9757, 77.6011, None);
        let Ok(sample) = result else {
            panic!("valid sample rejected");
        };
        assert_eq!(sample.employee_id, 7);
        assert!((sample.latitude - 12.9757).abs() < f64::EPSILON);
    }

    #[test]
    fn timestamp_defaults_to_now() {
        let before = Utc::now();
        let Ok(sample) = NewSample::new(1, 0.0, 0.0, None) else {
            panic!("valid sample rejected");
        };
        assert!(sample.recorded_at >= before);
        assert!(sample.recorded_at <= Utc::now());
    }

    #[test]
    fn explicit_timestamp_is_kept() {
        let ts = Utc::now() - chrono::Duration::hours(1);
        let Ok(sample) = NewSample::new(1, 0.0, 0.0, Some(ts)) else {
            panic!("valid sample rejected");
        };
        assert_eq!(sample.recorded_at, ts);
    }

    #[test]
    fn latitude_out_of_domain_rejected() {
        assert!(NewSample::new(1, 90.0001, 0.0, None).is_err());
        assert!(NewSample::new(1, -90.0001, 0.0, None).is_err());
    }

    #[test]
    fn longitude_out_of_domain_rejected() {
        assert!(NewSample::new(1, 0.0, 180.0001, None).is_err());
        assert!(NewSample::new(1, 0.0, -180.0001, None).is_err());
    }

    #[test]
    fn domain_boundaries_are_inclusive() {
        assert!(NewSample::new(1, 90.0, 180.0, None).is_ok());
        assert!(NewSample::new(1, -90.0, -180.0, None).is_ok());
    }

    #[test]
    fn nan_coordinates_rejected() {
        assert!(NewSample::new(1, f64::NAN, 0.0, None).is_err());
        assert!(NewSample::new(1, 0.0, f64::NAN, None).is_err());
    }

    #[test]
    fn non_positive_employee_id_rejected() {
        assert!(NewSample::new(0, 0.0, 0.0, None).is_err());
        assert!(NewSample::new(-5, 0.0, 0.0, None).is_err());
    }

    #[test]
    fn sample_serializes_camel_case() {
        let sample = LocationSample {
            id: 9,
            employee_id: 3,
            latitude: 1.5,
            longitude: 2.5,
            recorded_at: Utc::now(),
        };
        let json = serde_json::to_string(&sample).unwrap_or_default();
        assert!(json.contains("\"employeeId\":3"));
        assert!(json.contains("recordedAt"));
    }
}
