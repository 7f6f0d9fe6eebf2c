//! Tracking handlers: latest, history, position ingest, and simulations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CancelSimulationResponse, HistoryParams, ReportPositionRequest, SimulateTripResponse,
};
use crate::app_state::AppState;
use crate::domain::{LocationSample, RunSummary, SimulationId, TripPlan, TripRequest};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /tracking/:employee_id/latest` — Most recent sample for an employee.
///
/// # Errors
///
/// Returns [`GatewayError::NoSamples`] if the employee has no samples.
#[utoipa::path(
    get,
    path = "/api/v1/tracking/{employee_id}/latest",
    tag = "Tracking",
    summary = "Latest location",
    description = "Returns the most recently recorded location sample for the employee.",
    params(
        ("employee_id" = i32, Path, description = "Employee identifier"),
    ),
    responses(
        (status = 200, description = "Latest sample", body = LocationSample),
        (status = 404, description = "No samples for this employee", body = ErrorResponse),
    )
)]
pub async fn get_latest(
    State(state): State<AppState>,
    Path(employee_id): Path<i32>,
) -> Result<impl IntoResponse, GatewayError> {
    let sample = state.tracking.latest(employee_id).await?;
    Ok(Json(sample))
}

/// `GET /tracking/:employee_id/history` — Recent samples, newest first.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on a non-positive employee id.
#[utoipa::path(
    get,
    path = "/api/v1/tracking/{employee_id}/history",
    tag = "Tracking",
    summary = "Location history",
    description = "Returns samples within the requested window (hours clamped to [1, 24], \
                   rows clamped to [10, 1000]), descending by timestamp. An employee with \
                   no matching samples gets an empty list.",
    params(
        ("employee_id" = i32, Path, description = "Employee identifier"),
        HistoryParams,
    ),
    responses(
        (status = 200, description = "Samples, newest first", body = Vec<LocationSample>),
        (status = 400, description = "Invalid employee id", body = ErrorResponse),
    )
)]
pub async fn get_history(
    State(state): State<AppState>,
    Path(employee_id): Path<i32>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let samples = state
        .tracking
        .history(employee_id, params.hours, params.max)
        .await?;
    Ok(Json(samples))
}

/// `POST /tracking/report` — Persist an explicitly reported position.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on out-of-domain coordinates
/// or a non-positive employee id.
#[utoipa::path(
    post,
    path = "/api/v1/tracking/report",
    tag = "Tracking",
    summary = "Report a position",
    description = "Validates and persists one location sample, then broadcasts it to all \
                   connected WebSocket observers.",
    request_body = ReportPositionRequest,
    responses(
        (status = 201, description = "Sample persisted", body = LocationSample),
        (status = 400, description = "Validation failure", body = ErrorResponse),
    )
)]
pub async fn report_position(
    State(state): State<AppState>,
    Json(req): Json<ReportPositionRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let sample = state
        .tracking
        .report_position(req.employee_id, req.latitude, req.longitude, req.recorded_at)
        .await?;
    Ok((StatusCode::CREATED, Json(sample)))
}

/// `POST /tracking/simulate-trip` — Accept and spawn a trip simulation.
///
/// The response is sent as soon as the run is spawned; waypoint generation
/// continues in the background, decoupled from this request's lifetime.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on a non-positive employee id
/// or out-of-domain coordinates.
#[utoipa::path(
    post,
    path = "/api/v1/tracking/simulate-trip",
    tag = "Tracking",
    summary = "Simulate a trip",
    description = "Generates linearly interpolated waypoints between two coordinates in a \
                   background run, persisting and broadcasting each one. Waypoint count is \
                   clamped to [50, 500] and the interval to [1, 2] seconds; the 202 body \
                   echoes the effective values.",
    request_body = TripRequest,
    responses(
        (status = 202, description = "Simulation accepted", body = SimulateTripResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse),
    )
)]
pub async fn simulate_trip(
    State(state): State<AppState>,
    Json(req): Json<TripRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let plan = TripPlan::from_request(&req)?;
    let simulation_id = state.simulator.start(plan.clone()).await;
    let response = SimulateTripResponse::from_plan(simulation_id, &plan);
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// `GET /tracking/simulations` — List active simulation runs.
#[utoipa::path(
    get,
    path = "/api/v1/tracking/simulations",
    tag = "Tracking",
    summary = "List active simulations",
    responses(
        (status = 200, description = "Active runs", body = Vec<RunSummary>),
    )
)]
pub async fn list_simulations(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.simulator.active().await)
}

/// `POST /tracking/simulations/:id/cancel` — Cancel an active run.
///
/// Cancellation is observed at the next iteration boundary; no further
/// points are persisted or broadcast after the run stops.
///
/// # Errors
///
/// Returns [`GatewayError::SimulationNotFound`] for an unknown or already
/// finished run.
#[utoipa::path(
    post,
    path = "/api/v1/tracking/simulations/{id}/cancel",
    tag = "Tracking",
    summary = "Cancel a simulation",
    params(
        ("id" = uuid::Uuid, Path, description = "Simulation run UUID"),
    ),
    responses(
        (status = 202, description = "Cancellation signalled", body = CancelSimulationResponse),
        (status = 404, description = "Unknown simulation", body = ErrorResponse),
    )
)]
pub async fn cancel_simulation(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let simulation_id = SimulationId::from_uuid(id);
    state.simulator.cancel(simulation_id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(CancelSimulationResponse {
            simulation_id,
            status: "cancellation_requested".to_string(),
        }),
    ))
}

/// Tracking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tracking/{employee_id}/latest", get(get_latest))
        .route("/tracking/{employee_id}/history", get(get_history))
        .route("/tracking/report", post(report_position))
        .route("/tracking/simulate-trip", post(simulate_trip))
        .route("/tracking/simulations", get(list_simulations))
        .route("/tracking/simulations/{id}/cancel", post(cancel_simulation))
}
