//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All tracking endpoints are mounted under `/api/v1`; system endpoints
//! (health) sit at the root. With the `swagger-ui` feature enabled, the
//! OpenAPI document is served at `/api-docs/openapi.json` with a UI at
//! `/swagger-ui`.

pub mod dto;
pub mod handlers;

use axum::Router;
#[cfg(feature = "swagger-ui")]
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document covering the tracking endpoints.
#[cfg(feature = "swagger-ui")]
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        handlers::tracking::get_latest,
        handlers::tracking::get_history,
        handlers::tracking::report_position,
        handlers::tracking::simulate_trip,
        handlers::tracking::list_simulations,
        handlers::tracking::cancel_simulation,
    ),
    components(schemas(
        crate::domain::LocationSample,
        crate::domain::TripRequest,
        crate::domain::RunSummary,
        crate::domain::SimulationId,
        dto::ReportPositionRequest,
        dto::SimulateTripResponse,
        dto::CancelSimulationResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    ))
)]
struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
