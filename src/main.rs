//! fieldtrack-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fieldtrack_gateway::api;
use fieldtrack_gateway::app_state::AppState;
use fieldtrack_gateway::config::GatewayConfig;
use fieldtrack_gateway::domain::{EventBus, RunRegistry};
use fieldtrack_gateway::persistence::LocationStore;
use fieldtrack_gateway::persistence::memory::MemoryStore;
use fieldtrack_gateway::persistence::postgres::PostgresStore;
use fieldtrack_gateway::service::{TrackingService, TripSimulator};
use fieldtrack_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting fieldtrack-gateway");

    // Build the sample store
    let store = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        LocationStore::Postgres(PostgresStore::new(pool))
    } else {
        tracing::warn!("persistence disabled; samples are held in memory only");
        LocationStore::Memory(MemoryStore::new())
    };

    // Build domain layer
    let event_bus = EventBus::new(config.event_bus_capacity);
    let run_registry = Arc::new(RunRegistry::new());

    // Build service layer
    let tracking = Arc::new(TrackingService::new(store.clone(), event_bus.clone()));
    let simulator = Arc::new(TripSimulator::new(store, event_bus.clone(), run_registry));

    // Build application state
    let app_state = AppState {
        tracking,
        simulator: Arc::clone(&simulator),
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received; cancelling active simulations");
            simulator.shutdown().await;
        })
        .await?;

    Ok(())
}
