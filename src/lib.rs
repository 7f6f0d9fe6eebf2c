//! # fieldtrack-gateway
//!
//! REST API and WebSocket gateway for live field-employee location tracking.
//!
//! Employees (or the built-in trip simulator) report GPS samples; the
//! gateway persists them to an append-only log and fans each one out to
//! all connected WebSocket observers in near-real-time. Read endpoints
//! serve the latest position and bounded history windows.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── TrackingService (service/)
//!     ├── TripSimulator (service/)
//!     ├── EventBus, RunRegistry (domain/)
//!     │
//!     └── LocationStore (persistence/: PostgreSQL or in-memory)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
