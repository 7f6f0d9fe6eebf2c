//! Domain layer: core types, run registry, and event system.
//!
//! This module contains the server-side domain model including location
//! samples, trip plans, the event bus for broadcasting newly persisted
//! samples, and the registry of active simulation runs.

pub mod event_bus;
pub mod run_registry;
pub mod sample;
pub mod simulation_id;
pub mod tracking_event;
pub mod trip;

pub use event_bus::EventBus;
pub use run_registry::{RunHandle, RunRegistry, RunSummary};
pub use sample::{LocationSample, NewSample};
pub use simulation_id::SimulationId;
pub use tracking_event::{SampleSource, SimulationOutcome, TrackingEvent};
pub use trip::{TripPlan, TripRequest};
