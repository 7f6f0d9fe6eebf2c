//! Service layer: tracking queries/ingest and the trip simulator.

pub mod simulator;
pub mod tracking_service;

pub use simulator::TripSimulator;
pub use tracking_service::TrackingService;
