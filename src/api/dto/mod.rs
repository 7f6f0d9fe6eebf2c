//! Data transfer objects for the REST API.

pub mod tracking_dto;

pub use tracking_dto::{
    CancelSimulationResponse, HistoryParams, ReportPositionRequest, SimulateTripResponse,
};
