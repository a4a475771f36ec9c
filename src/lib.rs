//! Material fire-risk scoring.
//!
//! A one-time training pass turns the fire-properties export into a numeric
//! table, a proxy risk target and a frozen [`pipeline::stats::TrainingStats`]
//! snapshot; [`service::RiskService`] then scores single requests through the
//! same transform.

pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod request;
pub mod service;

#[cfg(test)]
mod fixtures;

pub use config::ServiceConfig;
pub use error::PipelineError;
pub use request::FirePropertiesInput;
pub use service::RiskService;
