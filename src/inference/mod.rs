//! Inference domain: one synchronous prediction per request.

pub mod domain;
pub mod service;

pub use domain::{ErrorBody, PredictionResult};
pub use service::Predictor;
