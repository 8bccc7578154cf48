// lib.rs - central orchestrator
pub mod api;
pub mod common;
pub mod features;
pub mod inference;
pub mod model;

pub use features::{FeatureVector, InputRecord, Strictness, FEATURE_SCHEMA};
pub use inference::{PredictionResult, Predictor};
pub use model::ModelHandle;
