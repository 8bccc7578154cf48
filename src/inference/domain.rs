//! Request outcome types shaped for the response boundary.

use serde::{Deserialize, Serialize};

use crate::common::error::PredictError;

/// Successful prediction: class label and positive-class probability.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: i64,
    pub probability: f64,
}

/// Body returned for every rejected request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&PredictError> for ErrorBody {
    fn from(err: &PredictError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
