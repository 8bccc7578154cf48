//! Error handling primitives shared across the core.
//!
//! Two families exist: [`StartupError`] is fatal and only ever produced while
//! loading the model artefact, [`PredictError`] is per request and always
//! converted into a structured response at the boundary.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::domain::EngineError;

/// Stable error codes emitted in logs and usable by embedders.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// A required feature was absent from the record.
    MissingFeature = 1,
    /// Strict validation rejected a feature value.
    InvalidFeature = 2,
    /// Request body was not a JSON object.
    MalformedRecord = 3,
    /// A non-numeric value reached vector assembly.
    InvalidValue = 4,
    /// The model engine failed while evaluating a vector.
    ModelFault = 5,
    /// Model artefact could not be read.
    ModelMissing = 6,
    /// Model artefact was read but rejected.
    ModelIncompatible = 7,
}

impl ErrorCode {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Failure while loading the model artefact. Never recovered from.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot read model artefact '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse model artefact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model artefact is incompatible: {0}")]
    Incompatible(String),
}

impl StartupError {
    pub fn incompatible(msg: impl Into<String>) -> Self {
        Self::Incompatible(msg.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            StartupError::Io { .. } => ErrorCode::ModelMissing,
            StartupError::Parse(_) | StartupError::Incompatible(_) => ErrorCode::ModelIncompatible,
        }
    }
}

/// Cause of an inference failure. Callers only ever see the message, the
/// variant drives the error code and logs.
#[derive(Debug, Error)]
pub enum InferenceFault {
    #[error("could not convert value of feature '{name}' to a number: {value}")]
    NonNumeric { name: &'static str, value: String },

    #[error(transparent)]
    Model(#[from] EngineError),
}

/// Canonical per-request error.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Missing feature: {name}")]
    MissingFeature { name: &'static str },

    #[error("Invalid feature: {name} ({reason})")]
    InvalidFeature { name: &'static str, reason: String },

    #[error("request body must be a JSON object")]
    MalformedRecord,

    #[error(transparent)]
    Inference(#[from] InferenceFault),
}

impl PredictError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PredictError::MissingFeature { .. } => ErrorCode::MissingFeature,
            PredictError::InvalidFeature { .. } => ErrorCode::InvalidFeature,
            PredictError::MalformedRecord => ErrorCode::MalformedRecord,
            PredictError::Inference(InferenceFault::NonNumeric { .. }) => ErrorCode::InvalidValue,
            PredictError::Inference(InferenceFault::Model(_)) => ErrorCode::ModelFault,
        }
    }

    /// Whether the caller is at fault. Inference failures are reported as
    /// server errors even when a bad value caused them.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PredictError::Inference(_))
    }
}

/// Result alias for request handling.
pub type PredictResult<T> = Result<T, PredictError>;
