//! Domain types for the loaded classifier.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::features::domain::FeatureVector;

/// Supported model kinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ModelKind {
    TabularLogistic,
    TabularGradientBoosting,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::TabularLogistic => "tabular_logistic",
            ModelKind::TabularGradientBoosting => "tabular_gbdt",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request engine failure.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("feature shape mismatch, expected: {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("model produced a non-finite score")]
    NonFiniteOutput,
}

/// Probability distribution over the two classes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClassProbabilities([f64; 2]);

impl ClassProbabilities {
    /// Distribution from the positive-class probability.
    pub fn from_positive(p: f64) -> Self {
        Self([1.0 - p, p])
    }

    /// Probability mass of class index `class`, if it exists.
    pub fn get(&self, class: usize) -> Option<f64> {
        self.0.get(class).copied()
    }

    pub fn positive(&self) -> f64 {
        self.0[1]
    }

    pub fn as_array(&self) -> [f64; 2] {
        self.0
    }

    /// Label under the model's decision rule.
    pub fn label(&self) -> u32 {
        if self.positive() > 0.5 {
            1
        } else {
            0
        }
    }
}

/// Evaluation contract implemented by every engine.
pub trait Classifier: fmt::Debug + Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Number of inputs the engine was built for.
    fn num_features(&self) -> usize;

    /// Raw score before the link function.
    fn margin(&self, row: &[f64]) -> f64;

    fn predict_proba(&self, vector: &FeatureVector) -> Result<ClassProbabilities, EngineError> {
        if vector.len() != self.num_features() {
            return Err(EngineError::ShapeMismatch {
                expected: self.num_features(),
                actual: vector.len(),
            });
        }
        let p = sigmoid(self.margin(vector.as_slice()));
        if !p.is_finite() {
            return Err(EngineError::NonFiniteOutput);
        }
        Ok(ClassProbabilities::from_positive(p))
    }

    fn predict(&self, vector: &FeatureVector) -> Result<u32, EngineError> {
        self.predict_proba(vector).map(|proba| proba.label())
    }
}

/// Descriptive metadata captured at load time.
#[derive(Clone, Debug)]
pub struct ModelMetadata {
    pub kind: ModelKind,
    pub artefact_path: PathBuf,
    pub fingerprint: String,
    /// Trees for boosted models, weights for linear ones.
    pub size: usize,
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub(crate) fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}
