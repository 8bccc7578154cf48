//! Logistic regression over the raw feature vector.

use super::domain::{Classifier, ModelKind};

#[derive(Clone, Debug)]
pub struct LogisticModel {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LogisticModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }
}

impl Classifier for LogisticModel {
    fn kind(&self) -> ModelKind {
        ModelKind::TabularLogistic
    }

    fn num_features(&self) -> usize {
        self.coefficients.len()
    }

    fn margin(&self, row: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(row)
            .fold(self.intercept, |acc, (w, x)| acc + w * x)
    }
}
