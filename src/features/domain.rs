//! Feature schema, input records and the vectors fed to the model.
//!
//! The schema order is the column order the model was trained on. Permuting
//! it does not fail, it silently produces wrong predictions.

use serde_json::{Map, Value};

/// Number of features the model consumes.
pub const FEATURE_COUNT: usize = 21;

/// Untrusted request payload: feature name to scalar value. Extra keys are ignored.
pub type InputRecord = Map<String, Value>;

/// Whether feature values are checked before assembly.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Strictness {
    /// Only presence is checked; anything else surfaces from inference.
    #[default]
    Permissive,
    /// Values must be numeric, finite and inside the trained range.
    Strict,
}

/// A single named input and the range it was trained on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub integral: bool,
}

impl FeatureSpec {
    const fn flag(name: &'static str) -> Self {
        Self::ordinal(name, 0.0, 1.0)
    }

    const fn ordinal(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            min,
            max,
            integral: true,
        }
    }

    const fn continuous(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            min,
            max,
            integral: false,
        }
    }

    /// Check a numeric value against the trained range.
    pub fn check(&self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err("expected a finite number".to_string());
        }
        if value < self.min || value > self.max {
            return Err(format!(
                "expected a value between {} and {}, got {}",
                self.min, self.max, value
            ));
        }
        if self.integral && value.fract() != 0.0 {
            return Err(format!("expected a whole number, got {value}"));
        }
        Ok(())
    }
}

/// The canonical feature order. Single source of truth for validation and assembly.
pub const FEATURE_SCHEMA: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec::flag("HighBP"),
    FeatureSpec::flag("HighChol"),
    FeatureSpec::flag("CholCheck"),
    FeatureSpec::continuous("BMI", 12.0, 98.0),
    FeatureSpec::flag("Smoker"),
    FeatureSpec::flag("Stroke"),
    FeatureSpec::flag("HeartDiseaseorAttack"),
    FeatureSpec::flag("PhysActivity"),
    FeatureSpec::flag("Fruits"),
    FeatureSpec::flag("Veggies"),
    FeatureSpec::flag("HvyAlcoholConsump"),
    FeatureSpec::flag("AnyHealthcare"),
    FeatureSpec::flag("NoDocbcCost"),
    FeatureSpec::ordinal("GenHlth", 1.0, 5.0),
    FeatureSpec::ordinal("MentHlth", 0.0, 30.0),
    FeatureSpec::ordinal("PhysHlth", 0.0, 30.0),
    FeatureSpec::flag("DiffWalk"),
    FeatureSpec::flag("Sex"),
    FeatureSpec::ordinal("Age", 1.0, 13.0),
    FeatureSpec::ordinal("Education", 1.0, 6.0),
    FeatureSpec::ordinal("Income", 1.0, 8.0),
];

/// Feature names in schema order.
pub fn feature_names() -> impl Iterator<Item = &'static str> {
    FEATURE_SCHEMA.iter().map(|spec| spec.name)
}

/// One row of model input, ordered by [`FEATURE_SCHEMA`].
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Wrap raw values. Width is not enforced here; engines reject a mismatch.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
