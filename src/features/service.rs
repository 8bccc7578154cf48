//! Record validation and projection into the model's column order.

use serde_json::Value;

use crate::common::error::{InferenceFault, PredictError, PredictResult};

use super::domain::{FeatureVector, InputRecord, FEATURE_SCHEMA};

/// Check every schema field is present, in schema order. Stops at the first gap.
pub fn ensure_present(record: &InputRecord) -> PredictResult<()> {
    match FEATURE_SCHEMA
        .iter()
        .find(|spec| !record.contains_key(spec.name))
    {
        Some(spec) => Err(PredictError::MissingFeature { name: spec.name }),
        None => Ok(()),
    }
}

/// Range and type validation used in strict mode. Assumes presence was checked.
pub fn validate_strict(record: &InputRecord) -> PredictResult<()> {
    for spec in FEATURE_SCHEMA.iter() {
        let Some(raw) = record.get(spec.name) else {
            return Err(PredictError::MissingFeature { name: spec.name });
        };
        let value = as_number(raw).ok_or_else(|| PredictError::InvalidFeature {
            name: spec.name,
            reason: format!("expected a number, got {raw}"),
        })?;
        spec.check(value)
            .map_err(|reason| PredictError::InvalidFeature {
                name: spec.name,
                reason,
            })?;
    }
    Ok(())
}

/// Build the ordered feature vector. Values are read, not re-validated:
/// a non-numeric value is reported as an inference failure.
pub fn assemble(record: &InputRecord) -> PredictResult<FeatureVector> {
    let mut values = Vec::with_capacity(FEATURE_SCHEMA.len());
    for spec in FEATURE_SCHEMA.iter() {
        let Some(raw) = record.get(spec.name) else {
            return Err(PredictError::MissingFeature { name: spec.name });
        };
        let value = as_number(raw).ok_or_else(|| InferenceFault::NonNumeric {
            name: spec.name,
            value: raw.to_string(),
        })?;
        values.push(value);
    }
    Ok(FeatureVector::new(values))
}

/// Numbers pass through, booleans become 0/1. Everything else is rejected.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}
