//! Request handling: validate, assemble, infer, shape.

use std::time::Instant;

use tracing::{debug, warn};

use crate::common::error::{InferenceFault, PredictResult};
use crate::features::domain::{InputRecord, Strictness};
use crate::features::service as features;
use crate::model::ModelHandle;

use super::domain::PredictionResult;

/// Stateless adapter around the shared model. Clones are cheap.
#[derive(Clone, Debug)]
pub struct Predictor {
    model: ModelHandle,
    strictness: Strictness,
}

impl Predictor {
    pub fn new(model: ModelHandle, strictness: Strictness) -> Self {
        Self { model, strictness }
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Turn one untrusted record into one prediction. Pure with respect to
    /// the record and the loaded model.
    pub fn handle(&self, record: &InputRecord) -> PredictResult<PredictionResult> {
        let started = Instant::now();
        let outcome = self.run(record);
        let dur_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(result) => debug!(
                ev = "prediction_served",
                prediction = result.prediction,
                probability = result.probability,
                dur_ms,
            ),
            Err(err) => warn!(
                ev = "prediction_rejected",
                code = err.code().as_u32(),
                error = %err,
                dur_ms,
            ),
        }
        outcome
    }

    fn run(&self, record: &InputRecord) -> PredictResult<PredictionResult> {
        features::ensure_present(record)?;
        if self.strictness == Strictness::Strict {
            features::validate_strict(record)?;
        }

        let vector = features::assemble(record)?;
        let label = self.model.predict(&vector).map_err(InferenceFault::from)?;
        let proba = self
            .model
            .predict_proba(&vector)
            .map_err(InferenceFault::from)?;

        Ok(PredictionResult {
            prediction: i64::from(label),
            probability: proba.positive(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ErrorCode;
    use crate::features::domain::FEATURE_COUNT;
    use crate::model::logistic::LogisticModel;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn predictor(strictness: Strictness) -> Predictor {
        // Risk rises with HighBP, BMI, GenHlth and Age.
        let mut weights = vec![0.0; FEATURE_COUNT];
        weights[0] = 0.8;
        weights[3] = 0.07;
        weights[13] = 0.5;
        weights[18] = 0.15;
        let engine = Arc::new(LogisticModel::new(-6.0, weights));
        Predictor::new(ModelHandle::from_engine(engine, "test"), strictness)
    }

    fn record(overrides: Value) -> InputRecord {
        let mut base = json!({
            "HighBP": 1, "HighChol": 1, "CholCheck": 1, "BMI": 28, "Smoker": 0,
            "Stroke": 0, "HeartDiseaseorAttack": 0, "PhysActivity": 1, "Fruits": 1,
            "Veggies": 1, "HvyAlcoholConsump": 0, "AnyHealthcare": 1, "NoDocbcCost": 0,
            "GenHlth": 3, "MentHlth": 2, "PhysHlth": 5, "DiffWalk": 0, "Sex": 1,
            "Age": 9, "Education": 5, "Income": 5
        });
        if let (Value::Object(base), Value::Object(extra)) = (&mut base, overrides) {
            base.extend(extra);
        }
        match base {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn full_record_yields_a_bounded_prediction() {
        let result = predictor(Strictness::Permissive)
            .handle(&record(json!({})))
            .unwrap();
        assert!(result.prediction == 0 || result.prediction == 1);
        assert!((0.0..=1.0).contains(&result.probability));
    }

    #[test]
    fn label_agrees_with_probability() {
        let p = predictor(Strictness::Permissive);
        let low = p.handle(&record(json!({"HighBP": 0, "BMI": 18, "GenHlth": 1, "Age": 1}))).unwrap();
        let high = p.handle(&record(json!({"BMI": 45, "GenHlth": 5, "Age": 13}))).unwrap();
        assert_eq!(low.prediction, 0);
        assert!(low.probability <= 0.5);
        assert_eq!(high.prediction, 1);
        assert!(high.probability > 0.5);
    }

    #[test]
    fn identical_records_give_identical_results() {
        let p = predictor(Strictness::Permissive);
        let input = record(json!({}));
        let a = p.handle(&input).unwrap();
        let b = p.handle(&input).unwrap();
        assert_eq!(a.prediction, b.prediction);
        assert_eq!(a.probability.to_bits(), b.probability.to_bits());
    }

    #[test]
    fn extra_field_does_not_change_the_result() {
        let p = predictor(Strictness::Permissive);
        let plain = p.handle(&record(json!({}))).unwrap();
        let extra = p.handle(&record(json!({"FavouriteColour": "blue"}))).unwrap();
        assert_eq!(plain, extra);
    }

    #[test]
    fn missing_field_is_rejected_before_inference() {
        let mut input = record(json!({"BMI": "high"}));
        input.remove("HighChol");
        let err = predictor(Strictness::Permissive).handle(&input).unwrap_err();
        assert_eq!(err.to_string(), "Missing feature: HighChol");
        assert!(err.is_client_error());
    }

    #[test]
    fn non_numeric_value_is_a_server_side_failure_when_permissive() {
        let err = predictor(Strictness::Permissive)
            .handle(&record(json!({"BMI": "high"})))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);
        assert!(!err.is_client_error());
    }

    #[test]
    fn strict_mode_turns_bad_values_into_client_errors() {
        let p = predictor(Strictness::Strict);
        let err = p.handle(&record(json!({"BMI": "high"}))).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFeature);

        let err = p.handle(&record(json!({"Age": 70}))).unwrap_err();
        assert!(err.to_string().starts_with("Invalid feature: Age"));

        assert!(p.handle(&record(json!({}))).is_ok());
    }

    #[test]
    fn permissive_mode_accepts_out_of_range_numbers() {
        let result = predictor(Strictness::Permissive)
            .handle(&record(json!({"BMI": -5, "Age": 70})))
            .unwrap();
        assert!((0.0..=1.0).contains(&result.probability));
    }
}
