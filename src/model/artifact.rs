//! On-disk model artefact format and the compatibility checks run at load.
//!
//! Artefacts are JSON documents tagged by `kind`. Tree ensembles use the node
//! array layout of the XGBoost JSON dump.

use serde::Deserialize;

use crate::common::error::StartupError;
use crate::features::domain::{feature_names, FEATURE_COUNT};

use super::domain::{Classifier, ModelKind};
use super::gbdt::{GbdtModel, Tree};
use super::logistic::LogisticModel;

/// Only artefact version understood by this build.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtefactSpec {
    TabularGbdt {
        format_version: u32,
        feature_names: Vec<String>,
        #[serde(default = "default_base_score")]
        base_score: f64,
        trees: Vec<TreeSpec>,
    },
    TabularLogistic {
        format_version: u32,
        feature_names: Vec<String>,
        intercept: f64,
        coefficients: Vec<f64>,
    },
}

fn default_base_score() -> f64 {
    0.5
}

/// Parallel node arrays of one regression tree.
#[derive(Debug, Deserialize)]
pub struct TreeSpec {
    pub left_children: Vec<i64>,
    pub right_children: Vec<i64>,
    pub split_indices: Vec<u32>,
    pub split_conditions: Vec<f64>,
    pub default_left: Vec<bool>,
}

impl ArtefactSpec {
    pub fn parse(bytes: &[u8]) -> Result<Self, StartupError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            ArtefactSpec::TabularGbdt { .. } => ModelKind::TabularGradientBoosting,
            ArtefactSpec::TabularLogistic { .. } => ModelKind::TabularLogistic,
        }
    }

    /// Validate the artefact and build the matching engine.
    pub fn into_classifier(self) -> Result<Box<dyn Classifier>, StartupError> {
        match self {
            ArtefactSpec::TabularGbdt {
                format_version,
                feature_names,
                base_score,
                trees,
            } => {
                check_header(format_version, &feature_names)?;
                if !(base_score > 0.0 && base_score < 1.0) {
                    return Err(StartupError::incompatible(format!(
                        "base_score must lie in (0, 1), got {base_score}"
                    )));
                }
                let trees = trees
                    .into_iter()
                    .enumerate()
                    .map(|(idx, spec)| build_tree(idx, spec))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Box::new(GbdtModel::new(base_score, trees)))
            }
            ArtefactSpec::TabularLogistic {
                format_version,
                feature_names,
                intercept,
                coefficients,
            } => {
                check_header(format_version, &feature_names)?;
                if coefficients.len() != FEATURE_COUNT {
                    return Err(StartupError::incompatible(format!(
                        "expected {FEATURE_COUNT} coefficients, got {}",
                        coefficients.len()
                    )));
                }
                if !intercept.is_finite() || coefficients.iter().any(|w| !w.is_finite()) {
                    return Err(StartupError::incompatible("non-finite logistic weight"));
                }
                Ok(Box::new(LogisticModel::new(intercept, coefficients)))
            }
        }
    }
}

fn check_header(format_version: u32, names: &[String]) -> Result<(), StartupError> {
    if format_version != FORMAT_VERSION {
        return Err(StartupError::incompatible(format!(
            "unsupported format_version {format_version}, expected {FORMAT_VERSION}"
        )));
    }
    if names.len() != FEATURE_COUNT {
        return Err(StartupError::incompatible(format!(
            "expected {FEATURE_COUNT} feature names, got {}",
            names.len()
        )));
    }
    for (pos, (found, expected)) in names.iter().zip(feature_names()).enumerate() {
        if found != expected {
            return Err(StartupError::incompatible(format!(
                "feature {pos} is '{found}', expected '{expected}'"
            )));
        }
    }
    Ok(())
}

fn build_tree(idx: usize, spec: TreeSpec) -> Result<Tree, StartupError> {
    let bad = |detail: String| StartupError::incompatible(format!("tree {idx}: {detail}"));

    let n = spec.left_children.len();
    if n == 0 {
        return Err(bad("tree has no nodes".into()));
    }
    if spec.right_children.len() != n
        || spec.split_indices.len() != n
        || spec.split_conditions.len() != n
        || spec.default_left.len() != n
    {
        return Err(bad("node arrays differ in length".into()));
    }

    for node in 0..n {
        let (left, right) = (spec.left_children[node], spec.right_children[node]);
        if !spec.split_conditions[node].is_finite() {
            return Err(bad(format!("node {node} has a non-finite value")));
        }
        match (left, right) {
            (-1, -1) => continue,
            (-1, _) | (_, -1) => return Err(bad(format!("node {node} has a single child"))),
            _ => {}
        }
        for child in [left, right] {
            if child <= node as i64 || child >= n as i64 {
                return Err(bad(format!("node {node} has invalid child {child}")));
            }
        }
        if spec.split_indices[node] as usize >= FEATURE_COUNT {
            return Err(bad(format!(
                "node {node} splits on unknown feature {}",
                spec.split_indices[node]
            )));
        }
    }

    Ok(Tree::from_arrays(
        spec.left_children,
        spec.right_children,
        spec.split_indices,
        spec.split_conditions,
        spec.default_left,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn names() -> Value {
        json!(feature_names().collect::<Vec<_>>())
    }

    fn stump() -> Value {
        json!({
            "left_children": [1, -1, -1],
            "right_children": [2, -1, -1],
            "split_indices": [3, 0, 0],
            "split_conditions": [30.0, -0.5, 0.5],
            "default_left": [true, false, false]
        })
    }

    fn load(doc: Value) -> Result<Box<dyn Classifier>, StartupError> {
        ArtefactSpec::parse(doc.to_string().as_bytes())?.into_classifier()
    }

    #[test]
    fn accepts_a_well_formed_ensemble() {
        let model = load(json!({
            "format_version": 1, "kind": "tabular_gbdt",
            "feature_names": names(), "base_score": 0.5, "trees": [stump()]
        }))
        .unwrap();
        assert_eq!(model.kind(), ModelKind::TabularGradientBoosting);
        assert_eq!(model.num_features(), FEATURE_COUNT);
    }

    #[test]
    fn base_score_defaults_to_one_half() {
        let spec = ArtefactSpec::parse(
            json!({
                "format_version": 1, "kind": "tabular_gbdt",
                "feature_names": names(), "trees": []
            })
            .to_string()
            .as_bytes(),
        )
        .unwrap();
        match spec {
            ArtefactSpec::TabularGbdt { base_score, .. } => assert_eq!(base_score, 0.5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let err = load(json!({"format_version": 1, "kind": "pickle"})).unwrap_err();
        assert!(matches!(err, StartupError::Parse(_)));
    }

    #[test]
    fn permuted_feature_names_are_rejected() {
        let mut permuted: Vec<&str> = feature_names().collect();
        permuted.swap(0, 3);
        let err = load(json!({
            "format_version": 1, "kind": "tabular_gbdt",
            "feature_names": permuted, "trees": [stump()]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("feature 0 is 'BMI'"));
    }

    #[test]
    fn future_format_version_is_rejected() {
        let err = load(json!({
            "format_version": 2, "kind": "tabular_gbdt",
            "feature_names": names(), "trees": []
        }))
        .unwrap_err();
        assert!(matches!(err, StartupError::Incompatible(_)));
    }

    #[test]
    fn backward_edges_are_rejected() {
        let cyclic = json!({
            "left_children": [1, 0, -1],
            "right_children": [2, 2, -1],
            "split_indices": [0, 0, 0],
            "split_conditions": [0.5, 0.5, 0.1],
            "default_left": [true, true, false]
        });
        let err = load(json!({
            "format_version": 1, "kind": "tabular_gbdt",
            "feature_names": names(), "trees": [cyclic]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("invalid child 0"));
    }

    #[test]
    fn split_on_unknown_feature_is_rejected() {
        let mut tree = stump();
        tree["split_indices"] = json!([21, 0, 0]);
        let err = load(json!({
            "format_version": 1, "kind": "tabular_gbdt",
            "feature_names": names(), "trees": [tree]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unknown feature 21"));
    }

    #[test]
    fn logistic_weight_count_must_match_schema() {
        let err = load(json!({
            "format_version": 1, "kind": "tabular_logistic",
            "feature_names": names(), "intercept": 0.0, "coefficients": [0.1, 0.2]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("expected 21 coefficients"));
    }
}
