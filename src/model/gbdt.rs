//! Gradient-boosted tree ensemble for binary logistic objectives.
//!
//! ```text
//! margin = logit(base_score) + Σ leaf(tree, row)
//! p(class 1) = sigmoid(margin)
//! ```
//!
//! Node layout follows the XGBoost JSON dump: parallel arrays indexed by node
//! id, `-1` children mark a leaf whose value lives in `split_conditions`.

use crate::features::domain::FEATURE_COUNT;

use super::domain::{logit, Classifier, ModelKind};

const LEAF: i64 = -1;

/// A single regression tree. Children always have larger ids than their
/// parent, checked when the artefact is loaded.
#[derive(Clone, Debug)]
pub struct Tree {
    left: Vec<i64>,
    right: Vec<i64>,
    split_index: Vec<u32>,
    split_condition: Vec<f64>,
    default_left: Vec<bool>,
}

impl Tree {
    pub(crate) fn from_arrays(
        left: Vec<i64>,
        right: Vec<i64>,
        split_index: Vec<u32>,
        split_condition: Vec<f64>,
        default_left: Vec<bool>,
    ) -> Self {
        Self {
            left,
            right,
            split_index,
            split_condition,
            default_left,
        }
    }

    /// Walk from the root to a leaf and return its value.
    pub fn leaf_value(&self, row: &[f64]) -> f64 {
        let mut node = 0usize;
        while self.left[node] != LEAF {
            let x = row[self.split_index[node] as usize];
            let go_left = if x.is_nan() {
                self.default_left[node]
            } else {
                x < self.split_condition[node]
            };
            node = if go_left {
                self.left[node] as usize
            } else {
                self.right[node] as usize
            };
        }
        self.split_condition[node]
    }

    pub fn num_nodes(&self) -> usize {
        self.left.len()
    }
}

/// Boosted ensemble with a constant prior.
#[derive(Clone, Debug)]
pub struct GbdtModel {
    base_margin: f64,
    trees: Vec<Tree>,
}

impl GbdtModel {
    /// `base_score` is a probability, as stored by the trainer.
    pub fn new(base_score: f64, trees: Vec<Tree>) -> Self {
        Self {
            base_margin: logit(base_score),
            trees,
        }
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for GbdtModel {
    fn kind(&self) -> ModelKind {
        ModelKind::TabularGradientBoosting
    }

    fn num_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn margin(&self, row: &[f64]) -> f64 {
        self.trees
            .iter()
            .fold(self.base_margin, |acc, tree| acc + tree.leaf_value(row))
    }
}
