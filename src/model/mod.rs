//! Model domain: artefact loading and the engines that evaluate it.

pub mod artifact;
pub mod domain;
pub mod gbdt;
pub mod handle;
pub mod logistic;
pub mod repo_fs;

pub use domain::{ClassProbabilities, Classifier, EngineError, ModelKind, ModelMetadata};
pub use handle::ModelHandle;
