//! The loaded, immutable classifier shared by every request.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::common::error::StartupError;
use crate::features::domain::FeatureVector;

use super::artifact::ArtefactSpec;
use super::domain::{ClassProbabilities, Classifier, EngineError, ModelKind, ModelMetadata};
use super::repo_fs;

/// Cheap to clone; clones share the same engine. There is no way to mutate
/// or swap the engine once loaded.
#[derive(Clone, Debug)]
pub struct ModelHandle {
    engine: Arc<dyn Classifier>,
    metadata: Arc<ModelMetadata>,
}

impl ModelHandle {
    /// Read, validate and build the model. Any error here means the process
    /// must not serve traffic.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StartupError> {
        let path = path.as_ref();
        let started = Instant::now();

        let file = repo_fs::read_artefact(path)?;
        let spec = ArtefactSpec::parse(&file.bytes)?;
        let kind = spec.kind();
        let size = match &spec {
            ArtefactSpec::TabularGbdt { trees, .. } => trees.len(),
            ArtefactSpec::TabularLogistic { coefficients, .. } => coefficients.len(),
        };
        let engine: Arc<dyn Classifier> = Arc::from(spec.into_classifier()?);

        let metadata = ModelMetadata {
            kind,
            artefact_path: path.to_path_buf(),
            fingerprint: file.fingerprint,
            size,
        };

        info!(
            ev = "model_loaded",
            kind = %metadata.kind,
            fingerprint = %metadata.fingerprint,
            path = %path.display(),
            size = metadata.size,
            dur_ms = started.elapsed().as_millis() as u64,
            "model artefact loaded"
        );

        Ok(Self {
            engine,
            metadata: Arc::new(metadata),
        })
    }

    /// Wrap an engine built in process, e.g. by an embedder or a test.
    pub fn from_engine(engine: Arc<dyn Classifier>, fingerprint: impl Into<String>) -> Self {
        let metadata = ModelMetadata {
            kind: engine.kind(),
            artefact_path: PathBuf::new(),
            fingerprint: fingerprint.into(),
            size: 0,
        };
        Self {
            engine,
            metadata: Arc::new(metadata),
        }
    }

    pub fn predict(&self, vector: &FeatureVector) -> Result<u32, EngineError> {
        self.engine.predict(vector)
    }

    pub fn predict_proba(&self, vector: &FeatureVector) -> Result<ClassProbabilities, EngineError> {
        self.engine.predict_proba(vector)
    }

    pub fn kind(&self) -> ModelKind {
        self.metadata.kind
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
