use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::classifier::{ClassifierModel, FeatureSpace, Metrics};
use crate::error::{missing_file, ClassifierError};

/// The trained bundle handed from training to serving: the frozen feature
/// space, the fitted model and its held-out metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    feature_space: FeatureSpace,
    model: ClassifierModel,
    metrics: Metrics,
}

/// On-disk framing: the encoded artifact plus its SHA-256.
#[derive(Serialize, Deserialize)]
struct ArtifactEnvelope {
    checksum: String,
    payload: Vec<u8>,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

impl ModelArtifact {
    /// Bundles the three training outputs.
    ///
    /// # Errors
    /// `ArtifactError` if the model was not trained on `feature_space`.
    pub fn new(feature_space: FeatureSpace, model: ClassifierModel, metrics: Metrics) -> Result<Self, ClassifierError> {
        let artifact = Self { feature_space, model, metrics };
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn feature_space(&self) -> &FeatureSpace {
        &self.feature_space
    }

    pub fn model(&self) -> &ClassifierModel {
        &self.model
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        self.feature_space.validate()?;
        self.model.validate()?;
        if self.model.n_features() != self.feature_space.dim() {
            return Err(ClassifierError::ArtifactError(format!(
                "Model expects {} features but the vocabulary has {}",
                self.model.n_features(),
                self.feature_space.dim()
            )));
        }
        let metrics = [self.metrics.accuracy, self.metrics.precision, self.metrics.recall, self.metrics.f1_score];
        if metrics.iter().any(|m| !(0.0..=1.0).contains(m)) {
            return Err(ClassifierError::ArtifactError(format!("Metrics out of range: {:?}", self.metrics)));
        }
        Ok(())
    }

    /// Encodes the artifact with its checksum.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ClassifierError> {
        let payload = bincode::serialize(self).map_err(|e| ClassifierError::artifact("Failed to encode artifact", e))?;
        let envelope = ArtifactEnvelope { checksum: sha256_hex(&payload), payload };
        bincode::serialize(&envelope).map_err(|e| ClassifierError::artifact("Failed to encode artifact", e))
    }

    /// Decodes and verifies an artifact produced by [`ModelArtifact::to_bytes`].
    ///
    /// # Errors
    /// `ArtifactError` if the bytes are truncated or garbled, the checksum does
    /// not match, or the decoded parts are inconsistent.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ClassifierError> {
        let envelope: ArtifactEnvelope =
            bincode::deserialize(bytes).map_err(|e| ClassifierError::artifact("Corrupt artifact", e))?;
        let actual = sha256_hex(&envelope.payload);
        if actual != envelope.checksum {
            return Err(ClassifierError::ArtifactError(format!(
                "Checksum mismatch: expected {}, got {}",
                envelope.checksum, actual
            )));
        }
        let artifact: Self =
            bincode::deserialize(&envelope.payload).map_err(|e| ClassifierError::artifact("Corrupt artifact", e))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Writes the artifact to `path`, replacing any previous one.
    ///
    /// The bytes go to a sibling temporary file first and are renamed into
    /// place, so readers never observe a partially written artifact.
    pub fn save(&self, path: &Path) -> Result<(), ClassifierError> {
        let bytes = self.to_bytes()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ClassifierError::artifact("Failed to create model directory", e))?;
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &bytes).map_err(|e| ClassifierError::artifact("Failed to write artifact", e))?;
        fs::rename(&tmp, path).map_err(|e| ClassifierError::artifact("Failed to move artifact into place", e))?;
        info!("Saved model artifact ({} bytes) to {:?}", bytes.len(), path);
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let bytes = fs::read(path).map_err(|e| ClassifierError::ArtifactError(missing_file("Model artifact", path, e)))?;
        let artifact = Self::from_bytes(&bytes)?;
        info!(
            "Loaded model artifact from {:?}: {} features, classes {:?}",
            path,
            artifact.feature_space.dim(),
            artifact.model.classes()
        );
        Ok(artifact)
    }

    /// Checks the file at `path` without keeping the decoded artifact.
    /// Returns `Ok(false)` for a missing or corrupt file.
    pub fn verify(path: &Path) -> Result<bool, ClassifierError> {
        if !path.exists() {
            return Ok(false);
        }
        match Self::load(path) {
            Ok(_) => Ok(true),
            Err(ClassifierError::ArtifactError(msg)) => {
                log::warn!("Artifact verification failed: {}", msg);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
