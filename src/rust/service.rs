use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::artifact::ModelArtifact;
use crate::category::Category;
use crate::classifier::Metrics;
use crate::config::{ServiceConfig, TextColumn};
use crate::error::ClassifierError;
use crate::text::TextNormalizer;

/// The answer to a classify request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    /// Probability of `category`, the largest in the distribution
    pub probability: f64,
}

/// A classification together with the full class distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedClassification {
    pub category: Category,
    pub probability: f64,
    pub probabilities: Vec<(Category, f64)>,
}

/// Returns information about the loaded model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub classes: Vec<Category>,
    pub vocabulary_size: usize,
    pub text_column: TextColumn,
    pub max_input_chars: usize,
}

/// Answers classify and metrics requests against one immutable artifact.
///
/// The artifact is loaded once and shared behind an `Arc`; every method takes
/// `&self`, so a single service can be used from many threads or async tasks
/// at once without locking.
///
/// Empty or whitespace-only input is rejected with `RequestError`. Any other
/// text is classified, even when none of its terms are in the vocabulary; such
/// text gets the low-confidence prediction of the bias terms alone.
#[derive(Debug, Clone)]
pub struct InferenceService {
    artifact: Arc<ModelArtifact>,
    normalizer: TextNormalizer,
    max_input_chars: usize,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<InferenceService>();
    }
};

impl InferenceService {
    pub fn new(artifact: ModelArtifact, normalizer: TextNormalizer) -> Self {
        Self {
            artifact: Arc::new(artifact),
            normalizer,
            max_input_chars: ServiceConfig::DEFAULT_MAX_INPUT_CHARS,
        }
    }

    /// Loads the artifact at `path`.
    ///
    /// # Errors
    /// `ArtifactError` if the file is missing or corrupt.
    pub fn load(path: &Path, normalizer: TextNormalizer) -> Result<Self, ClassifierError> {
        Ok(Self::new(ModelArtifact::load(path)?, normalizer))
    }

    /// Loads the configured artifact with the default English normalizer.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ClassifierError> {
        Ok(Self::load(&config.artifact_path, TextNormalizer::english())?.with_max_input_chars(config.max_input_chars))
    }

    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars.max(1);
        self
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn info(&self) -> ModelInfo {
        let space = self.artifact.feature_space();
        ModelInfo {
            classes: self.artifact.model().classes().to_vec(),
            vocabulary_size: space.dim(),
            text_column: space.text_column(),
            max_input_chars: self.max_input_chars,
        }
    }

    /// The metrics stored in the artifact at training time.
    pub fn metrics(&self) -> Metrics {
        self.artifact.metrics()
    }

    /// Predicts the category of `text` and its probability.
    ///
    /// # Errors
    /// * `RequestError` if `text` is empty or whitespace only
    /// * `PredictionError` if scoring fails
    pub fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        let detailed = self.classify_detailed(text)?;
        Ok(Classification {
            category: detailed.category,
            probability: detailed.probability,
        })
    }

    pub fn classify_detailed(&self, text: &str) -> Result<DetailedClassification, ClassifierError> {
        let prepared = self.prepare(text)?;
        let features = self.artifact.feature_space().transform(&prepared);
        let probabilities = self.artifact.model().predict_proba(&features)?;

        let (category, probability) = probabilities
            .iter()
            .copied()
            .fold(None, |best: Option<(Category, f64)>, (c, p)| match best {
                Some((_, b)) if b >= p => best,
                _ => Some((c, p)),
            })
            .ok_or_else(|| ClassifierError::PredictionError("Model returned no probabilities".into()))?;

        debug!("Classified {} chars as {} (p={:.4})", text.len(), category, probability);
        Ok(DetailedClassification { category, probability, probabilities })
    }

    fn prepare<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, ClassifierError> {
        if text.trim().is_empty() {
            return Err(ClassifierError::RequestError("Ticket text cannot be empty".into()));
        }
        let text = match text.char_indices().nth(self.max_input_chars) {
            Some((cut, _)) => {
                debug!("Truncating input from {} bytes to {} bytes", text.len(), cut);
                &text[..cut]
            }
            None => text,
        };
        Ok(match self.artifact.feature_space().text_column() {
            TextColumn::Cleaned => Cow::Owned(self.normalizer.normalize(text)),
            TextColumn::Raw => Cow::Borrowed(text),
        })
    }
}
