use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

/// Which text column of a training sample the features are fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextColumn {
    /// The raw ticket body
    Raw,
    /// The normalized body (`cleaned_description`)
    Cleaned,
}

/// Settings for turning raw tickets into a training sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurationConfig {
    /// Upper bound on the curated sample size. Each category receives
    /// `max_sample_size / 3` records at most; the remainder is discarded.
    pub max_sample_size: usize,
    pub seed: u64,
    /// Name of the CSV column holding the raw ticket text
    pub text_column: String,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            max_sample_size: 500,
            seed: 42,
            text_column: "body".to_string(),
        }
    }
}

/// TF-IDF settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Maximum vocabulary size
    pub max_features: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self { max_features: 5000 }
    }
}

/// Settings for fitting and evaluating the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Inverse L2 regularization strength
    pub c: f64,
    pub max_iter: usize,
    /// Convergence threshold on the largest absolute gradient component
    pub tol: f64,
    /// Share of every category held out for evaluation
    pub test_fraction: f64,
    pub seed: u64,
    pub text_column: TextColumn,
    pub features: FeatureConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tol: 1e-4,
            test_fraction: 0.2,
            seed: 42,
            text_column: TextColumn::Cleaned,
            features: FeatureConfig::default(),
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(ClassifierError::TrainingError(format!("C must be positive, got {}", self.c)));
        }
        if self.max_iter == 0 {
            return Err(ClassifierError::TrainingError("max_iter must be at least 1".into()));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ClassifierError::DataError(format!(
                "test_fraction must be strictly between 0 and 1, got {}",
                self.test_fraction
            )));
        }
        if self.features.max_features == 0 {
            return Err(ClassifierError::DataError("max_features must be at least 1".into()));
        }
        Ok(())
    }
}

/// Settings for the long-running inference process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub artifact_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Longer request texts are truncated to this many characters
    pub max_input_chars: usize,
}

impl ServiceConfig {
    pub const DEFAULT_MAX_INPUT_CHARS: usize = 10_000;

    pub fn new(artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            max_input_chars: Self::DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let training = TrainingConfig::default();
        assert_eq!(training.max_iter, 1000);
        assert_eq!(training.features.max_features, 5000);
        assert!(training.validate().is_ok());
        assert_eq!(CurationConfig::default().max_sample_size, 500);
        assert_eq!(ServiceConfig::new("model.bin").bind_addr.port(), 8000);
    }

    #[test]
    fn test_invalid_training_config() {
        let config = TrainingConfig { test_fraction: 1.0, ..TrainingConfig::default() };
        assert!(matches!(config.validate(), Err(ClassifierError::DataError(_))));

        let config = TrainingConfig { c: 0.0, ..TrainingConfig::default() };
        assert!(matches!(config.validate(), Err(ClassifierError::TrainingError(_))));
    }
}
