use log::info;

use super::evaluation::{evaluate, per_class_metrics};
use super::features::FeatureExtractor;
use super::model::{ClassifierModel, LogisticRegressionParams};
use crate::artifact::ModelArtifact;
use crate::category::Category;
use crate::config::{TextColumn, TrainingConfig};
use crate::curation::TrainingSample;
use crate::error::ClassifierError;

/// Runs the offline training stage: split, fit features, fit the model,
/// evaluate on the held-out split and bundle everything into a
/// [`ModelArtifact`].
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ticket_classifier::{DatasetCurator, Ticket, Trainer};
///
/// let tickets: Vec<Ticket> = [
///     "forgot my password", "account locked", "cannot login", "reset password please", "username unknown",
///     "refund my payment", "invoice is wrong", "charged twice", "billing question", "price too high",
///     "app crash", "network error", "software bug", "system down", "hardware issue",
/// ]
/// .iter()
/// .map(|text| Ticket::new(*text))
/// .collect();
///
/// let sample = DatasetCurator::english().curate(&tickets, 500, 42)?;
/// let artifact = Trainer::builder().with_max_iter(200).build()?.train(&sample)?;
/// assert!(artifact.metrics().accuracy >= 0.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainingConfig,
}

/// A builder for constructing a [`Trainer`] with a fluent interface.
#[derive(Debug, Clone, Default)]
pub struct TrainerBuilder {
    config: TrainingConfig,
}

impl TrainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every setting at once
    pub fn with_config(mut self, config: TrainingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.config.tol = tol;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.config.features.max_features = max_features;
        self
    }

    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.config.test_fraction = test_fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_text_column(mut self, text_column: TextColumn) -> Self {
        self.config.text_column = text_column;
        self
    }

    /// Validates the settings and returns the trainer.
    ///
    /// # Errors
    /// `TrainingError` for a non-positive `C` or zero `max_iter`, `DataError`
    /// for a `test_fraction` outside `(0, 1)` or zero `max_features`.
    pub fn build(self) -> Result<Trainer, ClassifierError> {
        self.config.validate()?;
        Ok(Trainer { config: self.config })
    }
}

impl Trainer {
    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::new()
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Trains and evaluates a model on `sample`.
    pub fn train(&self, sample: &TrainingSample) -> Result<ModelArtifact, ClassifierError> {
        self.config.validate()?;
        let column = self.config.text_column;
        let split = sample.stratified_split(self.config.test_fraction, self.config.seed)?;
        info!(
            "Training on {} tickets, evaluating on {} held-out tickets",
            split.train.len(),
            split.test.len()
        );

        let train_texts: Vec<&str> = split.train.iter().map(|r| r.text(column)).collect();
        let train_labels: Vec<Category> = split.train.iter().map(|r| r.category).collect();
        let space = FeatureExtractor::new(self.config.features.clone()).fit(&train_texts, column)?;

        let x_train = space.transform_batch(train_texts.iter().copied());
        let model = ClassifierModel::train(&x_train, &train_labels, &LogisticRegressionParams::from(&self.config))?;

        let x_test = space.transform_batch(split.test.iter().map(|r| r.text(column)));
        let test_labels: Vec<Category> = split.test.iter().map(|r| r.category).collect();
        let predictions = model.predict_batch(&x_test)?;
        let metrics = evaluate(&predictions, &test_labels)?;

        for class in per_class_metrics(&predictions, &test_labels)? {
            info!(
                "  {:<10} precision {:.4}  recall {:.4}  f1 {:.4}  support {}",
                class.category, class.precision, class.recall, class.f1_score, class.support
            );
        }
        info!(
            "Held-out metrics: accuracy {:.4}, precision {:.4}, recall {:.4}, f1 {:.4}",
            metrics.accuracy, metrics.precision, metrics.recall, metrics.f1_score
        );

        ModelArtifact::new(space, model, metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_validation() {
        assert!(Trainer::builder().with_c(-1.0).build().is_err());
        assert!(Trainer::builder().with_test_fraction(0.0).build().is_err());
        assert!(Trainer::builder().with_max_features(0).build().is_err());
        let trainer = Trainer::builder().with_seed(7).with_max_iter(50).build().unwrap();
        assert_eq!(trainer.config().seed, 7);
        assert_eq!(trainer.config().max_iter, 50);
    }
}
