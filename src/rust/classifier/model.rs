use linfa::traits::Fit;
use linfa::Dataset;
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use log::info;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::features::SparseVector;
use super::utils::{argmax, softmax};
use crate::category::Category;
use crate::config::TrainingConfig;
use crate::error::ClassifierError;

/// Optimizer settings for [`ClassifierModel::train`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticRegressionParams {
    /// Inverse L2 regularization strength
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        Self { c: 1.0, max_iter: 1000, tol: 1e-4 }
    }
}

impl From<&TrainingConfig> for LogisticRegressionParams {
    fn from(config: &TrainingConfig) -> Self {
        Self { c: config.c, max_iter: config.max_iter, tol: config.tol }
    }
}

/// A fitted multinomial logistic regression model.
///
/// Row `k` of `weights` and entry `k` of `bias` score `classes[k]`. The model is
/// immutable once trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierModel {
    classes: Vec<Category>,
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl ClassifierModel {
    /// Fits a softmax regression over the three target categories.
    ///
    /// The objective is the summed cross-entropy plus `alpha / 2 * |W|^2` with
    /// `alpha = 1 / C`, minimized by L-BFGS. The intercept is not penalized.
    /// Optimization stops after `max_iter` iterations or once the gradient norm
    /// drops below `tol`. Training is deterministic.
    ///
    /// # Errors
    /// `TrainingError` if there are fewer than two samples, labels and features
    /// disagree in length or dimension, a label is `Other`, a target category
    /// has no samples, or the solver fails.
    pub fn train(
        features: &[SparseVector],
        labels: &[Category],
        params: &LogisticRegressionParams,
    ) -> Result<Self, ClassifierError> {
        let classes = Category::TARGETS.to_vec();
        let fitted = Self::fit(features, labels, &classes, params)?;

        // Columns of the fitted parameters follow the solver's own class order
        let n_features = fitted.params().nrows();
        let mut weights = Array2::<f64>::zeros((classes.len(), n_features));
        let mut bias = Array1::<f64>::zeros(classes.len());
        for k in 0..classes.len() {
            let column = fitted.classes().iter().position(|&c| c == k).ok_or_else(|| {
                ClassifierError::TrainingError(format!("Solver returned no parameters for '{}'", classes[k]))
            })?;
            weights.row_mut(k).assign(&fitted.params().column(column));
            bias[k] = fitted.intercept()[column];
        }

        let model = Self { classes, weights, bias };
        model
            .validate()
            .map_err(|e| ClassifierError::TrainingError(format!("Solver produced an unusable model: {}", e)))?;
        info!(
            "Fitted logistic regression on {} samples x {} features (C={}, max_iter={})",
            features.len(),
            n_features,
            params.c,
            params.max_iter
        );
        Ok(model)
    }

    /// Runs the solver. Targets are indices into `classes`.
    fn fit(
        features: &[SparseVector],
        labels: &[Category],
        classes: &[Category],
        params: &LogisticRegressionParams,
    ) -> Result<MultiFittedLogisticRegression<f64, usize>, ClassifierError> {
        if features.len() != labels.len() {
            return Err(ClassifierError::TrainingError(format!(
                "{} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if features.len() < 2 {
            return Err(ClassifierError::TrainingError("At least two training samples are required".into()));
        }
        if !(params.c.is_finite() && params.c > 0.0) || params.max_iter == 0 {
            return Err(ClassifierError::TrainingError(format!("Invalid optimizer settings: {:?}", params)));
        }

        let n_features = features[0].dim();
        if features.iter().any(|x| x.dim() != n_features) {
            return Err(ClassifierError::TrainingError("Feature vectors differ in dimension".into()));
        }

        let targets = labels
            .iter()
            .map(|label| {
                classes.iter().position(|c| c == label).ok_or_else(|| {
                    ClassifierError::TrainingError(format!("Label '{}' is not a trainable category", label))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (k, class) in classes.iter().enumerate() {
            if !targets.contains(&k) {
                return Err(ClassifierError::TrainingError(format!("No training samples for '{}'", class)));
            }
        }

        let mut records = Array2::<f64>::zeros((features.len(), n_features));
        for (mut row, x) in records.axis_iter_mut(Axis(0)).zip(features) {
            row.assign(&x.to_dense());
        }
        let dataset = Dataset::new(records, Array1::from(targets));

        MultiLogisticRegression::<f64>::default()
            .alpha(1.0 / params.c)
            .max_iterations(params.max_iter as u64)
            .gradient_tolerance(params.tol)
            .fit(&dataset)
            .map_err(|e| ClassifierError::TrainingError(format!("Logistic regression failed: {}", e)))
    }

    pub fn classes(&self) -> &[Category] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    /// Raw per-class scores (logits) for `x`.
    pub fn scores(&self, x: &SparseVector) -> Result<Array1<f64>, ClassifierError> {
        if x.dim() != self.n_features() {
            return Err(ClassifierError::PredictionError(format!(
                "Feature vector has {} dimensions, model expects {}",
                x.dim(),
                self.n_features()
            )));
        }
        let scores: Array1<f64> = self
            .weights
            .axis_iter(Axis(0))
            .zip(self.bias.iter())
            .map(|(row, b)| x.dot(row) + b)
            .collect();
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ClassifierError::PredictionError("Model produced a non-finite score".into()));
        }
        Ok(scores)
    }

    /// The category with the highest score; the first category wins ties.
    pub fn predict(&self, x: &SparseVector) -> Result<Category, ClassifierError> {
        let scores = self.scores(x)?;
        argmax(scores.view())
            .map(|k| self.classes[k])
            .ok_or_else(|| ClassifierError::PredictionError("Model has no classes".into()))
    }

    pub fn predict_batch(&self, xs: &[SparseVector]) -> Result<Vec<Category>, ClassifierError> {
        xs.iter().map(|x| self.predict(x)).collect()
    }

    /// Probability of every class, in model order. Sums to one.
    pub fn predict_proba(&self, x: &SparseVector) -> Result<Vec<(Category, f64)>, ClassifierError> {
        let scores = self.scores(x)?;
        let probabilities = softmax(scores.view());
        Ok(self.classes.iter().copied().zip(probabilities.iter().copied()).collect())
    }

    pub(crate) fn validate(&self) -> Result<(), ClassifierError> {
        if self.classes.is_empty()
            || self.weights.nrows() != self.classes.len()
            || self.bias.len() != self.classes.len()
        {
            return Err(ClassifierError::ArtifactError(format!(
                "Model shape mismatch: {} classes, {}x{} weights, {} biases",
                self.classes.len(),
                self.weights.nrows(),
                self.weights.ncols(),
                self.bias.len()
            )));
        }
        if self.weights.iter().chain(self.bias.iter()).any(|w| !w.is_finite()) {
            return Err(ClassifierError::ArtifactError("Model contains non-finite weights".into()));
        }
        Ok(())
    }
}
