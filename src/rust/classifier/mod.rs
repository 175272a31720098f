//! Feature extraction, the logistic regression model, evaluation and the
//! training stage that ties them together.

mod evaluation;
mod features;
mod model;
mod trainer;
mod utils;

pub use evaluation::{evaluate, per_class_metrics, ClassMetrics, Metrics};
pub use features::{FeatureExtractor, FeatureSpace, SparseVector};
pub use model::{ClassifierModel, LogisticRegressionParams};
pub use trainer::{Trainer, TrainerBuilder};
