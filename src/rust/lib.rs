//! A support ticket classifier: weak labeling, balanced dataset curation,
//! TF-IDF features, multinomial logistic regression and an HTTP inference
//! service.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ticket_classifier::{Category, DatasetCurator, InferenceService, TextNormalizer, Ticket, Trainer};
//!
//! let tickets: Vec<Ticket> = [
//!     "I forgot my password", "my account is locked", "cannot login to the portal",
//!     "password reset link broken", "wrong username on my account",
//!     "please refund my payment", "the invoice total is wrong", "charged twice this month",
//!     "billing address update", "price increase on my plan",
//!     "the app keeps crashing", "network error on startup", "software bug in reports",
//!     "system is down again", "hardware failure in the office",
//! ]
//! .iter()
//! .map(|text| Ticket::new(*text))
//! .collect();
//!
//! let sample = DatasetCurator::english().curate(&tickets, 500, 42)?;
//! let artifact = Trainer::builder().build()?.train(&sample)?;
//!
//! let service = InferenceService::new(artifact, TextNormalizer::english());
//! let result = service.classify("I cannot remember my password")?;
//! assert_eq!(result.category, Category::Login);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! [`InferenceService`] holds its artifact behind an `Arc` and never mutates
//! it, so one service can be shared across threads:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # use ticket_classifier::{DatasetCurator, InferenceService, TextNormalizer, Ticket, Trainer};
//! use std::sync::Arc;
//! use std::thread;
//!
//! # let tickets: Vec<Ticket> = ["forgot password", "login failed", "refund please", "invoice wrong",
//! #     "app crash", "network error"].iter().map(|t| Ticket::new(*t)).collect();
//! # let sample = DatasetCurator::english().curate(&tickets, 6, 1)?;
//! # let artifact = Trainer::builder().with_max_iter(100).build()?.train(&sample)?;
//! let service = Arc::new(InferenceService::new(artifact, TextNormalizer::english()));
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let service = Arc::clone(&service);
//!     handles.push(thread::spawn(move || {
//!         service.classify("test text").unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod category;
pub mod classifier;
pub mod client;
pub mod config;
pub mod curation;
pub mod dataset;
pub mod error;
pub mod server;
pub mod service;
pub mod store;
pub mod text;

pub use artifact::ModelArtifact;
pub use category::Category;
pub use classifier::{
    evaluate, per_class_metrics, ClassMetrics, ClassifierModel, FeatureExtractor, FeatureSpace,
    LogisticRegressionParams, Metrics, SparseVector, Trainer, TrainerBuilder,
};
pub use client::ApiClient;
pub use config::{CurationConfig, FeatureConfig, ServiceConfig, TextColumn, TrainingConfig};
pub use curation::{DatasetCurator, LabeledTicket, SampleSplit, Ticket, TrainingSample};
pub use error::ClassifierError;
pub use service::{Classification, DetailedClassification, InferenceService, ModelInfo};
pub use store::ArtifactStore;
pub use text::{LabelRule, Lexicon, TextNormalizer, WeakLabeler};

pub fn init_logger() {
    env_logger::init();
}
