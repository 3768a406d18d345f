//! Incident priority triage
//!
//! Classifies free-text incident reports into three priority tiers
//! (Critical, Medium, Low) using interchangeable text classifiers, and
//! measures them with holdout evaluation and k-fold cross-validation.

pub mod config;
pub mod corpus;
pub mod error;
pub mod ml;
pub mod models;

pub use config::Config;
pub use error::{Result, TriageError};
pub use ml::{
    cross_validate, evaluate, Classifier, ClassifierFactory, ConfusionMatrix, Evaluation,
    FeatureExtractor, ModelType, Stopwords,
};
pub use models::{LabeledExample, Priority};
