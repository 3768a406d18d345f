/// Text classification engine for incident priority triage
///
/// This module provides:
/// - Text normalization and stopword filtering
/// - Bag-of-words / token-set feature extraction with optional n-grams
/// - Three interchangeable classifiers behind the `Classifier` trait
///   (set similarity, Naive Bayes, k-nearest neighbors)
/// - Holdout evaluation and k-fold cross-validation

pub mod classifier;
pub mod evaluation;
pub mod features;
pub mod knn;
pub mod models;
pub mod naive_bayes;
pub mod preprocessing;
pub mod set_similarity;
pub mod similarity;

pub use classifier::{Classifier, ClassifierFactory, DEFAULT_K};
pub use evaluation::{
    cross_validate, cross_validate_detailed, evaluate, ConfusionMatrix, CrossValidation,
    Evaluation,
};
pub use features::{ngrams, FeatureExtractor, TokenBag, TokenSet};
pub use knn::{KnnClassifier, Neighbor};
pub use models::{ClassMetrics, ModelMetadata, ModelType};
pub use naive_bayes::NaiveBayesClassifier;
pub use preprocessing::{Stopwords, TextNormalizer};
pub use set_similarity::SetSimilarityClassifier;
pub use similarity::jaccard;
