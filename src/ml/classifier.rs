use crate::config::ClassifierConfig;
use crate::error::{Result, TriageError};
use crate::ml::features::FeatureExtractor;
use crate::ml::knn::KnnClassifier;
use crate::ml::models::{ModelMetadata, ModelType};
use crate::ml::naive_bayes::NaiveBayesClassifier;
use crate::ml::preprocessing::Stopwords;
use crate::ml::set_similarity::SetSimilarityClassifier;
use crate::models::{LabeledExample, Priority};
use std::sync::Arc;

/// Neighbour count used when none is configured
pub const DEFAULT_K: usize = 3;

/// Score gap below which two labels count as tied
pub const SCORE_TIE_TOLERANCE: f64 = 1e-9;

/// Tie gap for very large scores, relative to their magnitude
const RELATIVE_TIE_TOLERANCE: f64 = 1e-12;

/// Trait for priority classifiers.
///
/// A classifier starts untrained; `fit` builds its state from a non-empty
/// example list, and a later `fit` replaces that state entirely.
pub trait Classifier: Send + Sync {
    /// Train the classifier
    fn fit(&mut self, examples: &[LabeledExample]) -> Result<()>;

    /// Predict the priority of one description
    fn predict(&self, description: &str) -> Result<Priority>;

    /// Predict several descriptions, stopping at the first error
    fn predict_batch(&self, descriptions: &[String]) -> Result<Vec<Priority>> {
        descriptions.iter().map(|d| self.predict(d)).collect()
    }

    /// Check if model is trained
    fn is_trained(&self) -> bool;

    /// Get model type
    fn model_type(&self) -> ModelType;

    /// Get model metadata
    fn metadata(&self) -> &ModelMetadata;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn fit(&mut self, examples: &[LabeledExample]) -> Result<()> {
        (**self).fit(examples)
    }

    fn predict(&self, description: &str) -> Result<Priority> {
        (**self).predict(description)
    }

    fn predict_batch(&self, descriptions: &[String]) -> Result<Vec<Priority>> {
        (**self).predict_batch(descriptions)
    }

    fn is_trained(&self) -> bool {
        (**self).is_trained()
    }

    fn model_type(&self) -> ModelType {
        (**self).model_type()
    }

    fn metadata(&self) -> &ModelMetadata {
        (**self).metadata()
    }
}

/// Reject an empty training set
pub(crate) fn ensure_examples(examples: &[LabeledExample]) -> Result<()> {
    if examples.is_empty() {
        return Err(TriageError::invalid("cannot fit a classifier on an empty example set"));
    }
    Ok(())
}

/// Pick the best-scoring label.
///
/// Scores must arrive in ascending priority order; a later label only wins
/// with a score higher by more than `SCORE_TIE_TOLERANCE`, so ties
/// resolve to the most severe label even when rounding leaves them a few ulps
/// apart.
pub(crate) fn select_best<I>(scores: I) -> Option<Priority>
where
    I: IntoIterator<Item = (Priority, f64)>,
{
    let mut best: Option<(Priority, f64)> = None;
    for (label, score) in scores {
        match best {
            Some((_, best_score)) if !beats(score, best_score) => {}
            _ => best = Some((label, score)),
        }
    }
    best.map(|(label, _)| label)
}

fn beats(score: f64, best_score: f64) -> bool {
    let tolerance = SCORE_TIE_TOLERANCE.max(best_score.abs() * RELATIVE_TIE_TOLERANCE);
    score - best_score > tolerance
}

/// Builds fresh, untrained classifiers of one configured strategy.
#[derive(Debug, Clone)]
pub struct ClassifierFactory {
    model_type: ModelType,
    k: usize,
    extractor: FeatureExtractor,
}

impl ClassifierFactory {
    pub fn new(model_type: ModelType, extractor: FeatureExtractor) -> Self {
        Self {
            model_type,
            k: DEFAULT_K,
            extractor,
        }
    }

    /// Set the neighbour count used by k-NN
    pub fn with_k(mut self, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(TriageError::invalid("k must be a positive integer"));
        }
        self.k = k;
        Ok(self)
    }

    pub fn from_config(config: &ClassifierConfig, stopwords: Arc<Stopwords>) -> Result<Self> {
        let extractor = FeatureExtractor::new(stopwords, config.use_ngrams);
        Self::new(config.model, extractor).with_k(config.k)
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Create a new untrained classifier
    pub fn build(&self) -> Box<dyn Classifier> {
        let extractor = self.extractor.clone();
        match self.model_type {
            ModelType::Jaccard => Box::new(SetSimilarityClassifier::new(extractor)),
            ModelType::NaiveBayes => Box::new(NaiveBayesClassifier::new(extractor)),
            ModelType::Knn => Box::new(KnnClassifier::from_parts(self.k, extractor)),
        }
    }

    /// Create a classifier and fit it in one step
    pub fn train(&self, examples: &[LabeledExample]) -> Result<Box<dyn Classifier>> {
        let mut classifier = self.build();
        classifier.fit(examples)?;
        Ok(classifier)
    }
}
