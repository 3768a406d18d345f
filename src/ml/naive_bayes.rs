use crate::error::{Result, TriageError};
use crate::ml::classifier::{ensure_examples, select_best, Classifier};
use crate::ml::features::{FeatureExtractor, TokenBag};
use crate::ml::models::{ModelMetadata, ModelType};
use crate::models::{LabeledExample, Priority};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

/// Log-likelihood added per token when a label's smoothed word distribution
/// has a zero denominator (empty vocabulary and no words for that label).
pub const EMPTY_DISTRIBUTION_PENALTY: f64 = -1e9;

/// Per-label word statistics
#[derive(Debug, Clone, Default)]
struct ClassStats {
    /// Training examples carrying this label
    examples: usize,

    /// Word → occurrences across this label's examples
    word_counts: HashMap<String, usize>,

    /// Sum of `word_counts`
    total_words: usize,
}

#[derive(Debug, Clone, Default)]
struct NaiveBayesState {
    classes: BTreeMap<Priority, ClassStats>,
    vocabulary: HashSet<String>,
    total_examples: usize,
}

/// Multinomial Naive Bayes classifier with add-one (Laplace) smoothing.
///
/// score(label) = ln(P(label)) + Σ ln((count(token, label) + 1) / (words(label) + |V|))
///
/// summed over input tokens with repetition.
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    extractor: FeatureExtractor,
    state: Option<NaiveBayesState>,
    metadata: ModelMetadata,
}

impl NaiveBayesClassifier {
    pub fn new(extractor: FeatureExtractor) -> Self {
        let metadata = ModelMetadata::new(ModelType::NaiveBayes)
            .with_hyperparameter("smoothing", "laplace")
            .with_hyperparameter("use_ngrams", extractor.uses_ngrams());
        Self {
            extractor,
            state: None,
            metadata,
        }
    }

    /// Log-probability score of every trained label
    pub fn log_scores(&self, description: &str) -> Result<BTreeMap<Priority, f64>> {
        let state = self.state.as_ref().ok_or(TriageError::NotTrained)?;
        let bag = self.extractor.extract(description);
        Ok(Self::score_bag(state, &bag))
    }

    pub fn vocabulary_size(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.vocabulary.len())
    }

    /// Occurrences of a word across a label's training examples
    pub fn word_count(&self, priority: Priority, word: &str) -> usize {
        self.state
            .as_ref()
            .and_then(|s| s.classes.get(&priority))
            .and_then(|c| c.word_counts.get(word).copied())
            .unwrap_or(0)
    }

    fn score_bag(state: &NaiveBayesState, bag: &TokenBag) -> BTreeMap<Priority, f64> {
        let vocab_size = state.vocabulary.len();
        let total = state.total_examples as f64;

        // Sum in key order so the rounding is the same on every run
        let mut terms: Vec<(&str, usize)> = bag.iter().collect();
        terms.sort_unstable_by_key(|&(token, _)| token);

        state
            .classes
            .iter()
            .map(|(&label, stats)| {
                let mut log_prob = (stats.examples as f64 / total).ln();
                let denominator = stats.total_words + vocab_size;

                for &(token, occurrences) in &terms {
                    let term = if denominator == 0 {
                        EMPTY_DISTRIBUTION_PENALTY
                    } else {
                        let count = stats.word_counts.get(token).copied().unwrap_or(0);
                        ((count + 1) as f64 / denominator as f64).ln()
                    };
                    log_prob += term * occurrences as f64;
                }

                (label, log_prob)
            })
            .collect()
    }
}

impl Default for NaiveBayesClassifier {
    fn default() -> Self {
        Self::new(FeatureExtractor::default())
    }
}

impl Classifier for NaiveBayesClassifier {
    fn fit(&mut self, examples: &[LabeledExample]) -> Result<()> {
        ensure_examples(examples)?;

        let mut state = NaiveBayesState {
            total_examples: examples.len(),
            ..Default::default()
        };

        for example in examples {
            let bag = self.extractor.extract(example.description());
            let stats = state.classes.entry(example.priority()).or_default();
            stats.examples += 1;

            for (token, occurrences) in bag.iter() {
                *stats.word_counts.entry(token.to_string()).or_insert(0) += occurrences;
                stats.total_words += occurrences;
                if !state.vocabulary.contains(token) {
                    state.vocabulary.insert(token.to_string());
                }
            }
        }

        self.metadata
            .record_fit(examples.len(), state.classes.len(), state.vocabulary.len());

        info!(
            model = %ModelType::NaiveBayes,
            examples = examples.len(),
            labels = state.classes.len(),
            vocab_size = state.vocabulary.len(),
            "Classifier fitted"
        );

        self.state = Some(state);
        Ok(())
    }

    fn predict(&self, description: &str) -> Result<Priority> {
        let scores = self.log_scores(description)?;
        // fit never leaves an empty class table
        let prediction = select_best(scores).unwrap_or(Priority::Low);
        debug!(description, prediction = %prediction, "Predicted priority");
        Ok(prediction)
    }

    fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    fn model_type(&self) -> ModelType {
        ModelType::NaiveBayes
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
