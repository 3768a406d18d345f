use crate::error::{Result, TriageError};
use crate::ml::classifier::{ensure_examples, select_best, Classifier};
use crate::ml::features::{FeatureExtractor, TokenSet};
use crate::ml::models::{ModelMetadata, ModelType};
use crate::ml::similarity::jaccard;
use crate::models::{LabeledExample, Priority};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Fitted state: one pooled vocabulary per label
#[derive(Debug, Clone, Default)]
struct LabelVocabularies {
    label_sets: BTreeMap<Priority, TokenSet>,
    label_counts: BTreeMap<Priority, usize>,
}

/// Set-similarity classifier.
///
/// Training pools the token sets of every example with the same label into a
/// single set. Prediction returns the label whose pooled set has the highest
/// Jaccard similarity with the input's token set.
#[derive(Debug, Clone)]
pub struct SetSimilarityClassifier {
    extractor: FeatureExtractor,
    state: Option<LabelVocabularies>,
    metadata: ModelMetadata,
}

impl SetSimilarityClassifier {
    pub fn new(extractor: FeatureExtractor) -> Self {
        let metadata = ModelMetadata::new(ModelType::Jaccard)
            .with_hyperparameter("use_ngrams", extractor.uses_ngrams());
        Self {
            extractor,
            state: None,
            metadata,
        }
    }

    /// Similarity of the input against every trained label, most severe first
    pub fn scores(&self, description: &str) -> Result<BTreeMap<Priority, f64>> {
        let state = self.state.as_ref().ok_or(TriageError::NotTrained)?;
        let tokens = self.extractor.token_set(description);
        Ok(Self::score_tokens(state, &tokens))
    }

    /// Number of training examples seen for a label
    pub fn class_count(&self, priority: Priority) -> usize {
        self.state
            .as_ref()
            .and_then(|s| s.label_counts.get(&priority).copied())
            .unwrap_or(0)
    }

    /// Pooled vocabulary of a label
    pub fn label_vocabulary(&self, priority: Priority) -> Option<&TokenSet> {
        self.state.as_ref()?.label_sets.get(&priority)
    }

    fn score_tokens(state: &LabelVocabularies, tokens: &TokenSet) -> BTreeMap<Priority, f64> {
        state
            .label_sets
            .iter()
            .map(|(&label, set)| (label, jaccard(tokens, set)))
            .collect()
    }
}

impl Default for SetSimilarityClassifier {
    fn default() -> Self {
        Self::new(FeatureExtractor::default())
    }
}

impl Classifier for SetSimilarityClassifier {
    fn fit(&mut self, examples: &[LabeledExample]) -> Result<()> {
        ensure_examples(examples)?;

        let mut state = LabelVocabularies::default();
        for example in examples {
            let tokens = self.extractor.token_set(example.description());
            state
                .label_sets
                .entry(example.priority())
                .or_default()
                .extend(tokens);
            *state.label_counts.entry(example.priority()).or_insert(0) += 1;
        }

        let vocab_size = state
            .label_sets
            .values()
            .flatten()
            .collect::<HashSet<_>>()
            .len();
        self.metadata
            .record_fit(examples.len(), state.label_sets.len(), vocab_size);

        info!(
            model = %ModelType::Jaccard,
            examples = examples.len(),
            labels = state.label_sets.len(),
            vocab_size,
            "Classifier fitted"
        );

        self.state = Some(state);
        Ok(())
    }

    fn predict(&self, description: &str) -> Result<Priority> {
        let state = self.state.as_ref().ok_or(TriageError::NotTrained)?;
        let tokens = self.extractor.token_set(description);

        if tokens.is_empty() {
            debug!(description, "No usable tokens, defaulting to lowest priority");
            return Ok(Priority::Low);
        }

        let scores = Self::score_tokens(state, &tokens);
        let prediction = select_best(scores).unwrap_or(Priority::Low);
        debug!(description, prediction = %prediction, "Predicted priority");
        Ok(prediction)
    }

    fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    fn model_type(&self) -> ModelType {
        ModelType::Jaccard
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
