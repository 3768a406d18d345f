use crate::error::{Result, TriageError};
use crate::ml::classifier::{ensure_examples, Classifier, DEFAULT_K};
use crate::ml::features::{FeatureExtractor, TokenSet};
use crate::ml::models::{ModelMetadata, ModelType};
use crate::ml::similarity::jaccard;
use crate::models::{LabeledExample, Priority};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info};

/// A scored training example
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub similarity: f64,
    pub priority: Priority,
    /// Position of the example in the training list
    pub index: usize,
}

/// K-Nearest Neighbors classifier using Jaccard similarity.
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    extractor: FeatureExtractor,
    examples: Option<Vec<(TokenSet, Priority)>>,
    metadata: ModelMetadata,
}

impl KnnClassifier {
    pub fn new(k: usize, extractor: FeatureExtractor) -> Result<Self> {
        if k == 0 {
            return Err(TriageError::invalid("k must be a positive integer"));
        }
        Ok(Self::from_parts(k, extractor))
    }

    /// `k` must already be validated as positive
    pub(crate) fn from_parts(k: usize, extractor: FeatureExtractor) -> Self {
        let metadata = ModelMetadata::new(ModelType::Knn)
            .with_hyperparameter("k", k)
            .with_hyperparameter("use_ngrams", extractor.uses_ngrams());
        Self {
            k,
            extractor,
            examples: None,
            metadata,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// The `k` most similar training examples, closest first.
    ///
    /// Equal similarities are ordered by priority (most severe first) and then
    /// by training position. Fewer than `k` stored examples returns all of them.
    pub fn neighbors(&self, description: &str) -> Result<Vec<Neighbor>> {
        let examples = self.examples.as_ref().ok_or(TriageError::NotTrained)?;
        let tokens = self.extractor.token_set(description);
        self.nearest(examples, &tokens)
    }

    fn nearest(
        &self,
        examples: &[(TokenSet, Priority)],
        tokens: &TokenSet,
    ) -> Result<Vec<Neighbor>> {
        if examples.is_empty() {
            return Err(TriageError::invalid("k-NN has no stored examples"));
        }

        let mut scored: Vec<Neighbor> = examples
            .iter()
            .enumerate()
            .map(|(index, (set, priority))| Neighbor {
                similarity: jaccard(tokens, set),
                priority: *priority,
                index,
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then(a.priority.cmp(&b.priority))
                .then(a.index.cmp(&b.index))
        });
        scored.truncate(self.k);

        Ok(scored)
    }

    /// Most frequent label; ties go to the label met first in `neighbors`
    fn vote(neighbors: &[Neighbor]) -> Option<Priority> {
        let mut tally: Vec<(Priority, usize)> = Vec::new();
        for neighbor in neighbors {
            match tally.iter_mut().find(|(p, _)| *p == neighbor.priority) {
                Some((_, count)) => *count += 1,
                None => tally.push((neighbor.priority, 1)),
            }
        }

        let mut best: Option<(Priority, usize)> = None;
        for (priority, count) in tally {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((priority, count)),
            }
        }
        best.map(|(priority, _)| priority)
    }
}

impl Default for KnnClassifier {
    fn default() -> Self {
        Self::from_parts(DEFAULT_K, FeatureExtractor::default())
    }
}

impl Classifier for KnnClassifier {
    fn fit(&mut self, examples: &[LabeledExample]) -> Result<()> {
        ensure_examples(examples)?;

        let stored: Vec<(TokenSet, Priority)> = examples
            .iter()
            .map(|e| (self.extractor.token_set(e.description()), e.priority()))
            .collect();

        let labels: HashSet<Priority> = stored.iter().map(|(_, p)| *p).collect();
        let vocab_size = stored
            .iter()
            .flat_map(|(set, _)| set.iter())
            .collect::<HashSet<_>>()
            .len();
        self.metadata.record_fit(stored.len(), labels.len(), vocab_size);

        info!(
            model = %ModelType::Knn,
            examples = stored.len(),
            labels = labels.len(),
            vocab_size,
            k = self.k,
            "Classifier fitted"
        );

        self.examples = Some(stored);
        Ok(())
    }

    fn predict(&self, description: &str) -> Result<Priority> {
        let examples = self.examples.as_ref().ok_or(TriageError::NotTrained)?;

        let tokens = self.extractor.token_set(description);
        if tokens.is_empty() {
            debug!(description, "No usable tokens, defaulting to lowest priority");
            return Ok(Priority::Low);
        }

        let neighbors = self.nearest(examples, &tokens)?;
        let prediction = Self::vote(&neighbors).unwrap_or(Priority::Low);
        debug!(
            description,
            prediction = %prediction,
            nearest = neighbors.first().map(|n| n.similarity).unwrap_or(0.0),
            "Predicted priority"
        );
        Ok(prediction)
    }

    fn is_trained(&self) -> bool {
        self.examples.is_some()
    }

    fn model_type(&self) -> ModelType {
        ModelType::Knn
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
