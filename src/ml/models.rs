use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{EnumIter, EnumString};

/// Classification strategy
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum ModelType {
    /// Jaccard similarity against each label's pooled vocabulary
    #[default]
    #[serde(alias = "mock", alias = "set")]
    #[strum(serialize = "jaccard", serialize = "mock", serialize = "set")]
    Jaccard,

    /// Multinomial Naive Bayes with add-one smoothing
    #[serde(alias = "nb", alias = "naive-bayes")]
    #[strum(serialize = "naive_bayes", serialize = "naive-bayes", serialize = "nb")]
    NaiveBayes,

    /// K-Nearest Neighbors over Jaccard similarity
    #[strum(serialize = "knn")]
    Knn,
}

impl ModelType {
    /// Short configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Jaccard => "jaccard",
            ModelType::NaiveBayes => "naive_bayes",
            ModelType::Knn => "knn",
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelType::Jaccard => write!(f, "Set Similarity (Jaccard)"),
            ModelType::NaiveBayes => write!(f, "Naive Bayes"),
            ModelType::Knn => write!(f, "K-Nearest Neighbors"),
        }
    }
}

/// Model metadata, refreshed on every `fit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model type
    pub model_type: ModelType,

    /// Training timestamp (`None` until fitted)
    pub trained_at: Option<DateTime<Utc>>,

    /// Number of training samples
    pub n_training_samples: usize,

    /// Number of distinct labels seen in training
    pub n_labels: usize,

    /// Number of distinct features seen in training
    pub vocab_size: usize,

    /// Hyperparameters
    pub hyperparameters: BTreeMap<String, String>,
}

impl ModelMetadata {
    pub fn new(model_type: ModelType) -> Self {
        Self {
            model_type,
            trained_at: None,
            n_training_samples: 0,
            n_labels: 0,
            vocab_size: 0,
            hyperparameters: BTreeMap::new(),
        }
    }

    pub fn with_hyperparameter(mut self, key: &str, value: impl ToString) -> Self {
        self.hyperparameters.insert(key.to_string(), value.to_string());
        self
    }

    pub(crate) fn record_fit(&mut self, n_training_samples: usize, n_labels: usize, vocab_size: usize) {
        self.trained_at = Some(Utc::now());
        self.n_training_samples = n_training_samples;
        self.n_labels = n_labels;
        self.vocab_size = vocab_size;
    }
}

/// Per-class evaluation metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

impl ClassMetrics {
    /// Derive metrics from true positive / false positive / false negative counts
    pub fn from_counts(tp: usize, fp: usize, fn_count: usize) -> Self {
        let precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };

        let recall = if tp + fn_count > 0 {
            tp as f64 / (tp + fn_count) as f64
        } else {
            0.0
        };

        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            f1_score,
            support: tp + fn_count,
        }
    }
}
