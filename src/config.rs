use crate::error::Result;
use crate::ml::classifier::DEFAULT_K;
use crate::ml::models::ModelType;
use crate::ml::preprocessing::Stopwords;
use crate::models::LabeledExample;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Classifier configuration
    #[serde(default)]
    #[validate(nested)]
    pub classifier: ClassifierConfig,

    /// Evaluation configuration
    #[serde(default)]
    #[validate(nested)]
    pub evaluation: EvaluationConfig,

    /// Training data and stopword sources
    #[serde(default)]
    pub data: DataConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("TRIAGE_CONFIG_PATH").unwrap_or_else(|_| "config/local.toml".to_string());
        Self::load_from(config_path)
    }

    /// Load configuration, overriding the defaults with the file at `path` if it exists
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_string_lossy().into_owned();

        let config: Config = config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            // Override with config file if it exists
            .add_source(config::File::with_name(&path).required(false))
            // Override with environment variables (prefix: INCIDENT_TRIAGE)
            .add_source(
                config::Environment::with_prefix("INCIDENT_TRIAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            evaluation: EvaluationConfig::default(),
            data: DataConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ClassifierConfig {
    /// Classification strategy
    #[serde(default)]
    pub model: ModelType,

    /// Neighbour count for k-NN
    #[serde(default = "default_k")]
    #[validate(range(min = 1))]
    pub k: usize,

    /// Add bigrams and trigrams to the features
    #[serde(default)]
    pub use_ngrams: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: ModelType::default(),
            k: default_k(),
            use_ngrams: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EvaluationConfig {
    /// Number of cross-validation folds
    #[serde(default = "default_folds")]
    #[validate(range(min = 2))]
    pub folds: usize,

    /// Shuffle seed; unset means a fresh random shuffle per run
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            folds: default_folds(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON corpus; the built-in corpus is used when unset
    pub corpus_path: Option<PathBuf>,

    /// Stopword file; the built-in English list is used when unset
    pub stopwords_path: Option<PathBuf>,
}

impl DataConfig {
    pub fn load_corpus(&self) -> Result<Vec<LabeledExample>> {
        crate::corpus::load_or_default(self.corpus_path.as_deref())
    }

    pub fn load_stopwords(&self) -> Result<Stopwords> {
        match &self.stopwords_path {
            Some(path) => Stopwords::load(path),
            None => Ok(Stopwords::english()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

// Default value functions
fn default_k() -> usize {
    DEFAULT_K
}

fn default_folds() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}
