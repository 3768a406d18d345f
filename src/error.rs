use thiserror::Error;

/// Errors raised by the triage engine
#[derive(Error, Debug)]
pub enum TriageError {
    /// `predict`/`evaluate` on a classifier whose `fit` never ran
    #[error("Classifier not trained")]
    NotTrained,

    /// Bad fold counts, empty example sets, unknown models, bad config values
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TriageError {
    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            TriageError::NotTrained => "NOT_TRAINED",
            TriageError::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            TriageError::Configuration(_) => "CONFIGURATION_ERROR",
            TriageError::Io(_) => "IO_ERROR",
            TriageError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    pub fn is_not_trained(&self) -> bool {
        matches!(self, TriageError::NotTrained)
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, TriageError::InvalidConfiguration(_))
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        TriageError::InvalidConfiguration(message.into())
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for TriageError {
    fn from(err: serde_json::Error) -> Self {
        TriageError::Serialization(err.to_string())
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for TriageError {
    fn from(err: validator::ValidationErrors) -> Self {
        TriageError::InvalidConfiguration(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for TriageError {
    fn from(err: config::ConfigError) -> Self {
        TriageError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TriageError>;
