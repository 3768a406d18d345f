// Training data: the built-in FIR fixture and file loaders.
//
// The engine never reads these on its own; callers load a corpus here and
// pass the examples into `fit`/`evaluate`/`cross_validate` explicitly.

use crate::error::{Result, TriageError};
use crate::models::{LabeledExample, Priority};
use std::path::Path;
use tracing::info;

const DEFAULT_CORPUS: &[(&str, Priority)] = &[
    ("There was a bomb threat at the station", Priority::Critical),
    ("A murder was reported downtown", Priority::Critical),
    ("Attempted fraud in the market", Priority::Critical),
    ("Theft of a bicycle", Priority::Medium),
    ("Robbery at the bank", Priority::Medium),
    ("Harassment complaint filed", Priority::Medium),
    ("Lost wallet", Priority::Low),
    ("Noise complaint", Priority::Low),
    ("Dog missing", Priority::Low),
    ("Explosion in the city center", Priority::Critical),
    ("Assault in the alley", Priority::Medium),
    ("Burglary at the residence", Priority::Medium),
    ("Fight broke out in the bar", Priority::Medium),
    ("Violence reported in the park", Priority::Medium),
    ("Abuse case reported", Priority::Medium),
    ("Kidnap attempt", Priority::Critical),
    ("Hostage situation", Priority::Critical),
    ("Gun found in the car", Priority::Critical),
    ("Threatening messages received", Priority::Critical),
    ("Suspicious activity", Priority::Low),
    ("Vandalism", Priority::Low),
    ("Graffiti on wall", Priority::Low),
    ("Minor accident", Priority::Low),
    ("Public disturbance", Priority::Low),
    ("Pickpocketing", Priority::Medium),
    ("Shoplifting", Priority::Medium),
    ("Domestic dispute", Priority::Medium),
    ("Trespassing", Priority::Low),
    ("Cyberbullying", Priority::Medium),
    ("Online scam", Priority::Critical),
];

/// The built-in labelled FIR descriptions
pub fn default_corpus() -> Vec<LabeledExample> {
    DEFAULT_CORPUS
        .iter()
        .map(|&(description, priority)| LabeledExample::new(description, priority))
        .collect()
}

/// Load a JSON array of `{"description": "...", "priority": 1|2|3}` objects
pub fn load(path: impl AsRef<Path>) -> Result<Vec<LabeledExample>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let examples: Vec<LabeledExample> = serde_json::from_str(&content)?;

    if examples.is_empty() {
        return Err(TriageError::invalid(format!(
            "corpus {} contains no examples",
            path.display()
        )));
    }

    info!(path = %path.display(), examples = examples.len(), "Loaded corpus");
    Ok(examples)
}

/// Load the corpus at `path`, or the built-in one when no path is given
pub fn load_or_default(path: Option<&Path>) -> Result<Vec<LabeledExample>> {
    match path {
        Some(path) => load(path),
        None => Ok(default_corpus()),
    }
}

/// Read a batch file: one description per line, blank lines skipped
pub fn read_descriptions(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
