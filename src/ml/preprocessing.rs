use crate::error::Result;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Built-in English function words
const ENGLISH_STOPWORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "and", "in", "to", "of", "for", "with", "by",
    "as", "from", "that", "this", "it", "was", "were", "has", "had", "have", "be", "been", "are",
    "or", "but", "not", "so", "if", "then", "than", "into", "out", "about", "over", "under",
    "after", "before", "between", "during", "without", "within", "upon", "against", "among",
    "through", "per", "each", "all", "any", "some", "no", "nor", "can", "will", "just", "do",
    "does", "did", "done", "should", "could", "would", "may", "might", "must", "shall", "let",
    "us", "we", "you", "he", "she", "they", "them", "his", "her", "their", "our", "your", "my",
    "mine", "yours", "ours", "theirs", "who", "whom", "whose", "what", "when", "where", "why",
    "how", "i", "me", "him", "itself", "yourself", "ourselves", "themselves", "herself",
    "himself", "myself",
];

/// A case-folded stopword set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// The built-in English list
    pub fn english() -> Self {
        Self::from_words(ENGLISH_STOPWORDS.iter().copied())
    }

    /// An empty set (nothing is filtered)
    pub fn none() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Load a stopword file: one word per line, blank lines and `#` comments skipped
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));
        Ok(Self::from_words(words))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::english()
    }
}

/// Turns free text into an ordered token sequence.
///
/// Lower-cases the input, deletes ASCII punctuation without inserting a
/// separator ("break-in" becomes "breakin"), splits on whitespace and drops
/// stopwords.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stopwords: Arc<Stopwords>,
}

impl TextNormalizer {
    pub fn new(stopwords: Arc<Stopwords>) -> Self {
        Self { stopwords }
    }

    pub fn normalize(&self, text: &str) -> Vec<String> {
        Self::clean(text)
            .split_whitespace()
            .filter(|token| !self.stopwords.contains(token))
            .map(str::to_string)
            .collect()
    }

    /// Lower-case and strip ASCII punctuation
    pub fn clean(text: &str) -> String {
        text.to_lowercase()
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(Stopwords::english()))
    }
}
