use crate::ml::preprocessing::{Stopwords, TextNormalizer};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Joins consecutive tokens into an n-gram term.
///
/// Punctuation is stripped during normalization, so the separator never
/// appears inside a plain token.
pub const NGRAM_SEPARATOR: &str = "_";

/// Extra n-gram lengths added when n-grams are enabled
pub const NGRAM_SIZES: [usize; 2] = [2, 3];

/// De-duplicated feature keys of one description
pub type TokenSet = HashSet<String>;

/// Term → occurrence count for one description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBag {
    counts: HashMap<String, usize>,
}

impl TokenBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, term: impl Into<String>) {
        *self.counts.entry(term.into()).or_insert(0) += 1;
    }

    pub fn extend<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for term in terms {
            self.add(term);
        }
    }

    pub fn count(&self, term: &str) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(term, &count)| (term.as_str(), count))
    }

    pub fn token_set(&self) -> TokenSet {
        self.counts.keys().cloned().collect()
    }

    pub fn into_token_set(self) -> TokenSet {
        self.counts.into_keys().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for TokenBag {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut bag = TokenBag::new();
        bag.extend(iter);
        bag
    }
}

/// Build n-grams of length `n` from consecutive tokens.
///
/// Fewer than `n` tokens yields no n-grams.
pub fn ngrams(tokens: &[String], n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    tokens
        .windows(n)
        .map(|window| window.join(NGRAM_SEPARATOR))
        .collect()
}

/// Feature extractor for incident descriptions.
///
/// Every classifier owns one, and uses it for both `fit` and `predict`, so
/// training and query text always go through the same normalization and
/// n-gram settings.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    normalizer: TextNormalizer,

    /// Add bigrams and trigrams to the unigram counts
    use_ngrams: bool,
}

impl FeatureExtractor {
    pub fn new(stopwords: Arc<Stopwords>, use_ngrams: bool) -> Self {
        Self {
            normalizer: TextNormalizer::new(stopwords),
            use_ngrams,
        }
    }

    pub fn with_ngrams(mut self, use_ngrams: bool) -> Self {
        self.use_ngrams = use_ngrams;
        self
    }

    /// Normalized tokens of a description
    pub fn tokens(&self, description: &str) -> Vec<String> {
        self.normalizer.normalize(description)
    }

    /// Count unigrams (plus bigrams/trigrams when enabled)
    pub fn extract(&self, description: &str) -> TokenBag {
        let tokens = self.tokens(description);
        let mut bag = TokenBag::new();

        if self.use_ngrams {
            for n in NGRAM_SIZES {
                bag.extend(ngrams(&tokens, n));
            }
        }
        bag.extend(tokens);

        bag
    }

    pub fn token_set(&self, description: &str) -> TokenSet {
        self.extract(description).into_token_set()
    }

    pub fn uses_ngrams(&self) -> bool {
        self.use_ngrams
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(Arc::new(Stopwords::english()), false)
    }
}
