//! Noun extraction for topical-overlap retrieval.
//!
//! Approximates "nouns" as word tokens that survive a function-word filter.
//! This is a shallow heuristic, not a POS tagger: it exists only to rank
//! stored exchanges by topical overlap with a query.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Word tokens: a letter or digit followed by letters, digits, apostrophes
/// or hyphens. Unicode-aware so non-Latin scripts tokenize too.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}'’-]*").expect("Invalid token regex"));

/// English function words that are never treated as nouns.
static FUNCTION_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Articles, demonstratives, quantifiers
        "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every", "all",
        "both", "few", "many", "much", "more", "most", "other", "another", "such", "no", "none",
        // Pronouns
        "i", "me", "my", "mine", "we", "us", "our", "ours", "you", "your", "yours", "he", "him",
        "his", "she", "her", "hers", "it", "its", "they", "them", "their", "theirs", "who", "whom",
        "whose", "which", "what", "something", "anything", "nothing", "everything", "someone",
        "anyone", "everyone",
        // Prepositions and conjunctions
        "in", "on", "at", "by", "for", "with", "about", "against", "between", "into", "through",
        "during", "before", "after", "above", "below", "to", "from", "up", "down", "of", "off",
        "over", "under", "and", "but", "or", "nor", "so", "yet", "if", "then", "else", "when",
        "where", "why", "how", "because", "while", "as", "than", "until", "although",
        // Auxiliaries and high-frequency verbs
        "am", "is", "are", "was", "were", "be", "been", "being", "do", "does", "did", "doing",
        "have", "has", "had", "having", "will", "would", "shall", "should", "can", "could", "may",
        "might", "must", "get", "got", "give", "make", "know", "tell", "say", "said", "go", "went",
        "come", "want", "like", "need", "let", "please",
        // Adverbial filler
        "not", "very", "too", "also", "just", "only", "there", "here", "now", "again", "once",
        "ever", "never", "always", "really", "quite",
    ]
    .into_iter()
    .collect()
});

/// Extracts the set of noun-like tokens from text.
#[derive(Debug, Clone, Copy)]
pub struct NounExtractor {
    /// Minimum token length in characters; shorter tokens are dropped.
    min_token_chars: usize,
}

impl NounExtractor {
    pub fn new(min_token_chars: usize) -> Self {
        Self { min_token_chars }
    }

    /// Extract the noun set from `text`.
    ///
    /// Tokens shorter than the configured minimum and English function words
    /// are dropped. Case is preserved; callers compare case-sensitively.
    pub fn nouns(&self, text: &str) -> BTreeSet<String> {
        TOKEN_RE
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|t| t.chars().count() >= self.min_token_chars)
            .filter(|t| !FUNCTION_WORDS.contains(t.to_lowercase().as_str()))
            .map(|t| t.to_string())
            .collect()
    }

    /// Extract keywords for a store lookup, degrading to the whole trimmed
    /// input as a single keyword when extraction yields nothing.
    pub fn keywords_or_fallback(&self, text: &str) -> Vec<String> {
        let nouns = self.nouns(text);
        if nouns.is_empty() {
            let raw = text.trim();
            if raw.is_empty() {
                Vec::new()
            } else {
                vec![raw.to_string()]
            }
        } else {
            nouns.into_iter().collect()
        }
    }
}

impl Default for NounExtractor {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Overlap ratio between a query keyword set and a candidate keyword set:
/// |intersection| / |query|. Zero when the query set is empty.
pub fn overlap_ratio(query: &BTreeSet<String>, candidate: &BTreeSet<String>) -> f64 {
    if query.is_empty() {
        return 0.0;
    }
    let shared = query.intersection(candidate).count();
    shared as f64 / query.len() as f64
}
