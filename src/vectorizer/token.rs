use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Minimum token length kept by the tokenizer. Single characters carry no
/// useful term signal for ranking.
const MIN_TOKEN_LEN: usize = 2;

/// Split `text` into lowercase alphanumeric tokens of at least two characters.
/// The length filter applies to the lowercased form, which can differ in
/// character count from the original.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|t| t.to_lowercase())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
}

/// Term occurrence counts for a single piece of text.
///
/// Used as the base data for TF (term frequency) weighting. Keeps both the
/// per-term counts and the total token count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    term_count: IndexMap<String, u32>,
    total_count: u64,
}

impl TermFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `text` and count every term.
    pub fn from_text(text: &str) -> Self {
        let mut freq = Self::new();
        for token in tokenize(text) {
            let count = freq.term_count.entry(token).or_insert(0);
            *count += 1;
            freq.total_count += 1;
        }
        freq
    }

    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        let count = self.term_count.entry(term.to_string()).or_insert(0);
        *count += 1;
        self.total_count += 1;
        self
    }

    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Occurrence count of `term`, zero if absent.
    #[inline]
    pub fn term_count(&self, term: &str) -> u32 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Total number of counted tokens.
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_count
    }

    /// Number of distinct terms.
    #[inline]
    pub fn unique_term_count(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.term_count.iter().map(|(t, c)| (t.as_str(), *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_splits_on_punctuation() {
        let tokens: Vec<String> = tokenize("The Rocket, launched INTO space!").collect();
        assert_eq!(tokens, vec!["the", "rocket", "launched", "into", "space"]);
    }

    #[test]
    fn tokenize_drops_single_characters() {
        let tokens: Vec<String> = tokenize("a B cat I on x9").collect();
        assert_eq!(tokens, vec!["cat", "on", "x9"]);
    }

    #[test]
    fn tokenize_empty_and_whitespace_yield_nothing() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize("   \t\n ").count(), 0);
        assert_eq!(tokenize("?!., -").count(), 0);
    }

    #[test]
    fn length_filter_sees_the_lowercased_token() {
        // 'İ' (U+0130) lowercases to "i\u{307}", two chars, so it survives
        // the minimum-length filter
        let tokens: Vec<String> = tokenize("İ ok").collect();
        assert_eq!(tokens, vec!["i\u{307}".to_string(), "ok".to_string()]);
    }

    #[test]
    fn from_text_counts_repeated_terms() {
        let freq = TermFrequency::from_text("cat sat on the cat mat");
        assert_eq!(freq.term_count("cat"), 2);
        assert_eq!(freq.term_count("mat"), 1);
        assert_eq!(freq.term_count("dog"), 0);
        assert_eq!(freq.term_sum(), 6);
        assert_eq!(freq.unique_term_count(), 5);
    }

    #[test]
    fn add_terms_matches_from_text() {
        let mut manual = TermFrequency::new();
        manual.add_terms(&["dog", "sat", "on", "log", "dog"]);
        let parsed = TermFrequency::from_text("dog sat on log dog");
        assert_eq!(manual.term_count("dog"), parsed.term_count("dog"));
        assert_eq!(manual.term_sum(), parsed.term_sum());
    }
}
