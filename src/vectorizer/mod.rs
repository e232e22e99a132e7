pub mod token;

use std::collections::HashSet;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::debug;

use crate::sparse::SparseVec;
use self::token::TermFrequency;

/// Default vocabulary bound, matching the original engine configuration.
pub const DEFAULT_MAX_FEATURES: usize = 1000;

/// Term -> dimension index mapping, fixed after fitting.
///
/// Indices follow lexicographic term order, so a given corpus always produces
/// the same layout.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: IndexMap<String, u32>,
}

impl Vocabulary {
    /// Build from terms already sorted into index order.
    fn from_ordered_terms(terms: Vec<String>) -> Self {
        let terms = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t, i as u32))
            .collect();
        Self { terms }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn index_of(&self, term: &str) -> Option<u32> {
        self.terms.get(term).copied()
    }

    pub fn term_at(&self, index: usize) -> Option<&str> {
        self.terms.get_index(index).map(|(t, _)| t.as_str())
    }

    /// Terms in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }
}

/// TF-IDF vectorizer: a fixed vocabulary plus smoothed IDF weights.
///
/// The only way to obtain one is [`TfidfVectorizer::fit`], so the
/// fit-before-transform ordering is enforced by construction rather than
/// checked at runtime. Fitted state is immutable.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocab: Vocabulary,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn a vocabulary and IDF weights over `texts`.
    ///
    /// The vocabulary is bounded to the `max_features` terms with the highest
    /// corpus-wide count after removing `stopwords`; count ties break by
    /// lexicographic term order. IDF uses the smoothed form
    /// `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit<T>(texts: &[T], stopwords: &HashSet<String>, max_features: usize) -> Self
    where
        T: AsRef<str> + Sync,
    {
        let freqs: Vec<TermFrequency> = texts
            .par_iter()
            .map(|t| TermFrequency::from_text(t.as_ref()))
            .collect();

        // corpus-wide term count and document frequency
        let mut corpus_stats: IndexMap<String, (u64, u32)> = IndexMap::new();
        for freq in &freqs {
            for (term, count) in freq.iter() {
                if stopwords.contains(term) {
                    continue;
                }
                let entry = corpus_stats.entry(term.to_string()).or_insert((0, 0));
                entry.0 += count as u64;
                entry.1 += 1;
            }
        }

        // keep the most frequent terms, ties by term order
        let mut candidates: Vec<(&String, u64)> = corpus_stats
            .iter()
            .map(|(term, (count, _))| (term, *count))
            .collect();
        candidates.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        candidates.truncate(max_features);

        // dimension indices follow lexicographic order among the selected terms
        let mut selected: Vec<String> = candidates.into_iter().map(|(t, _)| t.clone()).collect();
        selected.sort_unstable();

        let n_docs = texts.len() as f64;
        let idf: Vec<f64> = selected
            .iter()
            .map(|term| {
                let df = corpus_stats.get(term.as_str()).map_or(0, |(_, df)| *df) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        debug!(
            docs = texts.len(),
            vocab = selected.len(),
            "fitted tf-idf vectorizer"
        );

        Self {
            vocab: Vocabulary::from_ordered_terms(selected),
            idf,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// TF-IDF weights for one text: raw term count times IDF, L2-normalized.
    /// Terms outside the vocabulary contribute nothing; text with no known
    /// terms yields the all-zero vector.
    pub fn transform(&self, text: &str) -> SparseVec {
        self.transform_freq(&TermFrequency::from_text(text))
    }

    /// Same as [`transform`](Self::transform) for pre-counted terms.
    pub fn transform_freq(&self, freq: &TermFrequency) -> SparseVec {
        let mut vec = SparseVec::with_capacity(
            self.vocab.len(),
            freq.unique_term_count().min(self.vocab.len()),
        );
        // walking the vocabulary in index order keeps the output index-sorted
        for (ind, term) in self.vocab.iter().enumerate() {
            let count = freq.term_count(term);
            if count > 0 {
                vec.push(ind as u32, count as f64 * self.idf[ind]);
            }
        }
        let norm = vec.norm();
        if norm > 0.0 {
            vec.scale(1.0 / norm);
        }
        vec
    }

    /// Transform a whole collection in parallel, preserving order.
    pub fn transform_all<T>(&self, texts: &[T]) -> Vec<SparseVec>
    where
        T: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|t| self.transform(t.as_ref()))
            .collect()
    }
}
