use std::collections::HashSet;
use std::time::Instant;

use ndarray::{Array1, Array2};
use tracing::info;

use crate::corpus::CorpusStore;
use crate::projector::{SvdProjector, DEFAULT_COMPONENTS};
use crate::vectorizer::{TfidfVectorizer, DEFAULT_MAX_FEATURES};

/// Configuration for the one-shot fitting pass.
///
/// `build` consumes the builder, so everything downstream of it is read-only:
/// there is no way to re-fit a live index.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    stopwords: HashSet<String>,
    max_features: usize,
    n_components: usize,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self {
            stopwords: HashSet::new(),
            max_features: DEFAULT_MAX_FEATURES,
            n_components: DEFAULT_COMPONENTS,
        }
    }

    pub fn stopwords(mut self, stopwords: HashSet<String>) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn n_components(mut self, n_components: usize) -> Self {
        self.n_components = n_components;
        self
    }

    /// Fit the vectorizer over the whole store, fit the projector over the
    /// vectorized corpus, and cache the projected corpus matrix.
    pub fn build(self, store: CorpusStore) -> SearchIndex {
        let started = Instant::now();
        let (vectorizer, rows) = {
            let texts = store.texts();
            let vectorizer = TfidfVectorizer::fit(&texts, &self.stopwords, self.max_features);
            let rows = vectorizer.transform_all(&texts);
            (vectorizer, rows)
        };
        let projector = SvdProjector::fit(&rows, vectorizer.vocabulary().len(), self.n_components);
        let doc_matrix = projector.transform_all(&rows);

        info!(
            docs = store.len(),
            vocab = vectorizer.vocabulary().len(),
            components = projector.n_components(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search index built"
        );

        SearchIndex {
            store,
            vectorizer,
            projector,
            doc_matrix,
        }
    }
}

/// Immutable fitted state: corpus, vocabulary, projection basis, and the
/// cached projected corpus matrix. Only read-only query operations exist past
/// this point, so concurrent queries need no coordination.
#[derive(Debug)]
pub struct SearchIndex {
    store: CorpusStore,
    vectorizer: TfidfVectorizer,
    projector: SvdProjector,
    doc_matrix: Array2<f64>,
}

impl SearchIndex {
    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn projector(&self) -> &SvdProjector {
        &self.projector
    }

    /// One row per document, one column per latent component.
    pub fn doc_matrix(&self) -> &Array2<f64> {
        &self.doc_matrix
    }

    /// Vectorize and project one query with the already-fit state; nothing is
    /// refit. An empty or out-of-vocabulary query projects to the zero vector.
    pub fn project_query(&self, query: &str) -> Array1<f64> {
        let row = self.vectorizer.transform(query);
        self.projector.transform(&row)
    }
}
