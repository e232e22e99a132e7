use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evaluate::scoring;
use crate::index::SearchIndex;

/// Fixed result count per query, matching the original engine.
pub const TOP_K: usize = 5;

/// Index-aligned result payload: full document texts, cosine scores in
/// [-1, 1], and original corpus indices. At most [`TOP_K`] entries, ordered
/// by descending score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub documents: Vec<String>,
    pub similarities: Vec<f64>,
    pub indices: Vec<usize>,
}

/// Read-only query frontend over a fitted [`SearchIndex`].
///
/// Holds the index behind an `Arc`, so clones of the service can serve
/// queries from any number of threads without coordination.
#[derive(Debug, Clone)]
pub struct QueryService {
    index: Arc<SearchIndex>,
}

impl QueryService {
    pub fn new(index: Arc<SearchIndex>) -> Self {
        Self { index }
    }

    /// Vectorize, project, and rank one query against the cached corpus
    /// matrix, keeping the fixed [`TOP_K`] best matches. Degenerate queries
    /// (empty, whitespace, out-of-vocabulary) score zero everywhere rather
    /// than failing.
    pub fn search(&self, query: &str) -> SearchResponse {
        self.search_with_k(query, TOP_K)
    }

    /// Same as [`search`](Self::search) with an explicit result bound.
    pub fn search_with_k(&self, query: &str, k: usize) -> SearchResponse {
        let projection = self.index.project_query(query);
        let hits = scoring::rank(projection.view(), self.index.doc_matrix(), k);

        let mut documents = Vec::with_capacity(hits.len());
        let mut similarities = Vec::with_capacity(hits.len());
        let mut indices = Vec::with_capacity(hits.len());
        for hit in &hits.list {
            if let Some(doc) = self.index.store().get(hit.index) {
                documents.push(doc.text.clone());
                similarities.push(hit.score);
                indices.push(hit.index);
            }
        }

        debug!(query_len = query.len(), hits = indices.len(), "query served");
        SearchResponse {
            documents,
            similarities,
            indices,
        }
    }
}
