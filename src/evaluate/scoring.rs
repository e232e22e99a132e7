use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use serde::Serialize;

/// A single ranked match: corpus row index plus cosine score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitEntry {
    pub index: usize,
    pub score: f64,
}

/// Ranked search results.
#[derive(Debug, Clone, Default)]
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    pub fn new(list: Vec<HitEntry>) -> Self {
        Hits { list }
    }

    /// Sort by descending score; equal scores keep the lower row index first.
    pub fn sort_by_score(&mut self) -> &mut Self {
        // NaN never survives ranking
        self.list.retain(|h| !h.score.is_nan());
        self.list
            .sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.index.cmp(&b.index)));
        self
    }

    pub fn truncate(&mut self, k: usize) -> &mut Self {
        self.list.truncate(k);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Cosine similarity between two dense vectors.
/// cosθ = A・B / (|A||B|); a zero-norm side scores 0.0 rather than NaN.
pub fn cosine_similarity(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    let dot = a.dot(&b);
    let norm = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if norm > 0.0 {
        dot / norm
    } else {
        0.0
    }
}

/// Score every row of `matrix` against `query` by cosine similarity and keep
/// the top `k`, descending, lower index first on ties.
///
/// `k` larger than the row count returns every row; an empty matrix returns
/// empty hits.
pub fn rank(query: ArrayView1<f64>, matrix: &Array2<f64>, k: usize) -> Hits {
    debug_assert_eq!(query.len(), matrix.ncols());
    let list: Vec<HitEntry> = (0..matrix.nrows())
        .into_par_iter()
        .map(|index| HitEntry {
            index,
            score: cosine_similarity(query, matrix.row(index)),
        })
        .collect();
    let mut hits = Hits::new(list);
    hits.sort_by_score().truncate(k);
    hits
}
