/// This crate is a latent semantic analysis search engine over a fixed
/// document corpus: TF-IDF vectorization, truncated-SVD projection, and
/// cosine-similarity ranking, behind a fit-once / query-many lifecycle.
pub mod corpus;
pub mod evaluate;
pub mod index;
pub mod projector;
pub mod service;
pub mod sparse;
pub mod vectorizer;

/// Immutable document collection plus loading helpers for the demo binary.
/// Documents are addressed by positional index for the whole process
/// lifetime; ranking results refer back into the store by that index.
pub use corpus::{CorpusStore, Document};

/// Two-phase index construction.
///
/// `IndexBuilder` carries the fitting configuration (stopword set, vocabulary
/// bound, latent component count) and `build` runs the whole offline pipeline
/// exactly once: fit the vectorizer over the corpus, fit the projector over
/// the vectorized corpus, cache the projected corpus matrix. The resulting
/// `SearchIndex` exposes only read-only operations, so the
/// startup-before-query ordering is a property of the types rather than a
/// runtime check.
pub use index::{IndexBuilder, SearchIndex};

/// Query frontend. Shares a fitted `SearchIndex` behind an `Arc` and answers
/// `search(query)` with three index-aligned sequences (documents, similarity
/// scores, corpus indices), at most [`service::TOP_K`] long.
pub use service::{QueryService, SearchResponse};

/// TF-IDF vectorizer: bounded vocabulary with smoothed IDF weights, learned
/// once and then used as a pure transform. Its companion
/// [`vectorizer::token::TermFrequency`] handles tokenization and counting.
pub use vectorizer::TfidfVectorizer;

/// Truncated-SVD projection basis learned from the vectorized corpus.
pub use projector::SvdProjector;

/// Ranked search results: a scored list of corpus row indices, sorted
/// descending with deterministic index tie-breaks.
pub use evaluate::scoring::{HitEntry, Hits};
