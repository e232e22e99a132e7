use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// A raw corpus entry: document text plus its dataset category label.
/// Labels ride along for display; ranking never reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    #[serde(default)]
    pub category: String,
}

/// Startup resource failures. These are fatal: the engine never starts
/// without its corpus and stopword list.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse corpus file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable document collection, addressed by positional index.
///
/// Populated once at startup and never mutated; every ranked result refers
/// back into it by index.
#[derive(Debug, Clone, Default)]
pub struct CorpusStore {
    docs: Vec<Document>,
}

impl CorpusStore {
    pub fn new(docs: Vec<Document>) -> Self {
        Self { docs }
    }

    /// Build a store from bare texts, leaving category labels empty.
    pub fn from_texts<T>(texts: Vec<T>) -> Self
    where
        T: Into<String>,
    {
        let docs = texts
            .into_iter()
            .map(|t| Document {
                text: t.into(),
                category: String::new(),
            })
            .collect();
        Self { docs }
    }

    /// Load a JSON array of `{"text": ..., "category": ...}` objects.
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let docs: Vec<Document> =
            serde_json::from_str(&content).map_err(|source| CorpusError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        info!(docs = docs.len(), path = %path.display(), "loaded corpus");
        Ok(Self { docs })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.docs.get(index)
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    /// Document texts in corpus order.
    pub fn texts(&self) -> Vec<&str> {
        self.docs.iter().map(|d| d.text.as_str()).collect()
    }
}

/// Load a newline-delimited stopword list. Blank lines are skipped and words
/// are lowercased to match the tokenizer.
pub fn load_stopwords<P: AsRef<Path>>(path: P) -> Result<HashSet<String>, CorpusError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn from_texts_indexes_in_order() {
        let store = CorpusStore::from_texts(vec!["first", "second"]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).map(|d| d.text.as_str()), Some("first"));
        assert_eq!(store.get(1).map(|d| d.text.as_str()), Some("second"));
        assert_eq!(store.get(2).map(|d| d.text.as_str()), None);
        assert_eq!(store.texts(), vec!["first", "second"]);
    }

    #[test]
    fn json_corpus_roundtrips_with_optional_category() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"text": "rocket launch", "category": "sci.space"}}, {{"text": "bare doc"}}]"#
        )
        .unwrap();
        let store = CorpusStore::from_json_path(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().category, "sci.space");
        assert_eq!(store.get(1).unwrap().category, "");
    }

    #[test]
    fn missing_corpus_file_is_an_io_error() {
        let err = CorpusStore::from_json_path("/nonexistent/corpus.json").unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }

    #[test]
    fn malformed_corpus_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();
        let err = CorpusStore::from_json_path(file.path()).unwrap_err();
        assert!(matches!(err, CorpusError::Parse { .. }));
    }

    #[test]
    fn stopword_list_skips_blanks_and_lowercases() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "The\n\n  and \nOF\n").unwrap();
        let words = load_stopwords(file.path()).unwrap();
        assert_eq!(words.len(), 3);
        assert!(words.contains("the"));
        assert!(words.contains("and"));
        assert!(words.contains("of"));
    }
}
