//! Keyword search over a directory of research papers.
//!
//! The corpus is small, so [`KnowledgeBase::search`] does a linear scan: it reads the
//! directory fresh on every call ([`corpus`]) and ranks by term frequency ([`search`]).
//! Swapping in an inverted index would not change this interface.

pub mod corpus;
pub mod search;

use std::path::{Path, PathBuf};

use crate::config::KnowledgeConfig;
use crate::error::{Error, Result};
use corpus::Document;
use search::SearchHit;

/// Read-only view of the research-papers directory.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    root: PathBuf,
    extensions: Vec<String>,
    excerpt_chars: usize,
    remove_stop_words: bool,
    normalize_by_length: bool,
}

impl KnowledgeBase {
    /// A knowledge base over `root` with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(root, &KnowledgeConfig::default())
    }

    /// A knowledge base over `root` using the search settings in `config`.
    pub fn from_config(root: impl Into<PathBuf>, config: &KnowledgeConfig) -> Self {
        Self {
            root: root.into(),
            extensions: config.extensions.clone(),
            excerpt_chars: config.excerpt_chars.max(1),
            remove_stop_words: config.remove_stop_words,
            normalize_by_length: config.normalize_by_length,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every document currently on disk, sorted by path.
    pub fn documents(&self) -> Result<Vec<Document>> {
        corpus::scan_corpus(&self.root, &self.extensions)
    }

    /// Rank documents against `query` and return at most `max_results` hits.
    ///
    /// No matches is an empty result, not an error.
    pub fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        if max_results == 0 {
            return Err(Error::InvalidQuery("max_results must be at least 1".into()));
        }
        let terms = search::query_terms(query, self.remove_stop_words);
        if terms.is_empty() {
            return Err(Error::InvalidQuery(format!(
                "query {query:?} has no searchable terms"
            )));
        }

        let documents = self.documents()?;
        let hits = search::rank(
            &documents,
            &terms,
            max_results,
            self.excerpt_chars,
            self.normalize_by_length,
        );

        tracing::info!(
            query = %query,
            terms = ?terms,
            documents = documents.len(),
            returned = hits.len(),
            "knowledge base searched"
        );
        Ok(hits)
    }
}
