//! Answering strategies and their registry.
//!
//! - `keyword`: lesson suggestions by topic or word overlap
//! - `phrase`: first lesson containing the whole question
//! - `tfidf`: best course line by TF-IDF cosine similarity
//! - `vector`: embedded lesson chunks as context for a language model
//! - `llm`: direct completion

pub mod keyword;
pub mod llm;
pub mod phrase;
pub mod tfidf;
pub mod vector;

#[cfg(test)]
pub(crate) mod testing;

pub use keyword::KeywordRetriever;
pub use llm::LlmRetriever;
pub use phrase::PhraseRetriever;
pub use tfidf::TfIdfRetriever;
pub use vector::{VectorRetriever, VectorSettings};

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::RetrievalStrategy;
use crate::domain::ports::Retriever;

const EXCERPT_CHARS: usize = 160;

/// First line of `content`, shortened for display.
pub(crate) fn excerpt(content: &str) -> String {
    let line = content.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or_default();
    if line.chars().count() <= EXCERPT_CHARS {
        line.to_string()
    } else {
        let head: String = line.chars().take(EXCERPT_CHARS).collect();
        format!("{head}...")
    }
}

/// Retrievers keyed by strategy
#[derive(Default, Clone)]
pub struct RetrieverRegistry {
    retrievers: HashMap<RetrievalStrategy, Arc<dyn Retriever>>,
}

impl RetrieverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the strategies that need no network access
    pub fn offline(tfidf_threshold: f32) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(KeywordRetriever));
        registry.register(Arc::new(PhraseRetriever));
        registry.register(Arc::new(TfIdfRetriever::new(tfidf_threshold)));
        registry
    }

    /// Register a retriever, replacing any with the same strategy
    pub fn register(&mut self, retriever: Arc<dyn Retriever>) {
        self.retrievers.insert(retriever.strategy(), retriever);
    }

    pub fn get(&self, strategy: RetrievalStrategy) -> DomainResult<Arc<dyn Retriever>> {
        self.retrievers.get(&strategy).cloned().ok_or_else(|| {
            DomainError::ValidationFailed(format!("retrieval strategy '{strategy}' is not available"))
        })
    }

    /// Registered strategies in declaration order
    pub fn strategies(&self) -> Vec<RetrievalStrategy> {
        RetrievalStrategy::ALL
            .into_iter()
            .filter(|s| self.retrievers.contains_key(s))
            .collect()
    }
}
