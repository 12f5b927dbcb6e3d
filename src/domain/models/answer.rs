//! Answer and retrieval strategy models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a question gets answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalStrategy {
    /// Lesson topics or question words found in lesson content
    Keyword,
    /// Whole question as a word-bounded phrase in lesson content
    Phrase,
    /// Best TF-IDF cosine match among course lines
    TfIdf,
    /// Embedded chunks as context for a language model
    Vector,
    /// Direct language model completion
    Llm,
}

impl RetrievalStrategy {
    pub const ALL: [RetrievalStrategy; 5] = [
        RetrievalStrategy::Keyword,
        RetrievalStrategy::Phrase,
        RetrievalStrategy::TfIdf,
        RetrievalStrategy::Vector,
        RetrievalStrategy::Llm,
    ];

    /// Whether answering calls a hosted model.
    pub fn uses_network(self) -> bool {
        matches!(self, RetrievalStrategy::Vector | RetrievalStrategy::Llm)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RetrievalStrategy::Keyword => "keyword",
            RetrievalStrategy::Phrase => "phrase",
            RetrievalStrategy::TfIdf => "tfidf",
            RetrievalStrategy::Vector => "vector",
            RetrievalStrategy::Llm => "llm",
        }
    }
}

impl fmt::Display for RetrievalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetrievalStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyword" | "substring" => Ok(RetrievalStrategy::Keyword),
            "phrase" => Ok(RetrievalStrategy::Phrase),
            "tfidf" | "tf-idf" => Ok(RetrievalStrategy::TfIdf),
            "vector" | "embedding" => Ok(RetrievalStrategy::Vector),
            "llm" | "completion" => Ok(RetrievalStrategy::Llm),
            other => Err(format!(
                "unknown strategy '{other}', expected one of: keyword, phrase, tfidf, vector, llm"
            )),
        }
    }
}

/// Where part of an answer came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSource {
    pub label: String,
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// The assistant's reply to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub strategy: RetrievalStrategy,
    /// False when the reply is a fallback message
    pub matched: bool,
    #[serde(default)]
    pub sources: Vec<AnswerSource>,
}

impl Answer {
    pub fn matched(strategy: RetrievalStrategy, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strategy,
            matched: true,
            sources: Vec::new(),
        }
    }

    pub fn fallback(strategy: RetrievalStrategy, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strategy,
            matched: false,
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<AnswerSource>) -> Self {
        self.sources = sources;
        self
    }
}
