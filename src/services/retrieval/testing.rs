//! Test doubles for retrieval ports.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::errors::DomainResult;
use crate::domain::ports::{
    CompletionClient, CompletionRequest, EmbeddingInput, EmbeddingOutput, EmbeddingProvider,
};

/// Completion client that returns a fixed reply and records requests
pub struct RecordingCompletion {
    reply: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl RecordingCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionClient for RecordingCompletion {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn complete(&self, request: CompletionRequest) -> DomainResult<String> {
        self.requests.lock().unwrap().push(request);
        Ok(self.reply.clone())
    }
}

/// Embeds text as keyword occurrence counts, one dimension per keyword
pub struct KeywordEmbeddings {
    keywords: Vec<String>,
    calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl KeywordEmbeddings {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .map(|k| lower.matches(k.as_str()).count() as f32)
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbeddings {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn model(&self) -> &str {
        "keyword-counts"
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> DomainResult<Vec<EmbeddingOutput>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(inputs
            .iter()
            .map(|input| EmbeddingOutput {
                id: input.id.clone(),
                vector: self.vectorize(&input.text),
            })
            .collect())
    }
}
