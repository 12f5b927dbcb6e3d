//! OpenAI embedding provider adapter.
//!
//! Embeds lesson chunks and questions via the `/embeddings` endpoint of
//! any OpenAI-compatible API (e.g., Azure OpenAI, local servers).

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::EmbeddingsConfig;
use crate::domain::ports::embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};
use crate::infrastructure::openai::types::{EmbeddingsRequest, EmbeddingsResponse};
use crate::infrastructure::openai::{
    endpoint, error_from_response, resolve_api_key, ApiRateLimiter, OpenAiApiError, RetryPolicy,
};

/// OpenAI embedding provider.
pub struct OpenAiEmbeddingProvider {
    config: EmbeddingsConfig,
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
    retry: RetryPolicy,
    limiter: ApiRateLimiter,
}

impl OpenAiEmbeddingProvider {
    /// `fallback_base_url` and `api_key` come from the chat model settings
    /// and apply when the embeddings section does not override them.
    pub fn new(
        config: EmbeddingsConfig,
        fallback_base_url: &str,
        api_key: Option<String>,
        retry: RetryPolicy,
        limiter: ApiRateLimiter,
    ) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::Embedding(format!("failed to build HTTP client: {e}")))?;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| fallback_base_url.to_string());

        Ok(Self {
            config,
            base_url,
            api_key,
            client,
            retry,
            limiter,
        })
    }

    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn request_once(
        &self,
        url: &str,
        api_key: &str,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, OpenAiApiError> {
        self.limiter.acquire().await;

        let body = EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
        };
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| OpenAiApiError::InvalidResponse(e.to_string()))?;

        if result.data.len() != texts.len() {
            return Err(OpenAiApiError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                result.data.len()
            )));
        }

        // Sort by index to maintain input order
        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    async fn call_embeddings_api(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        let api_key = resolve_api_key(self.api_key.as_deref())?;
        let url = endpoint(&self.base_url, "embeddings");

        self.retry
            .execute(|| self.request_once(&url, &api_key, texts))
            .await
            .map_err(|e| DomainError::Embedding(e.to_string()))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        let results = self.call_embeddings_api(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Embedding("empty embedding response".to_string()))
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> DomainResult<Vec<EmbeddingOutput>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let batch_size = self.config.max_batch_size.max(1);
        let mut all_outputs = Vec::with_capacity(inputs.len());

        for batch in inputs.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|i| i.text.clone()).collect();
            let vectors = self.call_embeddings_api(&texts).await?;

            all_outputs.extend(batch.iter().zip(vectors).map(|(input, vector)| EmbeddingOutput {
                id: input.id.clone(),
                vector,
            }));
        }

        tracing::debug!(count = all_outputs.len(), model = %self.config.model, "embedded batch");
        Ok(all_outputs)
    }
}
