//! OpenAI chat completion adapter.
//!
//! Talks to `/chat/completions` on any OpenAI-compatible endpoint. Every
//! request waits on the shared rate limiter and is retried with backoff on
//! transient failures.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::LlmConfig;
use crate::domain::ports::{CompletionClient, CompletionRequest};
use crate::infrastructure::openai::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::infrastructure::openai::{
    endpoint, error_from_response, resolve_api_key, ApiRateLimiter, OpenAiApiError, RetryPolicy,
};

/// Chat completion client for OpenAI-compatible APIs
pub struct OpenAiChatClient {
    config: LlmConfig,
    client: reqwest::Client,
    retry: RetryPolicy,
    limiter: ApiRateLimiter,
}

impl OpenAiChatClient {
    pub fn new(config: LlmConfig, retry: RetryPolicy, limiter: ApiRateLimiter) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::Llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            retry,
            limiter,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_once(
        &self,
        url: &str,
        api_key: &str,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<String, OpenAiApiError> {
        self.limiter.acquire().await;

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| OpenAiApiError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = parsed.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| OpenAiApiError::InvalidResponse("response contained no choices".to_string()))
    }
}

#[async_trait]
impl CompletionClient for OpenAiChatClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %self.config.model, messages = request.messages.len()))]
    async fn complete(&self, request: CompletionRequest) -> DomainResult<String> {
        let api_key = resolve_api_key(self.config.api_key.as_deref())?;
        let url = endpoint(&self.config.base_url, "chat/completions");

        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            n: 1,
        };

        let text = self
            .retry
            .execute(|| self.send_once(&url, &api_key, &body))
            .await?;

        debug!(chars = text.len(), "completion received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: String) -> OpenAiChatClient {
        let config = LlmConfig {
            api_key: Some("sk-test".to_string()),
            base_url,
            ..LlmConfig::default()
        };
        OpenAiChatClient::new(config, RetryPolicy::new(2, 1, 5), ApiRateLimiter::new(600)).unwrap()
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"  Gradient descent.  "},"finish_reason":"stop"}]}"#)
            .create_async()
            .await;

        let client = client_for(server.url());
        let text = client
            .complete(CompletionRequest::prompt("What is it?").with_max_tokens(100))
            .await
            .unwrap();

        assert_eq!(text, "Gradient descent.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("overloaded")
            .expect(3)
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client
            .complete(CompletionRequest::prompt("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Llm(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_auth_failure_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(server.url());
        assert!(client.complete(CompletionRequest::prompt("hi")).await.is_err());
        mock.assert_async().await;
    }
}
