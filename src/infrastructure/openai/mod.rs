//! Shared plumbing for OpenAI-compatible HTTP APIs: error classification,
//! retry with backoff, rate limiting and wire types.

pub mod errors;
pub mod rate_limiter;
pub mod retry;
pub mod types;

pub use errors::OpenAiApiError;
pub use rate_limiter::ApiRateLimiter;
pub use retry::RetryPolicy;

use reqwest::Response;

use crate::domain::errors::{DomainError, DomainResult};

/// Resolve the API key from configuration, falling back to `OPENAI_API_KEY`.
pub fn resolve_api_key(configured: Option<&str>) -> DomainResult<String> {
    configured
        .map(str::to_string)
        .filter(|k| !k.trim().is_empty())
        .or_else(|| std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()))
        .ok_or_else(|| {
            DomainError::MissingApiKey(
                "set OPENAI_API_KEY or llm.api_key in the configuration".to_string(),
            )
        })
}

/// Turn a non-success response into a classified error.
pub async fn error_from_response(response: Response) -> OpenAiApiError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read response body".to_string());
    OpenAiApiError::from_status(status, body)
}

/// Join a base URL and an endpoint path without doubling slashes.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        assert_eq!(
            endpoint("https://api.openai.com/v1/", "/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(endpoint("http://localhost:8080", "embeddings"), "http://localhost:8080/embeddings");
    }

    #[test]
    fn test_configured_key_wins() {
        assert_eq!(resolve_api_key(Some("sk-test")).unwrap(), "sk-test");
    }

    #[test]
    fn test_missing_key() {
        temp_env::with_var_unset("OPENAI_API_KEY", || {
            assert!(matches!(
                resolve_api_key(None),
                Err(DomainError::MissingApiKey(_))
            ));
            assert!(resolve_api_key(Some("  ")).is_err());
        });
    }
}
