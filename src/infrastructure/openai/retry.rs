//! Retry policy with exponential backoff for hosted model requests.

use backoff::future::retry_notify;
use backoff::{Error as BackoffError, ExponentialBackoff, ExponentialBackoffBuilder};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::errors::OpenAiApiError;
use crate::domain::models::RetryConfig;

/// Retry policy with exponential backoff
///
/// Retries on 429, 5xx, timeouts and connection errors. Client errors
/// (400, 401, 403, 404) fail immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries before giving up
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms.max(initial_backoff_ms)),
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            config.initial_backoff_ms,
            config.max_backoff_ms,
        )
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_backoff)
            .with_max_interval(self.max_backoff)
            .with_multiplier(2.0)
            .with_max_elapsed_time(None)
            .build()
    }

    /// Execute an operation, retrying transient failures
    ///
    /// The operation runs at most `max_retries + 1` times.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, OpenAiApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, OpenAiApiError>>,
    {
        let max_retries = self.max_retries;
        let mut attempt: u32 = 0;

        let result = retry_notify(
            self.backoff(),
            || {
                attempt += 1;
                let current = attempt;
                let fut = operation();
                async move {
                    match fut.await {
                        Ok(value) => Ok(value),
                        Err(err) if err.is_transient() && current <= max_retries => {
                            Err(BackoffError::transient(err))
                        }
                        Err(err) => {
                            debug!(attempt = current, error = %err, "not retrying");
                            Err(BackoffError::permanent(err))
                        }
                    }
                }
            },
            |err: OpenAiApiError, wait: Duration| {
                warn!(error = %err, retry_in = ?wait, "transient API error, retrying");
            },
        )
        .await;

        if result.is_ok() && attempt > 1 {
            debug!(attempts = attempt, "operation succeeded after retries");
        }
        result
    }
}
