//! Client-side rate limiting for hosted model requests

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

const FALLBACK_REQUESTS_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(60) {
    Some(n) => n,
    None => unreachable!(),
};

/// Shared request limiter for completion and embedding calls
#[derive(Clone)]
pub struct ApiRateLimiter {
    limiter: Arc<GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    requests_per_minute: u32,
}

impl ApiRateLimiter {
    /// Create a new rate limiter
    ///
    /// A zero rate falls back to 60 requests per minute.
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = NonZeroU32::new(requests_per_minute).unwrap_or(FALLBACK_REQUESTS_PER_MINUTE);
        let limiter = Arc::new(GovRateLimiter::direct(Quota::per_minute(rpm)));

        Self {
            limiter,
            requests_per_minute: rpm.get(),
        }
    }

    /// Whether a request may go out right now
    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }

    /// Wait until the quota allows another request
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }
}
