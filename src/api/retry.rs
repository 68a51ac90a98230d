//! Retry with exponential backoff on rate limits and network failures.

use super::transport::{BackendRequest, Transport, TransportResponse};
use crate::config::BackendConfig;
use crate::error::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts including the first one. Zero behaves like one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on every further retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Build the policy described by the backend configuration.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.max_retries, config.backoff_base())
    }

    /// Delay to wait after the given failed attempt (1-based): `2^(attempt-1)`
    /// base delays.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Transport wrapper that retries 429 responses and network errors.
///
/// Every other response, including 5xx, is handed back on first sight.
#[derive(Clone)]
pub struct RetryingClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RetryingClient {
    /// Wrap a transport with the given policy.
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// The active retry policy.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Perform the GET, retrying per policy.
    pub async fn fetch(&self, request: &BackendRequest) -> Result<TransportResponse> {
        let max_attempts = self.policy.attempts();
        let mut last_failure = String::new();

        for attempt in 1..=max_attempts {
            debug!(url = %request.url, attempt, "GET");

            let outcome = match self.transport.get(request).await {
                Ok(response) if response.is_rate_limited() => Err(Error::RateLimited),
                other => other,
            };
            let reason = match outcome {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() => err.to_string(),
                Err(err) => return Err(err),
            };

            if attempt < max_attempts {
                let delay = self.policy.delay_for(attempt);
                warn!(
                    url = %request.url,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "{reason}, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            last_failure = reason;
        }

        Err(Error::RetryExhausted {
            attempts: max_attempts,
            last: last_failure,
        })
    }
}
