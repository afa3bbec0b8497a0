use std::{future::Future, time::Duration};

use reqwest::{Client, Request, Response, StatusCode};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_backoff: Duration,
    per_attempt_timeout: Duration,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("max attempts must be at least 1")]
    ZeroAttempts,
    #[error("per-attempt timeout must be greater than zero")]
    ZeroTimeout,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        base_backoff_ms: u64,
        per_attempt_timeout_ms: u64,
    ) -> Result<Self, PolicyError> {
        if max_attempts == 0 {
            return Err(PolicyError::ZeroAttempts);
        }
        if per_attempt_timeout_ms == 0 {
            return Err(PolicyError::ZeroTimeout);
        }

        Ok(Self {
            max_attempts,
            base_backoff: Duration::from_millis(base_backoff_ms),
            per_attempt_timeout: Duration::from_millis(per_attempt_timeout_ms),
        })
    }

    /// Policy for the Open-Meteo forecast call.
    pub const fn weather() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(1000),
            per_attempt_timeout: Duration::from_millis(10_000),
        }
    }

    /// Typeahead searches: one retry at most, short timeout.
    pub const fn search() -> Self {
        Self {
            max_attempts: 2,
            base_backoff: Duration::from_millis(100),
            per_attempt_timeout: Duration::from_millis(2000),
        }
    }

    /// Browser-side weather call. Single attempt: the server already retries
    /// Open-Meteo, and the timeout has to outlast its worst case.
    pub const fn client_weather() -> Self {
        Self {
            max_attempts: 1,
            base_backoff: Duration::from_millis(500),
            per_attempt_timeout: Duration::from_millis(35_000),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_backoff(&self) -> Duration {
        self.base_backoff
    }

    pub fn per_attempt_timeout(&self) -> Duration {
        self.per_attempt_timeout
    }

    /// Delay slept after failed attempt `attempt` (1-based) before the next one.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_backoff.saturating_mul(factor)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {}ms", .timeout.as_millis())]
    Timeout { timeout: Duration },
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream responded with status {}", .status.as_u16())]
    Upstream { status: StatusCode },
    #[error("request could not be sent: {0}")]
    Request(String),
}

impl FetchError {
    fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Request(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            FetchError::Request(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Runs `attempt_fn` until it yields a response below 500, a non-retryable
/// error, or the policy runs out of attempts. `attempt_fn` receives the
/// 1-based attempt number.
pub async fn retry_with_policy<F, Fut>(
    policy: &RetryPolicy,
    mut attempt_fn: F,
) -> Result<Response, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Response, FetchError>>,
{
    let mut attempt = 1;

    loop {
        let outcome = tokio::time::timeout(policy.per_attempt_timeout, attempt_fn(attempt)).await;

        let failure = match outcome {
            Ok(Ok(response)) if response.status().as_u16() < 500 => {
                if attempt > 1 {
                    info!("Request succeeded on attempt {}", attempt);
                }
                return Ok(response);
            }
            Ok(Ok(response)) => FetchError::Upstream {
                status: response.status(),
            },
            Ok(Err(e)) if !e.is_retryable() => {
                debug!("Non-retryable error: {}", e);
                return Err(e);
            }
            Ok(Err(e)) => e,
            Err(_) => FetchError::Timeout {
                timeout: policy.per_attempt_timeout,
            },
        };

        if attempt >= policy.max_attempts {
            error!("All {} attempts failed, last error: {}", attempt, failure);
            return Err(failure);
        }

        let delay = policy.backoff_for_attempt(attempt);
        warn!(
            "Attempt {} of {} failed: {}, retrying in {:?}",
            attempt, policy.max_attempts, failure, delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

pub async fn fetch_with_policy(
    client: &Client,
    request: Request,
    policy: &RetryPolicy,
) -> Result<Response, FetchError> {
    debug!("{} {}", request.method(), request.url());

    retry_with_policy(policy, |_| {
        let attempt = request.try_clone();
        async move {
            let attempt = attempt.ok_or_else(|| {
                FetchError::Request("request body cannot be replayed".to_string())
            })?;
            Ok(client.execute(attempt).await?)
        }
    })
    .await
}
