//! Retry logic for rate-limited calls.
//!
//! # Responsibilities
//! - Decide whether a failure is a rate-limit signal
//! - Re-run the whole operation with exponential backoff
//! - Stop at the retry ceiling and surface `RateLimitExceeded`
//!
//! # Design Decisions
//! - Only rate-limit failures retry; everything else propagates at once
//! - Sleeping goes through [`Sleeper`] so tests can observe delays

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;

/// Suspends the current task. Not cancellable mid-wait.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeping via the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry ceiling and backoff base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    /// Delay after a rate-limited `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryConfig::default().into()
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.base_delay_ms,
        }
    }
}

/// Run `operation` until it succeeds, fails with a non-rate-limit error, or
/// the policy's attempts are used up. The closure receives the 1-based
/// attempt number.
pub async fn retry_on_rate_limit<T, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    label: &str,
    mut operation: F,
) -> BlockchainResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = BlockchainResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_rate_limit() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    operation = %label,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Rate limited, backing off before retry"
                );
                sleeper.sleep(delay).await;
                attempt += 1;
            }
            Err(e) if e.is_rate_limit() => {
                return Err(BlockchainError::RateLimitExceeded {
                    attempts: max_attempts,
                    message: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }
}
