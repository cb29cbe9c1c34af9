//! Bounded retry with increasing backoff.
//!
//! Only throttling failures are retried; anything else is re-thrown
//! immediately without consuming an attempt. Applied selectively around the
//! calls empirically prone to provider-side throttling, never blanket-wrapped.

use crate::error::DeployError;
use std::future::Future;
use std::time::Duration;

/// Attempt ceiling and backoff base for one retried operation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    /// Delay before attempt N+1 is `base_delay * N`, so waits grow strictly.
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

/// Run `op`, retrying throttled failures up to the policy's attempt ceiling.
///
/// Exhausting the ceiling re-raises the last throttling error.
pub async fn with_retry<T, F, Fut>(
    label: &'static str,
    policy: RetryPolicy,
    mut op: F,
) -> Result<T, DeployError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DeployError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_throttled() && attempt < max_attempts => {
                let delay = policy.base_delay * attempt;
                tracing::warn!(
                    "{} throttled (attempt {}/{}), retrying in {:?}: {}",
                    label,
                    attempt,
                    max_attempts,
                    delay,
                    err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
