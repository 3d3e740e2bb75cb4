use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{error, info, warn};

/// Fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Policy used when establishing the bootstrap database connection.
    pub const fn bootstrap() -> Self {
        Self::new(3, Duration::from_secs(3))
    }
}

/// Run `op` until it succeeds or the policy's attempts are used up.
///
/// Returns the error of the final attempt.
pub async fn retry_fixed<T, E, F, Fut>(policy: RetryPolicy, what: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        info!(attempt, max_attempts, "{what}");
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                warn!(
                    attempt,
                    delay_ms = policy.delay.as_millis() as u64,
                    error = %e,
                    "{what} failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!(attempt, error = %e, "{what} failed, giving up");
                return Err(e);
            }
        }
    }
}
