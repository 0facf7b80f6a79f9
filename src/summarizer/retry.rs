// src/summarizer/retry.rs
// Explicit retry policy: bounded attempts, exponential backoff

use super::types::SummarizeError;
use std::time::Duration;
use tokio::time::sleep;

/// Retry policy for summarization calls. The schedule is a pure function of
/// the attempt number so tests never have to sleep.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u8,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u8, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Whether `error` deserves another attempt after `attempt` (0-based)
    /// failed tries. Unreachable endpoints get the full attempt budget;
    /// timeouts get exactly one retry; everything else none.
    pub fn should_retry(&self, attempt: u8, error: &SummarizeError) -> bool {
        match error {
            SummarizeError::EndpointUnavailable(_) => attempt + 1 < self.max_attempts,
            SummarizeError::Timeout => attempt == 0,
            _ => false,
        }
    }

    /// Delay before retry number `attempt + 1`: base * 2^attempt.
    pub fn delay_for(&self, attempt: u8) -> Duration {
        let multiplier = 2u32.saturating_pow(attempt as u32);
        self.base_delay.saturating_mul(multiplier)
    }

    pub async fn wait_before_retry(&self, attempt: u8) {
        let delay = self.delay_for(attempt);
        tracing::info!(
            "Retrying in {:.1}s (attempt {})",
            delay.as_secs_f32(),
            attempt + 2
        );
        sleep(delay).await;
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_ATTEMPTS, Duration::from_secs(2))
    }
}
