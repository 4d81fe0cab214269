//! Bounded retry with exponential back-off and jitter.
//!
//! Used for image downloads only. Text generation is a single attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::BackendError;

const MAX_DELAY_MS: u64 = 10_000;

/// Runs `operation` up to `max_attempts` times in total, sleeping between
/// failed attempts. Every error is retried; the last one is returned.
///
/// Delay before retry `n` is `backoff_base_ms * 2^(n-1)`, capped at 10 s,
/// with ±25 % jitter. A base of `0` retries immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_attempts: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, BackendError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= max_attempts {
                    return Err(err);
                }
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms,
                    error = %err,
                    "attempt failed, retrying after back-off"
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
