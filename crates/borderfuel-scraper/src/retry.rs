//! Retry with randomized back-off for page fetches.
//!
//! Every failed HTTP attempt (network error, non-2xx status, challenge page)
//! is worth another try after a pause. Malformed input such as an
//! unparseable URL is returned immediately.

use std::future::Future;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` for errors that may clear up on a later attempt.
///
/// **Retriable:** [`ScraperError::Http`], [`ScraperError::UnexpectedStatus`],
/// [`ScraperError::BotChallenge`].
///
/// **Not retriable:** [`ScraperError::InvalidUrl`],
/// [`ScraperError::Deserialize`].
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(_)
        | ScraperError::UnexpectedStatus { .. }
        | ScraperError::BotChallenge { .. } => true,
        ScraperError::InvalidUrl { .. } | ScraperError::Deserialize { .. } => false,
    }
}

/// Picks a delay uniformly from `range`; a degenerate range yields its start.
pub(crate) fn jittered_ms(range: &RangeInclusive<u64>) -> u64 {
    if range.is_empty() || range.start() == range.end() {
        return *range.start();
    }
    rand::random_range(range.clone())
}

/// Runs `operation` up to `max_attempts` times in total.
///
/// Between attempts the task sleeps for a random duration drawn from
/// `backoff_ms`. The last error is returned once attempts are exhausted;
/// non-retriable errors are returned straight away.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_attempts: u32,
    backoff_ms: &RangeInclusive<u64>,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                let delay_ms = jittered_ms(backoff_ms);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms,
                    error = %err,
                    "fetch attempt failed, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
        }
    }
}
