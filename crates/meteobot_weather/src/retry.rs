//! Generic retry wrapper with exponential backoff.

use std::future::Future;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::warn;

/// Run `op` up to `max_attempts` additional times on transient failure.
///
/// Backoff doubles from `initial_backoff_ms` with jitter, capped at 30
/// seconds per wait. `is_transient` decides which errors are worth
/// retrying; a permanent error is returned immediately.
///
/// # Examples
///
/// ```
/// use meteobot_weather::retry::with_retry;
///
/// # tokio_test::block_on(async {
/// let result: Result<u32, &str> =
///     with_retry(2, 1, |_: &&str| true, || async { Ok(42) }).await;
/// assert_eq!(result, Ok(42));
/// # });
/// ```
pub async fn with_retry<T, E, F, Fut, C>(
    max_attempts: usize,
    initial_backoff_ms: u64,
    is_transient: C,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> bool,
{
    let strategy = ExponentialBackoff::from_millis(initial_backoff_ms)
        .factor(2)
        .max_delay(Duration::from_secs(30))
        .map(jitter)
        .take(max_attempts);

    Retry::spawn(strategy, || {
        let fut = op();
        let is_transient = &is_transient;
        async move {
            match fut.await {
                Ok(value) => Ok(value),
                Err(e) if is_transient(&e) => {
                    warn!(error = %e, "Transient failure, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        }
    })
    .await
}
