//! Backoff for JSON-RPC requests.
//!
//! A request is repeated only when the node could not be reached or did not
//! answer in time. Anything the node actually said (an HTTP status, a
//! JSON-RPC error object, a revert) is returned on the first attempt.

use std::future::Future;
use std::time::Duration;

/// First backoff step; each later step doubles it.
const BACKOFF_STEP: Duration = Duration::from_millis(200);

/// Whether `err` means the node never produced a response.
fn unreachable(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

/// Delay before retry number `retry` (zero-based).
fn backoff(retry: u32) -> Duration {
    BACKOFF_STEP.saturating_mul(1u32 << retry.min(16))
}

/// Post a request for `method`, repeating up to `max_retries` times while the
/// node is unreachable.
pub(crate) async fn send_with_backoff<F, Fut>(
    method: &str,
    max_retries: u32,
    send: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut retry = 0;
    loop {
        match send().await {
            Err(err) if unreachable(&err) && retry < max_retries => {
                let delay = backoff(retry);
                retry += 1;
                tracing::warn!(
                    method,
                    retry,
                    max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "ledger node unreachable, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            result => return result,
        }
    }
}
