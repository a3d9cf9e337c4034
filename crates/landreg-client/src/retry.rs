//! Retry with exponential backoff for ledger and record-store reads.
//!
//! Only transport failures (connection refused, reset, request timeout)
//! trigger a retry. Status codes are inspected by the caller. Content
//! retrieval does not go through here: the verifier reports a failed fetch
//! as-is and retry is the caller's decision.

use std::time::Duration;

/// Maximum number of retry attempts after the initial request.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries (200ms, 400ms, 800ms).
const BASE_DELAY_MS: u64 = 200;

/// Send a request, retrying transport errors up to `MAX_RETRIES` times.
pub(crate) async fn retry_send<F, Fut>(
    endpoint: &str,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..MAX_RETRIES {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                // URLs may carry an API key.
                let e = e.without_url();
                let delay = Duration::from_millis(BASE_DELAY_MS << attempt);
                tracing::warn!(
                    endpoint,
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    error = %e,
                    "request failed, retrying in {delay:?}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    f().await
}
