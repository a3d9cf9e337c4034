//! Caller-side retry with exponential backoff.
//!
//! The verifier itself never retries. Callers that want to ride out a flaky
//! content gateway wrap [`RegistryContext::verify_record`] in a
//! [`RetryPolicy`]. Only `CONTENT_UNAVAILABLE` results are retried, and
//! never when the caller cancelled: a pointer or digest mismatch is a
//! verdict, not a transient failure.

use std::time::Duration;

use landreg_core::RecordKey;

use crate::abort::Abort;
use crate::context::{LookupError, RegistryContext};
use crate::outcome::{VerificationOutcome, VerificationResult};

/// Default number of retries after the initial attempt.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay (doubles each attempt: 200ms, 400ms, 800ms).
const DEFAULT_BASE_DELAY_MS: u64 = 200;

/// How many times, and how patiently, to retry unavailable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each one after.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff before retry number `attempt` (zero-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Whether a result is worth another attempt.
    ///
    /// A missing ledger record is a precondition failure, not a transient one.
    pub fn is_retryable(result: &VerificationResult) -> bool {
        result.outcome == VerificationOutcome::ContentUnavailable
            && !result.was_cancelled()
            && !result.was_precondition_failure()
    }

    /// Verify `key`, retrying unavailable content per this policy.
    ///
    /// Returns the last attempt's result. Lookup errors are returned as-is
    /// without retrying.
    pub async fn verify_record(
        &self,
        ctx: &RegistryContext,
        key: &RecordKey,
        abort: &Abort,
    ) -> Result<VerificationResult, LookupError> {
        let mut attempt = 0;
        loop {
            let result = ctx.verify_record(key, abort).await?;
            if !Self::is_retryable(&result) || attempt >= self.max_retries || abort.is_cancelled() {
                return Ok(result);
            }

            let delay = self.delay_for(attempt);
            tracing::warn!(
                record_key = %key,
                attempt = attempt + 1,
                max_retries = self.max_retries,
                detail = %result.detail,
                "content unavailable, retrying in {delay:?}"
            );
            tokio::select! {
                biased;
                _ = abort.token().cancelled() => return Ok(result),
                _ = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}
