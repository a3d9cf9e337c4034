//! # Integrity Verifier
//!
//! The single verification operation. Ordering matters: the cheap pointer
//! comparison runs before any network I/O, and a confirmed pointer mismatch
//! is reported as such rather than as a downstream hash failure.
//!
//! ## Failure Mapping
//!
//! `verify` returns a [`VerificationResult`] for every input and never
//! propagates an error. Content-store errors, deadline expiry, caller
//! cancellation and panics raised inside the content store all become
//! [`VerificationOutcome::ContentUnavailable`] with the underlying message
//! kept in `detail`. No retries happen here.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use landreg_core::{canonical_digest_text, digests_match, ContentId, Sha256Digest};

use crate::abort::Abort;
use crate::outcome::{VerificationOutcome, VerificationResult, CANCELLED, LEDGER_RECORD_MISSING};
use crate::ports::ContentStore;
use crate::subject::VerificationSubject;

/// Stateless verifier over a content store.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct IntegrityVerifier {
    content: Arc<dyn ContentStore>,
}

impl std::fmt::Debug for IntegrityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrityVerifier").finish_non_exhaustive()
    }
}

impl IntegrityVerifier {
    /// Create a verifier that retrieves content from `content`.
    pub fn new(content: Arc<dyn ContentStore>) -> Self {
        Self { content }
    }

    /// Verify a subject against the ledger's pointer and digest.
    pub async fn verify(&self, subject: &VerificationSubject, abort: &Abort) -> VerificationResult {
        let key = subject.record_key.clone();
        tracing::debug!(
            record_key = %key,
            content_id = %subject.authoritative_content_id,
            "verifying document integrity"
        );

        let result = if subject.ledger_record_missing() {
            VerificationResult::content_unavailable(key, LEDGER_RECORD_MISSING)
        } else if subject.declared_content_id != subject.authoritative_content_id {
            VerificationResult::identifier_mismatch(
                key,
                format!(
                    "record store points at {:?} but the ledger records {:?}",
                    subject.declared_content_id.as_str(),
                    subject.authoritative_content_id.as_str()
                ),
            )
        } else {
            match self.retrieve(&subject.authoritative_content_id, abort).await {
                Err(detail) => VerificationResult::content_unavailable(key, detail),
                Ok(bytes) => {
                    let computed = Sha256Digest::of(&bytes);
                    if digests_match(&computed, &subject.authoritative_digest) {
                        VerificationResult::authentic(key, computed)
                    } else {
                        let detail = format!(
                            "computed sha256 {} over {} bytes, ledger records {}",
                            computed,
                            bytes.len(),
                            canonical_digest_text(&subject.authoritative_digest)
                        );
                        VerificationResult::hash_mismatch(key, computed, detail)
                    }
                }
            }
        };

        match result.outcome {
            VerificationOutcome::Authentic => {
                tracing::info!(record_key = %result.record_key, "document is authentic");
            }
            outcome => {
                tracing::warn!(
                    record_key = %result.record_key,
                    %outcome,
                    detail = %result.detail,
                    "document failed verification"
                );
            }
        }
        result
    }

    /// Fetch bytes for `id`, honoring cancellation and the optional deadline.
    ///
    /// Errors are returned as the detail text of the eventual result.
    async fn retrieve(&self, id: &ContentId, abort: &Abort) -> Result<Vec<u8>, String> {
        let guarded = async {
            match AssertUnwindSafe(self.content.fetch_bytes(id)).catch_unwind().await {
                Ok(Ok(bytes)) => Ok(bytes),
                Ok(Err(e)) => Err(e.to_string()),
                Err(panic) => Err(format!("content store panicked: {}", panic_message(panic.as_ref()))),
            }
        };

        let bounded = async {
            match abort.limit() {
                Some(limit) => tokio::time::timeout(limit, guarded)
                    .await
                    .unwrap_or_else(|_| Err(format!("timeout: no content for {id} within {limit:?}"))),
                None => guarded.await,
            }
        };

        tokio::select! {
            biased;
            _ = abort.token().cancelled() => Err(CANCELLED.to_string()),
            fetched = bounded => fetched,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
