//! # Batch Audit
//!
//! Verifies many parcels for registrar review. Each verification is
//! independent, so they run concurrently up to a caller-chosen bound.
//! Entries come back in the order the keys were given.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use landreg_core::RecordKey;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::abort::Abort;
use crate::context::RegistryContext;
use crate::outcome::{VerificationOutcome, VerificationResult};

/// Default number of verifications in flight at once.
const DEFAULT_CONCURRENCY: usize = 4;

/// Tuning for [`audit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditOptions {
    /// Maximum concurrent verifications. Values below one are treated as one.
    pub concurrency: usize,
    /// Deadline applied to each record's content retrieval.
    pub per_record_timeout: Option<Duration>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            per_record_timeout: None,
        }
    }
}

/// Result for one audited parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditEntry {
    /// A subject was assembled and verified.
    Verified(VerificationResult),
    /// The ledger or record store could not produce a subject.
    LookupFailed {
        /// Parcel that failed lookup.
        record_key: RecordKey,
        /// Why.
        error: String,
    },
}

impl AuditEntry {
    /// The parcel this entry is about.
    pub fn record_key(&self) -> &RecordKey {
        match self {
            Self::Verified(r) => &r.record_key,
            Self::LookupFailed { record_key, .. } => record_key,
        }
    }

    /// The verification outcome, if a verification ran.
    pub fn outcome(&self) -> Option<VerificationOutcome> {
        match self {
            Self::Verified(r) => Some(r.outcome),
            Self::LookupFailed { .. } => None,
        }
    }
}

/// Per-outcome counts over an audit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub total: usize,
    pub authentic: usize,
    pub identifier_mismatch: usize,
    pub content_unavailable: usize,
    pub hash_mismatch: usize,
    pub lookup_failed: usize,
}

impl AuditSummary {
    fn tally(entries: &[AuditEntry]) -> Self {
        let mut s = Self {
            total: entries.len(),
            ..Self::default()
        };
        for e in entries {
            match e.outcome() {
                Some(VerificationOutcome::Authentic) => s.authentic += 1,
                Some(VerificationOutcome::IdentifierMismatch) => s.identifier_mismatch += 1,
                Some(VerificationOutcome::ContentUnavailable) => s.content_unavailable += 1,
                Some(VerificationOutcome::HashMismatch) => s.hash_mismatch += 1,
                None => s.lookup_failed += 1,
            }
        }
        s
    }

    /// True when every audited parcel verified as authentic.
    pub fn all_authentic(&self) -> bool {
        self.authentic == self.total
    }
}

/// Outcome of a batch audit.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<AuditEntry>,
    pub summary: AuditSummary,
}

/// Verify every key in `keys` with bounded concurrency.
///
/// Cancelling `cancel` aborts in-flight retrievals; affected entries report
/// `CONTENT_UNAVAILABLE` ("cancelled") or a cancelled lookup.
pub async fn audit(
    ctx: &RegistryContext,
    keys: &[RecordKey],
    options: &AuditOptions,
    cancel: &CancellationToken,
) -> AuditReport {
    let permits = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, key) in keys.iter().cloned().enumerate() {
        let ctx = ctx.clone();
        let permits = permits.clone();
        let abort = Abort::with_token(cancel.child_token()).with_deadline(options.per_record_timeout);
        tasks.spawn(async move {
            // The semaphore is never closed, so acquisition only fails if it is dropped.
            let _permit = permits.acquire_owned().await.ok();
            let entry = match AssertUnwindSafe(ctx.verify_record(&key, &abort)).catch_unwind().await {
                Ok(Ok(result)) => AuditEntry::Verified(result),
                Ok(Err(e)) => AuditEntry::LookupFailed {
                    record_key: key,
                    error: e.to_string(),
                },
                Err(_) => AuditEntry::LookupFailed {
                    record_key: key,
                    error: "verification task panicked".into(),
                },
            };
            (index, entry)
        });
    }

    let mut slots: Vec<Option<AuditEntry>> = vec![None; keys.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, entry)) => slots[index] = Some(entry),
            Err(e) => tracing::error!(error = %e, "audit task failed to join"),
        }
    }

    let entries: Vec<AuditEntry> = slots
        .into_iter()
        .zip(keys)
        .map(|(slot, key)| {
            slot.unwrap_or_else(|| AuditEntry::LookupFailed {
                record_key: key.clone(),
                error: "verification task did not complete".into(),
            })
        })
        .collect();
    let summary = AuditSummary::tally(&entries);

    tracing::info!(
        total = summary.total,
        authentic = summary.authentic,
        identifier_mismatch = summary.identifier_mismatch,
        content_unavailable = summary.content_unavailable,
        hash_mismatch = summary.hash_mismatch,
        lookup_failed = summary.lookup_failed,
        "audit complete"
    );

    AuditReport {
        generated_at: Utc::now(),
        entries,
        summary,
    }
}
