//! # Verification Outcomes
//!
//! Exactly four outcomes. There is no "unknown error" state: anything that
//! goes wrong after the subject has been assembled lands in one of these.

use landreg_core::{RecordKey, Sha256Digest};
use serde::{Deserialize, Serialize};

/// Detail recorded when the ledger side of a subject is incomplete.
pub const LEDGER_RECORD_MISSING: &str = "ledger record missing";

/// Detail recorded when the caller cancelled an in-flight retrieval.
pub const CANCELLED: &str = "cancelled";

/// Classification of a single verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationOutcome {
    /// Pointer and content digest both match the ledger.
    Authentic,
    /// The off-chain pointer disagrees with the ledger. Retrieval was skipped.
    IdentifierMismatch,
    /// No bytes could be obtained for the ledger's pointer.
    ContentUnavailable,
    /// Bytes were retrieved but their digest differs from the ledger's.
    HashMismatch,
}

impl VerificationOutcome {
    /// Wire/display name of the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentic => "AUTHENTIC",
            Self::IdentifierMismatch => "IDENTIFIER_MISMATCH",
            Self::ContentUnavailable => "CONTENT_UNAVAILABLE",
            Self::HashMismatch => "HASH_MISMATCH",
        }
    }
}

impl std::fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one verification. Built fresh per call and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// The parcel that was verified.
    pub record_key: RecordKey,
    /// What the verifier concluded.
    pub outcome: VerificationOutcome,
    /// Digest of the retrieved bytes; present only when retrieval succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_digest: Option<Sha256Digest>,
    /// Human-readable explanation. Not meant to be parsed.
    pub detail: String,
}

impl VerificationResult {
    pub(crate) fn authentic(record_key: RecordKey, computed: Sha256Digest) -> Self {
        Self {
            record_key,
            outcome: VerificationOutcome::Authentic,
            computed_digest: Some(computed),
            detail: "content pointer and digest match the ledger".into(),
        }
    }

    pub(crate) fn identifier_mismatch(record_key: RecordKey, detail: String) -> Self {
        Self {
            record_key,
            outcome: VerificationOutcome::IdentifierMismatch,
            computed_digest: None,
            detail,
        }
    }

    pub(crate) fn content_unavailable(record_key: RecordKey, detail: impl Into<String>) -> Self {
        Self {
            record_key,
            outcome: VerificationOutcome::ContentUnavailable,
            computed_digest: None,
            detail: detail.into(),
        }
    }

    pub(crate) fn hash_mismatch(record_key: RecordKey, computed: Sha256Digest, detail: String) -> Self {
        Self {
            record_key,
            outcome: VerificationOutcome::HashMismatch,
            computed_digest: Some(computed),
            detail,
        }
    }

    /// True only for [`VerificationOutcome::Authentic`].
    pub fn is_authentic(&self) -> bool {
        self.outcome == VerificationOutcome::Authentic
    }

    /// True when retrieval was abandoned because the caller cancelled.
    pub fn was_cancelled(&self) -> bool {
        self.outcome == VerificationOutcome::ContentUnavailable && self.detail == CANCELLED
    }

    /// True when the ledger record had no pointer or digest, so nothing was fetched.
    pub fn was_precondition_failure(&self) -> bool {
        self.outcome == VerificationOutcome::ContentUnavailable && self.detail == LEDGER_RECORD_MISSING
    }
}
