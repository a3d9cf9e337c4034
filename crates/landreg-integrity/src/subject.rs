//! The record under test and the ledger's view of it.

use landreg_core::{ContentId, RecordKey};
use serde::{Deserialize, Serialize};

/// What the ledger says about a parcel's document.
///
/// Written once per record version by the registry contract and treated as
/// the source of truth. The digest is kept in whatever textual form the
/// ledger stored; it is canonicalized only at comparison time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Content-addressed pointer to the registered document.
    pub content_id: ContentId,
    /// Expected SHA-256 digest of the document bytes.
    pub digest: String,
}

/// Everything a single verification needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSubject {
    /// Parcel identifier.
    pub record_key: RecordKey,
    /// Pointer held by the off-chain record store. Cached, not trusted.
    pub declared_content_id: ContentId,
    /// Pointer recorded on the ledger.
    pub authoritative_content_id: ContentId,
    /// Digest recorded on the ledger.
    pub authoritative_digest: String,
}

impl VerificationSubject {
    /// Combine the off-chain pointer with the ledger record.
    pub fn new(record_key: RecordKey, declared_content_id: ContentId, ledger: LedgerRecord) -> Self {
        Self {
            record_key,
            declared_content_id,
            authoritative_content_id: ledger.content_id,
            authoritative_digest: ledger.digest,
        }
    }

    /// True when the ledger side is incomplete (empty pointer or digest).
    pub fn ledger_record_missing(&self) -> bool {
        self.authoritative_content_id.is_empty() || self.authoritative_digest.trim().is_empty()
    }
}
