//! # Collaborator Interfaces
//!
//! The verifier consumes three external systems. Each is a trait so that a
//! live HTTP adapter, an in-memory stand-in, or a test double can be wired
//! in without touching verification logic.
//!
//! All traits are object-safe and `Send + Sync`; they are shared across
//! tasks behind an `Arc`.

use async_trait::async_trait;
use landreg_core::{ContentId, RecordKey};
use thiserror::Error;

use crate::subject::LedgerRecord;

/// Failure reading the authoritative record from the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The ledger has no record for this key.
    #[error("record {0} is not registered on the ledger")]
    NotFound(RecordKey),

    /// The ledger node could not be reached or returned an error.
    #[error("ledger transport error: {0}")]
    Transport(String),

    /// The ledger answered with something that could not be decoded.
    #[error("malformed ledger response: {0}")]
    Malformed(String),
}

/// Failure resolving a content identifier to bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The content network has no bytes for this identifier.
    #[error("content {0} could not be resolved")]
    NotFound(ContentId),

    /// The gateway answered with a non-success status.
    #[error("content gateway returned {status} for {content_id}: {body}")]
    Status {
        /// Requested identifier.
        content_id: ContentId,
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The transfer did not complete in time.
    #[error("timeout fetching {content_id}: {message}")]
    Timeout {
        /// Requested identifier.
        content_id: ContentId,
        /// Underlying error text.
        message: String,
    },

    /// Connection-level failure.
    #[error("transport error fetching {content_id}: {message}")]
    Transport {
        /// Requested identifier.
        content_id: ContentId,
        /// Underlying error text.
        message: String,
    },
}

/// Failure reading the off-chain copy of a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordStoreError {
    /// No off-chain record exists for this key.
    #[error("record {0} not found in the record store")]
    NotFound(RecordKey),

    /// The record store could not be reached or returned an error.
    #[error("record store transport error: {0}")]
    Transport(String),

    /// The record exists but lacks a usable content pointer.
    #[error("malformed record store document: {0}")]
    Malformed(String),
}

/// Source of truth for a record's content pointer and digest.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Read the authoritative pointer and digest for `key`.
    async fn authoritative(&self, key: &RecordKey) -> Result<LedgerRecord, LedgerError>;
}

/// Content-addressed retrieval network.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the exact bytes stored under `id`.
    async fn fetch_bytes(&self, id: &ContentId) -> Result<Vec<u8>, ContentError>;
}

/// Fast-read, off-chain copy of parcel records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The content pointer the off-chain copy holds for `key`.
    async fn declared_content_id(&self, key: &RecordKey) -> Result<ContentId, RecordStoreError>;
}
