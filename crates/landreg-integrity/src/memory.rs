//! In-memory collaborators backed by `DashMap`.
//!
//! Each handle is cheaply cloneable via `Arc`; all clones share the same
//! data, so a test can keep one clone to seed and inspect state while the
//! verifier holds another.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use landreg_core::{ContentId, RecordKey};

use crate::ports::{
    ContentError, ContentStore, LedgerError, LedgerReader, RecordStore, RecordStoreError,
};
use crate::subject::LedgerRecord;

/// Ledger stand-in keyed by parcel.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    records: Arc<DashMap<RecordKey, LedgerRecord>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the authoritative values for `key`.
    pub fn insert(&self, key: RecordKey, record: LedgerRecord) {
        self.records.insert(key, record);
    }
}

#[async_trait]
impl LedgerReader for MemoryLedger {
    async fn authoritative(&self, key: &RecordKey) -> Result<LedgerRecord, LedgerError> {
        self.records
            .get(key)
            .map(|r| r.value().clone())
            .ok_or_else(|| LedgerError::NotFound(key.clone()))
    }
}

/// Off-chain record store stand-in.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<DashMap<RecordKey, ContentId>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: RecordKey, content_id: ContentId) {
        self.records.insert(key, content_id);
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn declared_content_id(&self, key: &RecordKey) -> Result<ContentId, RecordStoreError> {
        self.records
            .get(key)
            .map(|r| r.value().clone())
            .ok_or_else(|| RecordStoreError::NotFound(key.clone()))
    }
}

/// Content network stand-in with a fetch counter and fault injection.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    blobs: Arc<DashMap<ContentId, Vec<u8>>>,
    faults: Arc<DashMap<ContentId, ContentError>>,
    fetches: Arc<AtomicUsize>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `id`.
    pub fn put(&self, id: ContentId, bytes: Vec<u8>) {
        self.blobs.insert(id, bytes);
    }

    /// Make every fetch of `id` fail with `error` until [`clear_fault`](Self::clear_fault).
    pub fn fail_with(&self, id: ContentId, error: ContentError) {
        self.faults.insert(id, error);
    }

    pub fn clear_fault(&self, id: &ContentId) {
        self.faults.remove(id);
    }

    /// Number of `fetch_bytes` calls across all clones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn fetch_bytes(&self, id: &ContentId) -> Result<Vec<u8>, ContentError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(fault) = self.faults.get(id) {
            return Err(fault.value().clone());
        }
        self.blobs
            .get(id)
            .map(|b| b.value().clone())
            .ok_or_else(|| ContentError::NotFound(id.clone()))
    }
}
