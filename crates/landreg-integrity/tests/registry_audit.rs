//! Batch audit over a seeded in-memory registry.

use std::sync::Arc;
use std::time::Duration;

use landreg_core::{ContentId, RecordKey, Sha256Digest};
use landreg_integrity::memory::{MemoryContentStore, MemoryLedger, MemoryRecordStore};
use landreg_integrity::{
    audit, AuditEntry, AuditOptions, ContentError, LedgerRecord, RegistryContext,
    VerificationOutcome,
};
use tokio_util::sync::CancellationToken;

struct Registry {
    ctx: RegistryContext,
    ledger: MemoryLedger,
    records: MemoryRecordStore,
    content: MemoryContentStore,
}

impl Registry {
    fn new() -> Self {
        let ledger = MemoryLedger::new();
        let records = MemoryRecordStore::new();
        let content = MemoryContentStore::new();
        let ctx = RegistryContext::new(
            Arc::new(ledger.clone()),
            Arc::new(records.clone()),
            Arc::new(content.clone()),
        );
        Self {
            ctx,
            ledger,
            records,
            content,
        }
    }

    /// Register a parcel whose document is `document`, with the off-chain
    /// copy pointing at `declared` and the gateway serving `served`.
    fn register(&self, parcel: &str, declared: &str, document: &[u8], served: &[u8]) -> RecordKey {
        let key = RecordKey::new(parcel).unwrap();
        let cid = ContentId::from(format!("Qm{parcel}"));
        self.ledger.insert(
            key.clone(),
            LedgerRecord {
                content_id: cid.clone(),
                digest: Sha256Digest::of(document).to_hex(),
            },
        );
        self.records.insert(key.clone(), ContentId::from(declared));
        self.content.put(cid, served.to_vec());
        key
    }
}

#[tokio::test]
async fn audit_reports_every_outcome_in_input_order() {
    let reg = Registry::new();
    let good = reg.register("p1", "Qmp1", b"deed one", b"deed one");
    let stale = reg.register("p2", "QmOld", b"deed two", b"deed two");
    let tampered = reg.register("p3", "Qmp3", b"deed three", b"deed 3");
    let gone = reg.register("p4", "Qmp4", b"deed four", b"deed four");
    reg.content.fail_with(
        ContentId::from("Qmp4"),
        ContentError::NotFound(ContentId::from("Qmp4")),
    );
    let unknown = RecordKey::new("p5").unwrap();

    let keys = vec![
        good.clone(),
        stale.clone(),
        tampered.clone(),
        gone.clone(),
        unknown.clone(),
    ];
    let report = audit(
        &reg.ctx,
        &keys,
        &AuditOptions {
            concurrency: 2,
            per_record_timeout: Some(Duration::from_secs(5)),
        },
        &CancellationToken::new(),
    )
    .await;

    let order: Vec<&RecordKey> = report.entries.iter().map(AuditEntry::record_key).collect();
    assert_eq!(order, vec![&good, &stale, &tampered, &gone, &unknown]);

    let outcomes: Vec<Option<VerificationOutcome>> =
        report.entries.iter().map(AuditEntry::outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            Some(VerificationOutcome::Authentic),
            Some(VerificationOutcome::IdentifierMismatch),
            Some(VerificationOutcome::HashMismatch),
            Some(VerificationOutcome::ContentUnavailable),
            None,
        ]
    );

    let s = report.summary;
    assert_eq!(s.total, 5);
    assert_eq!(s.authentic, 1);
    assert_eq!(s.identifier_mismatch, 1);
    assert_eq!(s.hash_mismatch, 1);
    assert_eq!(s.content_unavailable, 1);
    assert_eq!(s.lookup_failed, 1);
    assert!(!s.all_authentic());

    // The stale record never reached the gateway.
    assert_eq!(reg.content.fetch_count(), 3);
}

#[tokio::test]
async fn cancelled_audit_still_reports_every_key() {
    let reg = Registry::new();
    let keys: Vec<RecordKey> = (0..6)
        .map(|i| {
            let p = format!("c{i}");
            reg.register(&p, &format!("Qm{p}"), b"deed", b"deed")
        })
        .collect();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = audit(&reg.ctx, &keys, &AuditOptions::default(), &cancel).await;

    assert_eq!(report.entries.len(), 6);
    assert_eq!(report.summary.authentic, 0);
    for entry in &report.entries {
        match entry {
            AuditEntry::LookupFailed { error, .. } => assert_eq!(error, "lookup cancelled"),
            AuditEntry::Verified(r) => assert!(r.was_cancelled(), "detail: {}", r.detail),
        }
    }
}

#[tokio::test]
async fn zero_concurrency_is_treated_as_one() {
    let reg = Registry::new();
    let key = reg.register("z1", "Qmz1", b"deed", b"deed");
    let report = audit(
        &reg.ctx,
        &[key],
        &AuditOptions {
            concurrency: 0,
            per_record_timeout: None,
        },
        &CancellationToken::new(),
    )
    .await;
    assert!(report.summary.all_authentic());
}

#[tokio::test]
async fn report_serializes_to_json() {
    let reg = Registry::new();
    let key = reg.register("j1", "Qmj1", b"deed", b"deed");
    let report = audit(&reg.ctx, &[key], &AuditOptions::default(), &CancellationToken::new()).await;
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["summary"]["authentic"], 1);
    assert_eq!(json["entries"][0]["status"], "verified");
    assert_eq!(json["entries"][0]["outcome"], "AUTHENTIC");
    assert!(json["generated_at"].is_string());
}
