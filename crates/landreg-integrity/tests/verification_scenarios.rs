//! # Verification Scenarios
//!
//! End-to-end behavior of `IntegrityVerifier::verify` against in-memory and
//! scripted content stores: the four outcomes, retrieval-call accounting,
//! digest canonicalization, idempotence, cancellation and deadlines.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use landreg_core::{ContentId, RecordKey, Sha256Digest};
use landreg_integrity::memory::MemoryContentStore;
use landreg_integrity::{
    Abort, ContentError, ContentStore, IntegrityVerifier, VerificationOutcome, VerificationSubject,
};

fn hello_world_digest() -> String {
    Sha256Digest::of(b"hello world").to_hex()
}

fn subject(declared: &str, authoritative: &str, digest: &str) -> VerificationSubject {
    VerificationSubject {
        record_key: RecordKey::new("parcel-001").unwrap(),
        declared_content_id: ContentId::from(declared),
        authoritative_content_id: ContentId::from(authoritative),
        authoritative_digest: digest.to_string(),
    }
}

fn store_with(id: &str, bytes: &[u8]) -> MemoryContentStore {
    let store = MemoryContentStore::new();
    store.put(ContentId::from(id), bytes.to_vec());
    store
}

/// Never answers until dropped; counts calls.
#[derive(Default)]
struct Hanging {
    calls: AtomicUsize,
}

#[async_trait]
impl ContentStore for Hanging {
    async fn fetch_bytes(&self, _id: &ContentId) -> Result<Vec<u8>, ContentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

// ── Concrete scenarios ──────────────────────────────────────────────

#[tokio::test]
async fn matching_pointer_and_content_is_authentic() {
    let store = store_with("Qm123", b"hello world");
    let verifier = IntegrityVerifier::new(Arc::new(store.clone()));

    let r = verifier
        .verify(&subject("Qm123", "Qm123", &hello_world_digest()), &Abort::none())
        .await;

    assert_eq!(r.outcome, VerificationOutcome::Authentic);
    assert_eq!(r.computed_digest, Some(Sha256Digest::of(b"hello world")));
    assert_eq!(store.fetch_count(), 1);
}

#[tokio::test]
async fn stale_offchain_pointer_is_identifier_mismatch_without_retrieval() {
    let store = store_with("Qm999", b"hello world");
    let verifier = IntegrityVerifier::new(Arc::new(store.clone()));

    let r = verifier
        .verify(&subject("Qm123", "Qm999", &hello_world_digest()), &Abort::none())
        .await;

    assert_eq!(r.outcome, VerificationOutcome::IdentifierMismatch);
    assert!(r.computed_digest.is_none());
    assert_eq!(store.fetch_count(), 0, "retrieval must be skipped");
}

#[tokio::test]
async fn network_timeout_is_content_unavailable_with_detail() {
    let store = MemoryContentStore::new();
    store.fail_with(
        ContentId::from("Qm123"),
        ContentError::Timeout {
            content_id: ContentId::from("Qm123"),
            message: "operation timed out after 30s".into(),
        },
    );
    let verifier = IntegrityVerifier::new(Arc::new(store));

    let r = verifier
        .verify(&subject("Qm123", "Qm123", &hello_world_digest()), &Abort::none())
        .await;

    assert_eq!(r.outcome, VerificationOutcome::ContentUnavailable);
    assert!(r.detail.contains("timeout"), "detail: {}", r.detail);
    assert!(r.computed_digest.is_none());
}

#[tokio::test]
async fn tampered_content_is_hash_mismatch() {
    let store = store_with("Qm123", b"tampered");
    let verifier = IntegrityVerifier::new(Arc::new(store));

    let r = verifier
        .verify(&subject("Qm123", "Qm123", &hello_world_digest()), &Abort::none())
        .await;

    assert_eq!(r.outcome, VerificationOutcome::HashMismatch);
    assert_eq!(r.computed_digest, Some(Sha256Digest::of(b"tampered")));
}

// ── Properties ──────────────────────────────────────────────────────

#[tokio::test]
async fn store_error_text_is_kept_in_detail() {
    let store = MemoryContentStore::new();
    store.fail_with(
        ContentId::from("Qm123"),
        ContentError::Status {
            content_id: ContentId::from("Qm123"),
            status: 502,
            body: "upstream pin not found".into(),
        },
    );
    let verifier = IntegrityVerifier::new(Arc::new(store));

    let r = verifier
        .verify(&subject("Qm123", "Qm123", &hello_world_digest()), &Abort::none())
        .await;

    assert_eq!(r.outcome, VerificationOutcome::ContentUnavailable);
    assert!(r.detail.contains("502"));
    assert!(r.detail.contains("upstream pin not found"));
}

#[tokio::test]
async fn unresolvable_identifier_is_content_unavailable() {
    let verifier = IntegrityVerifier::new(Arc::new(MemoryContentStore::new()));
    let r = verifier
        .verify(&subject("QmGone", "QmGone", &hello_world_digest()), &Abort::none())
        .await;
    assert_eq!(r.outcome, VerificationOutcome::ContentUnavailable);
    assert!(r.detail.contains("QmGone"));
}

#[tokio::test]
async fn uppercase_and_lowercase_ledger_digests_are_both_authentic() {
    let store = store_with("Qm123", b"hello world");
    let verifier = IntegrityVerifier::new(Arc::new(store));
    let lower = hello_world_digest();
    let upper = lower.to_uppercase();
    let mixed: String = lower
        .chars()
        .enumerate()
        .map(|(i, c)| if i % 3 == 0 { c.to_ascii_uppercase() } else { c })
        .collect();
    assert_ne!(mixed, lower);
    assert_ne!(mixed, upper);

    for declared in [&lower, &upper, &mixed] {
        let r = verifier
            .verify(&subject("Qm123", "Qm123", declared), &Abort::none())
            .await;
        assert_eq!(r.outcome, VerificationOutcome::Authentic, "declared {declared}");
    }
}

#[tokio::test]
async fn identifier_comparison_is_case_sensitive() {
    let store = store_with("QmAbC", b"hello world");
    let verifier = IntegrityVerifier::new(Arc::new(store.clone()));
    let r = verifier
        .verify(&subject("qmabc", "QmAbC", &hello_world_digest()), &Abort::none())
        .await;
    assert_eq!(r.outcome, VerificationOutcome::IdentifierMismatch);
    assert_eq!(store.fetch_count(), 0);
}

#[tokio::test]
async fn verification_is_idempotent() {
    let store = store_with("Qm123", b"tampered");
    let verifier = IntegrityVerifier::new(Arc::new(store));
    let s = subject("Qm123", "Qm123", &hello_world_digest());

    let first = verifier.verify(&s, &Abort::none()).await;
    let second = verifier.verify(&s, &Abort::none()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_ledger_fields_fail_fast() {
    let store = store_with("Qm123", b"hello world");
    let verifier = IntegrityVerifier::new(Arc::new(store.clone()));

    for s in [
        subject("Qm123", "", &hello_world_digest()),
        subject("Qm123", "Qm123", ""),
        subject("", "", ""),
    ] {
        let r = verifier.verify(&s, &Abort::none()).await;
        assert_eq!(r.outcome, VerificationOutcome::ContentUnavailable);
        assert_eq!(r.detail, "ledger record missing");
    }
    assert_eq!(store.fetch_count(), 0);
}

// ── Cancellation and deadlines ──────────────────────────────────────

#[tokio::test]
async fn cancellation_resolves_hanging_retrieval() {
    let store = Arc::new(Hanging::default());
    let verifier = IntegrityVerifier::new(store.clone());
    let abort = Abort::none();
    let canceller = abort.clone();

    let task = tokio::spawn(async move {
        verifier
            .verify(&subject("Qm123", "Qm123", &hello_world_digest()), &abort)
            .await
    });
    while store.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    canceller.cancel();

    let r = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("verification must resolve after cancellation")
        .unwrap();
    assert_eq!(r.outcome, VerificationOutcome::ContentUnavailable);
    assert_eq!(r.detail, "cancelled");
    assert!(r.was_cancelled());
}

#[tokio::test]
async fn deadline_bounds_retrieval() {
    let verifier = IntegrityVerifier::new(Arc::new(Hanging::default()));
    let abort = Abort::none().with_deadline(Some(Duration::from_millis(20)));

    let r = verifier
        .verify(&subject("Qm123", "Qm123", &hello_world_digest()), &abort)
        .await;

    assert_eq!(r.outcome, VerificationOutcome::ContentUnavailable);
    assert!(r.detail.contains("timeout"), "detail: {}", r.detail);
    assert!(!r.was_cancelled());
}

#[tokio::test]
async fn cancellation_does_not_mask_identifier_mismatch() {
    let verifier = IntegrityVerifier::new(Arc::new(Hanging::default()));
    let abort = Abort::none();
    abort.cancel();
    let r = verifier
        .verify(&subject("QmA", "QmB", &hello_world_digest()), &abort)
        .await;
    assert_eq!(r.outcome, VerificationOutcome::IdentifierMismatch);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_verifications_are_independent() {
    let store = MemoryContentStore::new();
    let mut handles = Vec::new();
    for i in 0..16u32 {
        let id = format!("Qm{i}");
        let body = format!("deed #{i}");
        store.put(ContentId::from(id.as_str()), body.clone().into_bytes());
        let digest = if i % 2 == 0 {
            Sha256Digest::of(body.as_bytes()).to_hex()
        } else {
            Sha256Digest::of(b"something else").to_hex()
        };
        let verifier = IntegrityVerifier::new(Arc::new(store.clone()));
        handles.push(tokio::spawn(async move {
            let s = VerificationSubject {
                record_key: RecordKey::new(format!("parcel-{i}")).unwrap(),
                declared_content_id: ContentId::from(id.as_str()),
                authoritative_content_id: ContentId::from(id.as_str()),
                authoritative_digest: digest,
            };
            (i, verifier.verify(&s, &Abort::none()).await)
        }));
    }

    for h in handles {
        let (i, r) = h.await.unwrap();
        let expected = if i % 2 == 0 {
            VerificationOutcome::Authentic
        } else {
            VerificationOutcome::HashMismatch
        };
        assert_eq!(r.outcome, expected, "parcel-{i}");
    }
    assert_eq!(store.fetch_count(), 16);
}
