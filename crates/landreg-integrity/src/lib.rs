//! # landreg-integrity: Document Integrity Verification
//!
//! Decides whether the document a parcel record points to is the document
//! the ledger attests to. One verification is a single sequential chain:
//!
//! ```text
//! ledger pointer == off-chain pointer?  ── no ──▶ IDENTIFIER_MISMATCH
//!          │ yes
//! fetch bytes from the content network  ── err ─▶ CONTENT_UNAVAILABLE
//!          │ ok
//! sha256(bytes) == ledger digest?       ── no ──▶ HASH_MISMATCH
//!          │ yes
//!      AUTHENTIC
//! ```
//!
//! The verifier is stateless. It reads, never writes, and never retries.
//! Everything it talks to sits behind a trait in [`ports`], so the HTTP
//! adapters in `landreg-client` and the in-memory ones in [`memory`] are
//! interchangeable.
//!
//! ## Modules
//!
//! - [`verifier`]: the four-outcome [`IntegrityVerifier::verify`] operation.
//! - [`context`]: explicitly-passed [`RegistryContext`] that assembles a
//!   subject from the ledger and the record store.
//! - [`retry`]: opt-in, caller-side retry of unavailable content.
//! - [`audit`]: bounded-concurrency verification of many parcels.

pub mod abort;
pub mod audit;
pub mod context;
pub mod memory;
pub mod outcome;
pub mod ports;
pub mod retry;
pub mod subject;
pub mod verifier;

pub use abort::Abort;
pub use audit::{audit, AuditEntry, AuditOptions, AuditReport, AuditSummary};
pub use context::{LookupError, RegistryContext};
pub use outcome::{VerificationOutcome, VerificationResult};
pub use ports::{ContentError, ContentStore, LedgerError, LedgerReader, RecordStore, RecordStoreError};
pub use retry::RetryPolicy;
pub use subject::{LedgerRecord, VerificationSubject};
pub use verifier::IntegrityVerifier;
