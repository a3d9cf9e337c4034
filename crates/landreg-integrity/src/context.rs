//! # Registry Context
//!
//! The explicitly-passed handle to the ledger, the off-chain record store
//! and the content network. Callers build one at startup and thread it to
//! wherever verification happens; nothing in this crate reaches for a
//! process-wide session.
//!
//! Both the pointer and the digest compared by the verifier come from the
//! ledger. The off-chain store contributes only the pointer under test.

use std::sync::Arc;

use landreg_core::RecordKey;
use thiserror::Error;

use crate::abort::Abort;
use crate::outcome::VerificationResult;
use crate::ports::{ContentStore, LedgerError, LedgerReader, RecordStore, RecordStoreError};
use crate::subject::VerificationSubject;
use crate::verifier::IntegrityVerifier;

/// A verification subject could not be assembled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Reading the ledger failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Reading the off-chain record failed.
    #[error(transparent)]
    RecordStore(#[from] RecordStoreError),

    /// The caller cancelled before both lookups completed.
    #[error("lookup cancelled")]
    Cancelled,
}

/// Collaborators for verifying parcel records.
#[derive(Clone)]
pub struct RegistryContext {
    ledger: Arc<dyn LedgerReader>,
    records: Arc<dyn RecordStore>,
    verifier: IntegrityVerifier,
}

impl std::fmt::Debug for RegistryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryContext").finish_non_exhaustive()
    }
}

impl RegistryContext {
    /// Wire the three collaborators together.
    pub fn new(
        ledger: Arc<dyn LedgerReader>,
        records: Arc<dyn RecordStore>,
        content: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            ledger,
            records,
            verifier: IntegrityVerifier::new(content),
        }
    }

    /// The verifier used by [`verify_record`](Self::verify_record).
    pub fn verifier(&self) -> &IntegrityVerifier {
        &self.verifier
    }

    /// Read the ledger and the record store for `key` concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if either read fails or `abort` is cancelled
    /// first.
    pub async fn subject(&self, key: &RecordKey, abort: &Abort) -> Result<VerificationSubject, LookupError> {
        let lookups = async {
            tokio::try_join!(
                async { self.ledger.authoritative(key).await.map_err(LookupError::from) },
                async { self.records.declared_content_id(key).await.map_err(LookupError::from) },
            )
        };

        let (ledger, declared) = tokio::select! {
            biased;
            _ = abort.token().cancelled() => return Err(LookupError::Cancelled),
            looked_up = lookups => looked_up?,
        };

        Ok(VerificationSubject::new(key.clone(), declared, ledger))
    }

    /// Assemble the subject for `key` and verify it.
    ///
    /// # Errors
    ///
    /// Only lookup failures are errors. Once a subject exists, every
    /// verification ends in one of the four outcomes.
    pub async fn verify_record(&self, key: &RecordKey, abort: &Abort) -> Result<VerificationResult, LookupError> {
        let subject = match self.subject(key, abort).await {
            Ok(subject) => subject,
            Err(e) => {
                tracing::warn!(record_key = %key, error = %e, "could not assemble verification subject");
                return Err(e);
            }
        };
        Ok(self.verifier.verify(&subject, abort).await)
    }
}
