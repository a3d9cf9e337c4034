//! # landreg-core: Foundational Types for the Land Registry
//!
//! This crate is the leaf of the workspace dependency graph. It defines the
//! primitives every other crate agrees on:
//!
//! 1. **Newtype wrappers for identifiers.** `RecordKey` (parcel identifier)
//!    and `ContentId` (content-addressed pointer) are distinct types, so a
//!    parcel id can never be passed where a content pointer is expected.
//!
//! 2. **One digest scheme.** `Sha256Digest` is computed over the exact bytes
//!    handed to it. No normalization or re-encoding happens before hashing.
//!
//! 3. **One canonical textual encoding.** Declared digests arrive from the
//!    ledger, the document database and the command line in whatever case
//!    and prefix convention the writer used. Every comparison goes through
//!    [`canonical_digest_text`] first: 64 lowercase hex characters, no prefix.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `landreg-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod identity;

pub use digest::{canonical_digest_text, digests_match, parse_digest, Sha256Digest};
pub use error::ValidationError;
pub use identity::{ContentId, RecordKey};
