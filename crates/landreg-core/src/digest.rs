//! # Document Digests
//!
//! SHA-256 over raw document bytes, plus the single canonical textual
//! encoding every declared digest is normalized to before comparison.
//!
//! ## Canonical Encoding
//!
//! 64 lowercase hexadecimal characters with no prefix. Declared digests may
//! carry a `0x`/`0X` or `sha256:` prefix, surrounding whitespace, or any
//! mix of upper and lower case; [`canonical_digest_text`] strips and folds
//! all of that. Comparing un-normalized strings would report a tampered
//! document for a digest that was merely written in upper case.
//!
//! ## Byte Exactness
//!
//! [`Sha256Digest::of`] hashes exactly the slice it is given. Callers must
//! not decode, re-encode or trim document bytes before hashing them.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::ValidationError;

/// Prefixes accepted (case-insensitively) in front of a declared digest.
const ACCEPTED_PREFIXES: [&str; 2] = ["sha256:", "0x"];

/// A 256-bit SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest([u8; 32]);

impl Sha256Digest {
    /// Hash a byte sequence exactly as given.
    pub fn of(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Wrap an already computed 32-byte digest.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest in canonical form: 64 lowercase hex chars.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Debug for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sha256Digest({})", self.to_hex())
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Sha256Digest {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_digest(s)
    }
}

impl Serialize for Sha256Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Sha256Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_digest(&raw).map_err(serde::de::Error::custom)
    }
}

/// Normalize a declared digest into the canonical textual encoding.
///
/// Trims surrounding whitespace, strips one accepted prefix (matched
/// case-insensitively) and lowercases. Performs no validation: a malformed
/// value stays malformed and simply never equals a computed digest.
pub fn canonical_digest_text(declared: &str) -> String {
    let trimmed = declared.trim();
    let body = ACCEPTED_PREFIXES
        .iter()
        .find_map(|prefix| strip_prefix_ignore_ascii_case(trimmed, prefix))
        .unwrap_or(trimmed);
    body.to_ascii_lowercase()
}

fn strip_prefix_ignore_ascii_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

/// Strictly parse a declared digest.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDigest`] unless the canonicalized text
/// is exactly 64 hex characters.
pub fn parse_digest(declared: &str) -> Result<Sha256Digest, ValidationError> {
    let canonical = canonical_digest_text(declared);
    let invalid = |reason: String| ValidationError::InvalidDigest {
        value: declared.to_string(),
        reason,
    };
    if canonical.len() != 64 {
        return Err(invalid(format!(
            "expected 64 hex chars, got {}",
            canonical.len()
        )));
    }
    let mut bytes = [0u8; 32];
    for (i, pair) in canonical.as_bytes().chunks(2).enumerate() {
        let text = std::str::from_utf8(pair).map_err(|e| invalid(e.to_string()))?;
        bytes[i] = u8::from_str_radix(text, 16)
            .map_err(|_| invalid(format!("non-hex characters at offset {}", i * 2)))?;
    }
    Ok(Sha256Digest(bytes))
}

/// Compare a computed digest against a declared one.
///
/// The declared side is canonicalized first; the comparison itself runs in
/// constant time over the canonical text.
pub fn digests_match(computed: &Sha256Digest, declared: &str) -> bool {
    let expected = canonical_digest_text(declared);
    computed
        .to_hex()
        .as_bytes()
        .ct_eq(expected.as_bytes())
        .into()
}
