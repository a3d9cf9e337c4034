//! # Identity Newtypes
//!
//! Identifiers shared by the ledger, the off-chain record store and the
//! content network. Each is a distinct type: a [`RecordKey`] cannot be
//! passed where a [`ContentId`] is expected.
//!
//! ## Validation
//!
//! [`RecordKey`] is validated at construction and at deserialization.
//! [`ContentId`] is deliberately unvalidated: the ledger may hand back an
//! empty pointer for a half-written record, and the verifier has to be able
//! to see that value to report it.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length of a parcel identifier, in characters.
pub const MAX_RECORD_KEY_LEN: usize = 128;

/// Routes `Deserialize` for a string newtype through its validating
/// `new()` constructor so that invalid values are rejected at the boundary.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Stable identifier of a parcel, used to look the record up in both the
/// ledger and the off-chain record store.
///
/// Opaque apart from three rules: not blank, at most
/// [`MAX_RECORD_KEY_LEN`] characters, no control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordKey(String);

impl_validating_deserialize!(RecordKey);

impl RecordKey {
    /// Create a record key, validating its format.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the key is blank, too long, or
    /// contains a control character.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::EmptyRecordKey);
        }
        let len = s.chars().count();
        if len > MAX_RECORD_KEY_LEN {
            return Err(ValidationError::RecordKeyTooLong {
                len,
                max: MAX_RECORD_KEY_LEN,
            });
        }
        if s.chars().any(char::is_control) {
            return Err(ValidationError::RecordKeyControlChar(s));
        }
        Ok(Self(s))
    }

    /// Access the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RecordKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A content-addressed pointer (for example an IPFS CID).
///
/// Compared with exact, case-sensitive string equality. Never trimmed,
/// lowercased or otherwise normalized: two pointers that differ in any
/// byte are different pointers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap a pointer as-is.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the pointer as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the pointer is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ContentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
