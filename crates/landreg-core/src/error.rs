//! # Error Types
//!
//! Validation failures for the primitives defined in this crate. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// A value failed validation at construction or deserialization time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Record keys must contain at least one non-whitespace character.
    #[error("record key must not be empty")]
    EmptyRecordKey,

    /// Record key exceeds the maximum accepted length.
    #[error("record key too long: {len} chars (max {max})")]
    RecordKeyTooLong {
        /// Length of the rejected key in characters.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// Record key contains a control character.
    #[error("record key contains a control character: {0:?}")]
    RecordKeyControlChar(String),

    /// A declared digest is not a 256-bit hex string.
    #[error("invalid sha256 digest {value:?}: {reason}")]
    InvalidDigest {
        /// The digest text as supplied.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_long_display_names_both_lengths() {
        let err = ValidationError::RecordKeyTooLong { len: 300, max: 128 };
        let msg = err.to_string();
        assert!(msg.contains("300"));
        assert!(msg.contains("128"));
    }

    #[test]
    fn invalid_digest_display_includes_value() {
        let err = ValidationError::InvalidDigest {
            value: "zz".into(),
            reason: "expected 64 hex chars, got 2".into(),
        };
        assert!(err.to_string().contains("\"zz\""));
    }
}
