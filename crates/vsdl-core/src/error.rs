//! # Validation Error Types
//!
//! Structured errors for domain-model construction. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Errors raised while constructing domain values.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// An identifier was empty.
    #[error("{kind} identifier must not be empty")]
    EmptyIdentifier {
        /// Which identifier kind was being constructed.
        kind: &'static str,
    },

    /// An identifier exceeded the maximum length.
    #[error("{kind} identifier must not exceed {max} characters, got {len}")]
    IdentifierTooLong {
        /// Which identifier kind was being constructed.
        kind: &'static str,
        /// Maximum permitted length.
        max: usize,
        /// Actual length supplied.
        len: usize,
    },

    /// An identifier contained a character outside `[A-Za-z0-9._-]`.
    #[error("{kind} identifier contains invalid character {ch:?}")]
    InvalidIdentifierChar {
        /// Which identifier kind was being constructed.
        kind: &'static str,
        /// The offending character.
        ch: char,
    },

    /// A token identifier was not 32 lowercase hex characters.
    #[error("token identifier must be 32 hex characters, got {0:?}")]
    InvalidTokenId(String),

    /// A record field had an empty name.
    #[error("record field names must not be empty")]
    EmptyFieldName,

    /// Two record fields shared a name.
    #[error("duplicate field name in record: {0:?}")]
    DuplicateFieldName(String),

    /// A field name appeared in both the visible and hidden sets of a policy.
    #[error("policy {policy}: field {name:?} is both visible and hidden")]
    OverlappingPartition {
        /// The policy being constructed.
        policy: String,
        /// The field name present in both sets.
        name: String,
    },

    /// The operating-system randomness source failed.
    #[error("randomness source failure: {0}")]
    Randomness(String),
}
