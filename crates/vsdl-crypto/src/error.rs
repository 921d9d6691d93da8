//! # Cryptographic Error Types
//!
//! Structured errors for group and commitment operations. Uses `thiserror`
//! for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Errors from cryptographic operations in the delegation stack.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Bytes did not decode to a canonical group element.
    #[error("malformed group element: {0}")]
    MalformedPoint(String),

    /// Bytes did not decode to a canonical scalar (not reduced mod the
    /// group order, or wrong length).
    #[error("malformed scalar: {0}")]
    MalformedScalar(String),

    /// Hex decoding failed.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// The operating-system randomness source failed.
    #[error("randomness source failure: {0}")]
    Randomness(String),
}
