//! # Token Error Types

use thiserror::Error;

/// Errors from delegation-token signing and verification.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The token failed signature, expiry, issuer, or structural checks.
    ///
    /// The detailed reason is for server-side logs; callers surfacing this
    /// to a client should return a generic message so the endpoint does not
    /// act as a validity oracle.
    #[error("token rejected: {0}")]
    Rejected(String),

    /// The record commitment carried in the claims failed to decode.
    #[error("malformed commitment in claims: {0}")]
    MalformedCommitment(#[from] vsdl_crypto::CryptoError),

    /// Signing the claims failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}
