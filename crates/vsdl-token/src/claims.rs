//! # Delegation Token Claims
//!
//! The signed compact token an owner hands to a delegate. Claims bind the
//! token id (`jti`), a subject fingerprint, the policy id and its partition
//! hash, the record commitment, the granted capabilities, and an absolute
//! expiry. Signing is HMAC-SHA256 over the compact JWT form with a
//! server-held secret; the token is opaque to the delegate until dispensed.
//!
//! ## Verification discipline
//!
//! Expiry is checked with zero leeway: a token issued with a one-second
//! lifetime is dead one second later, not a minute later. The issuer claim
//! is required and pinned.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use vsdl_core::RecordId;
use vsdl_crypto::Point;

use crate::error::TokenError;

/// Issuer pinned into every delegation token.
pub const ISSUER: &str = "vsdl-gov-portal";

/// Claims carried by a signed delegation token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegationClaims {
    /// Token identifier (32 hex chars, 128 bits).
    pub jti: String,
    /// Subject fingerprint: the first 16 hex chars of SHA-256(record id).
    pub sub: String,
    /// Policy identifier the token was issued under.
    pub policy: String,
    /// Full partition digest of that policy.
    #[serde(rename = "policyHash")]
    pub policy_hash: String,
    /// Hex-encoded record commitment the proof must be checked against.
    pub commitment: String,
    /// Capability strings granted to the delegate.
    pub actions: Vec<String>,
    /// Absolute expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issuer, always [`ISSUER`].
    pub iss: String,
}

impl DelegationClaims {
    /// Decode the record commitment bound into these claims.
    pub fn commitment_point(&self) -> Result<Point, TokenError> {
        Ok(Point::from_hex(&self.commitment)?)
    }
}

/// Fingerprint a record id for the `sub` claim: first 16 hex chars of its
/// SHA-256 digest. The token discloses which record it covers only to
/// parties that already know the record id.
pub fn subject_fingerprint(record_id: &RecordId) -> String {
    let digest = Sha256::digest(record_id.as_str().as_bytes());
    hex::encode(digest)[..16].to_string()
}

/// Absolute expiry `ttl_secs` from now.
pub fn expiry_after(ttl_secs: u64) -> i64 {
    Utc::now().timestamp() + ttl_secs as i64
}

/// Sign claims into the compact token form with HMAC-SHA256.
pub fn sign_claims(claims: &DelegationClaims, secret: &[u8]) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify a compact token's signature, expiry, and issuer, returning the
/// claims on success.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<DelegationClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss"]);
    decode::<DelegationClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| TokenError::Rejected(e.to_string()))
}
