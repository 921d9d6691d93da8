//! # Delegation Operations
//!
//! The three server-side operations of the protocol, free of HTTP concerns
//! so they can be driven from route handlers, the CLI demo, and tests
//! alike:
//!
//! - [`issue`] — owner creates a delegation: snapshot the record, commit to
//!   every field, bind policy + commitment into a signed token.
//! - [`dispense`] — delegate redeems a token: verify it, partition the
//!   snapshot, disclose openings for the visible half and one opaque
//!   commitment for the hidden half.
//! - [`verify_openings`] — recompute the visible-subset commitment from
//!   submitted openings and check the partition equation; a convenience for
//!   delegates who do not run the verifier locally.
//!
//! ## Failure semantics
//!
//! Nothing here retries. Signature and expiry failures carry their detailed
//! reason for server logs but are surfaced to clients generically. A failed
//! partition equation is a protocol result (`valid: false`), never an
//! error.

use std::collections::BTreeMap;

use chrono::Utc;

use vsdl_core::{PolicyHash, PolicyId, RecordId, TokenId};
use vsdl_crypto::{
    commit_record, recompute_from_openings, subset_commitment, verify_partition, Point,
};
use vsdl_token::{
    expiry_after, sign_claims, subject_fingerprint, verify_token, DelegationClaims, Opening,
    PartitionProof, TokenError, ISSUER,
};

use crate::error::DelegationError;
use crate::state::{IssuedDelegation, ServerState};

/// Everything returned to the owner at issuance: the signed token, the
/// delegation URL, and the public cryptographic material for display.
pub struct IssueOutcome {
    /// Fresh token identifier (the `jti` claim).
    pub token_id: TokenId,
    /// The signed compact token.
    pub token: String,
    /// Delegation URL embedding the token.
    pub url: String,
    /// Absolute expiry, seconds since the Unix epoch.
    pub expires_at: i64,
    /// The record commitment bound into the token.
    pub commitment: Point,
    /// Per-field commitment points, keyed by field name.
    pub field_commitments: BTreeMap<String, Point>,
    /// The policy's partition digest embedded in the token.
    pub policy_hash: PolicyHash,
}

/// The filtered view and proof returned to the delegate.
pub struct DispenseOutcome {
    /// Visible fields only, name → value.
    pub filtered: BTreeMap<String, String>,
    /// Capability strings granted by the policy.
    pub actions: Vec<String>,
    /// The partition proof the delegate verifies locally.
    pub proof: PartitionProof,
}

/// The outcome of the convenience equation check.
pub struct VerifyOutcome {
    /// Whether the partition equation held.
    pub valid: bool,
    /// The visible-subset commitment recomputed from the openings.
    pub recomputed_visible: Point,
}

/// Issue a delegation token for `record_id` under `policy_id`.
pub fn issue(
    state: &ServerState,
    record_id: &RecordId,
    policy_id: &PolicyId,
    ttl_secs: u64,
) -> Result<IssueOutcome, DelegationError> {
    // Opportunistic reclamation keeps the map bounded by live tokens.
    state.purge_expired();

    let record = state
        .records()
        .get(record_id)
        .ok_or_else(|| DelegationError::RecordNotFound(record_id.clone()))?
        .clone();
    let policy = state
        .policies()
        .get(policy_id)
        .ok_or_else(|| DelegationError::PolicyNotFound(policy_id.clone()))?
        .clone();

    let token_id = TokenId::random().map_err(|e| DelegationError::Internal(e.to_string()))?;
    let committed = commit_record(&record)?;
    let policy_hash = policy.partition_hash();
    let expires_at = expiry_after(ttl_secs);

    let claims = DelegationClaims {
        jti: token_id.to_string(),
        sub: subject_fingerprint(record_id),
        policy: policy_id.to_string(),
        policy_hash: policy_hash.to_string(),
        commitment: committed.commitment.to_hex(),
        actions: policy.actions.clone(),
        exp: expires_at,
        iss: ISSUER.to_string(),
    };
    let token = sign_claims(&claims, state.secret())
        .map_err(|e| DelegationError::Internal(e.to_string()))?;

    let field_commitments: BTreeMap<String, Point> = committed
        .fields
        .iter()
        .map(|(name, fc)| (name.clone(), fc.point))
        .collect();

    state.tokens().insert(
        token_id.clone(),
        IssuedDelegation {
            record,
            policy,
            fields: committed.fields,
            commitment: committed.commitment,
            created_at: Utc::now(),
            expires_at,
        },
    );

    tracing::info!(
        token_id = %token_id,
        record = %record_id,
        policy = %policy_id,
        expires_at,
        "issued delegation token"
    );

    Ok(IssueOutcome {
        url: format!("{}/delegate/{}", state.base_url(), token),
        token_id,
        token,
        expires_at,
        commitment: committed.commitment,
        field_commitments,
        policy_hash,
    })
}

/// Redeem a delegation token: the filtered record plus its partition proof.
pub fn dispense(state: &ServerState, token: &str) -> Result<DispenseOutcome, DelegationError> {
    let claims = verify_token(token, state.secret()).map_err(|e| match e {
        TokenError::Rejected(reason) => DelegationError::InvalidToken(reason),
        other => DelegationError::Internal(other.to_string()),
    })?;

    let token_id = TokenId::new(claims.jti.clone())
        .map_err(|_| DelegationError::InvalidToken(format!("bad jti claim {:?}", claims.jti)))?;
    let entry = state
        .tokens()
        .get(&token_id)
        .ok_or(DelegationError::TokenNotFound)?;
    let issued = entry.value();

    // Every record field must be accounted for by the partition; a field
    // covered by neither set would stay outside the audit while the
    // equation still held.
    if !issued.policy.covers(&issued.record) {
        let visible = issued.policy.visible_in(&issued.record);
        let hidden = issued.policy.hidden_in(&issued.record);
        let unaccounted: Vec<String> = issued
            .record
            .names()
            .into_iter()
            .filter(|n| !visible.contains(n) && !hidden.contains(n))
            .collect();
        return Err(DelegationError::PolicyRecordMismatch {
            policy: issued.policy.id.to_string(),
            unaccounted,
        });
    }

    let visible = issued.policy.visible_in(&issued.record);
    let hidden = issued.policy.hidden_in(&issued.record);

    let hidden_commitment =
        subset_commitment(&issued.fields, hidden.iter().map(String::as_str));

    let mut filtered = BTreeMap::new();
    let mut openings = Vec::with_capacity(visible.len());
    for field in issued.record.fields() {
        if !visible.contains(&field.name) {
            continue;
        }
        filtered.insert(field.name.clone(), field.value.clone());
        let fc = issued
            .fields
            .get(&field.name)
            .ok_or_else(|| DelegationError::Internal(format!("missing commitment for {}", field.name)))?;
        openings.push(Opening {
            name: field.name.clone(),
            value: field.value.clone(),
            r: fc.blinding,
        });
    }

    tracing::info!(
        token_id = %token_id,
        visible = visible.len(),
        hidden = hidden.len(),
        "dispensed delegation"
    );

    Ok(DispenseOutcome {
        filtered,
        actions: issued.policy.actions.clone(),
        proof: PartitionProof {
            record_commitment: issued.commitment,
            hidden_commitment,
            openings,
            hidden_field_count: hidden.len(),
        },
    })
}

/// Check the partition equation for caller-supplied openings and
/// commitments. No policy context: the caller vouches for the opening set,
/// the server only recomputes and compares.
pub fn verify_openings(
    openings: &[Opening],
    record_commitment: Point,
    hidden_commitment: Point,
) -> VerifyOutcome {
    let recomputed_visible = recompute_from_openings(
        openings
            .iter()
            .map(|o| (o.name.as_str(), o.value.as_str(), o.r)),
    );
    VerifyOutcome {
        valid: verify_partition(record_commitment, hidden_commitment, recomputed_visible),
        recomputed_visible,
    }
}
