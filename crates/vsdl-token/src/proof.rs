//! # Partition Proofs and the Delegate-Side Verifier
//!
//! A [`PartitionProof`] is the delegate-visible payload produced when a
//! token is dispensed: the record commitment, a single opaque commitment to
//! the hidden subset, and one opening per visible field. The delegate
//! recomputes the visible-subset commitment from the openings and checks
//! that hidden + visible reconstructs the record commitment **from the
//! signed token** — a dishonest server cannot substitute values outside the
//! authorized subset without breaking the equation, and cannot point the
//! proof at a different record without breaking the token signature.
//!
//! `hidden_field_count` is advisory display material only; nothing in
//! verification trusts it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use vsdl_crypto::{recompute_from_openings, verify_partition, Point, Scalar};

/// A disclosed opening for one visible field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: String,
    /// The blinding scalar that, with the value, reproduces the field's
    /// commitment.
    pub r: Scalar,
}

/// The proof payload returned by a dispense operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionProof {
    /// The record commitment, echoed for display. Verification uses the
    /// copy bound into the signed token, and requires this echo to match.
    pub record_commitment: Point,
    /// Commitment to the hidden subset, a single opaque point.
    pub hidden_commitment: Point,
    /// One opening per visible field present in the record.
    pub openings: Vec<Opening>,
    /// Advisory count of hidden fields. Never trusted by verification.
    pub hidden_field_count: usize,
}

/// Why a disclosure failed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisclosureFailure {
    /// The commitment echoed in the proof body differs from the one bound
    /// into the signed token.
    CommitmentMismatch,
    /// The set of opened names is not exactly the expected visible set.
    OpeningSetMismatch {
        /// Expected names with no opening.
        missing: Vec<String>,
        /// Opened names outside the expected set (or opened twice).
        unexpected: Vec<String>,
    },
    /// The partition equation `C_record == C_hidden + C_visible` failed.
    PartitionEquation,
}

impl std::fmt::Display for DisclosureFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisclosureFailure::CommitmentMismatch => {
                write!(f, "proof commitment differs from token commitment")
            }
            DisclosureFailure::OpeningSetMismatch { missing, unexpected } => write!(
                f,
                "opening set mismatch (missing: [{}], unexpected: [{}])",
                missing.join(", "),
                unexpected.join(", ")
            ),
            DisclosureFailure::PartitionEquation => {
                write!(f, "partition equation does not hold")
            }
        }
    }
}

/// The outcome of verifying a disclosure. An invalid proof is a protocol
/// result, not an error: the report says "no" and why.
#[derive(Debug, Clone, PartialEq)]
pub struct DisclosureReport {
    /// Whether every check passed.
    pub valid: bool,
    /// The visible-subset commitment recomputed from the openings, kept for
    /// display regardless of the outcome.
    pub recomputed_visible: Point,
    /// The first failed check, when invalid.
    pub failure: Option<DisclosureFailure>,
}

/// Verify a dispensed disclosure.
///
/// `bound_commitment` is the record commitment from the *signed token's*
/// claims. `expected_visible` is the set of names the delegate is entitled
/// to see: the policy's visible set intersected with the field names the
/// server declared for this record.
///
/// Checks, in order:
/// 1. the echoed record commitment equals the token-bound one,
/// 2. the opened names are exactly `expected_visible`, each opened once,
/// 3. the partition equation holds against the token-bound commitment.
///
/// All point comparisons are constant-time.
pub fn verify_disclosure(
    proof: &PartitionProof,
    bound_commitment: Point,
    expected_visible: &BTreeSet<String>,
) -> DisclosureReport {
    let recomputed_visible = recompute_from_openings(
        proof
            .openings
            .iter()
            .map(|o| (o.name.as_str(), o.value.as_str(), o.r)),
    );

    if !proof.record_commitment.ct_eq(&bound_commitment) {
        return DisclosureReport {
            valid: false,
            recomputed_visible,
            failure: Some(DisclosureFailure::CommitmentMismatch),
        };
    }

    let mut opened = BTreeSet::new();
    let mut unexpected = Vec::new();
    for opening in &proof.openings {
        if !expected_visible.contains(&opening.name) || !opened.insert(opening.name.clone()) {
            unexpected.push(opening.name.clone());
        }
    }
    let missing: Vec<String> = expected_visible.difference(&opened).cloned().collect();
    if !missing.is_empty() || !unexpected.is_empty() {
        return DisclosureReport {
            valid: false,
            recomputed_visible,
            failure: Some(DisclosureFailure::OpeningSetMismatch { missing, unexpected }),
        };
    }

    if !verify_partition(bound_commitment, proof.hidden_commitment, recomputed_visible) {
        return DisclosureReport {
            valid: false,
            recomputed_visible,
            failure: Some(DisclosureFailure::PartitionEquation),
        };
    }

    DisclosureReport {
        valid: true,
        recomputed_visible,
        failure: None,
    }
}
