//! # vsdl-token — Delegation Tokens and Partition Proofs
//!
//! The objects exchanged between the three protocol parties:
//!
//! - **Claims** ([`claims`]) — the signed compact token (HS256 JWT) that
//!   binds a token id, subject fingerprint, policy id + partition hash,
//!   record commitment, capabilities, and expiry.
//! - **Proofs** ([`proof`]) — the delegate-visible [`PartitionProof`]
//!   payload plus [`verify_disclosure`], the verification algorithm a
//!   delegate runs locally against the commitment bound into the token.
//!
//! ## Trust model
//!
//! The custodial server is trusted for availability, not honesty. The
//! delegate therefore verifies the partition equation against the record
//! commitment carried inside the *signed* token — never against the copy a
//! server echoes in the proof body.

pub mod claims;
pub mod error;
pub mod proof;

pub use claims::{expiry_after, sign_claims, subject_fingerprint, verify_token, DelegationClaims, ISSUER};
pub use error::TokenError;
pub use proof::{verify_disclosure, DisclosureFailure, DisclosureReport, Opening, PartitionProof};
