//! # vsdl-crypto — Group Primitives and Commitment Engine
//!
//! The cryptographic core of the delegation stack:
//!
//! - **Group primitives** ([`group`]) — typed [`Scalar`](group::Scalar) and
//!   [`Point`](group::Point) wrappers over the ristretto255 prime-order
//!   group, the fixed generator pair, hash-to-scalar, and canonical
//!   encodings.
//! - **Pedersen engine** ([`pedersen`]) — per-field and whole-record
//!   commitments, subset sums, and the partition-verification equation that
//!   relates a full-record commitment to its visible and hidden halves.
//!
//! ## Crate Policy
//!
//! - Stateless and purely functional; every operation is safe to call from
//!   any thread concurrently.
//! - Randomness comes only from the OS source and failures are surfaced,
//!   never papered over.
//! - No mocking of group arithmetic in tests — all tests run real curve
//!   operations.

pub mod error;
pub mod group;
pub mod pedersen;

pub use error::CryptoError;
pub use group::{generator_g, generator_h, hash_to_scalar, random_scalar, Point, Scalar};
pub use pedersen::{
    commit_field, commit_record, recompute_from_openings, subset_commitment, verify_partition,
    CommittedRecord, FieldCommitment,
};
