//! # vsdl-core — Domain Model for the VSDL Delegation Stack
//!
//! Provides the domain primitives shared by every crate in the workspace:
//!
//! - **Identifier newtypes** ([`RecordId`], [`PolicyId`], [`TokenId`]) with
//!   format validation at construction time.
//! - **Records** ([`Record`], [`Field`]) — the ordered name→value mapping a
//!   custodial server holds for a subject.
//! - **Policies** ([`Policy`]) — named partitions of a record's field names
//!   into visible and hidden sets, plus capability strings, with the
//!   deterministic partition digest embedded into delegation tokens.
//!
//! ## Crate Policy
//!
//! - No cryptographic group operations here — those live in `vsdl-crypto`.
//! - String-based identifiers validate at construction AND at
//!   deserialization; invalid wire input is rejected, never silently kept.

pub mod error;
pub mod ident;
pub mod policy;
pub mod record;

pub use error::ValidationError;
pub use ident::{PolicyId, RecordId, TokenId};
pub use policy::{Policy, PolicyHash};
pub use record::{Field, Record};
