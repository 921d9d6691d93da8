//! # Route Modules
//!
//! One module per protocol surface:
//!
//! - [`tokens`] — `POST /token/create` (owner issues a delegation)
//! - [`delegate`] — `GET /delegate/:token` (delegate redeems it)
//! - [`verify`] — `POST /verify` (convenience equation check)
//! - [`meta`] — `GET /generators`, `GET /policies` (diagnostics + catalog)

pub mod delegate;
pub mod meta;
pub mod tokens;
pub mod verify;
