//! # vsdl-cli — Command-Line Interface
//!
//! Subcommand handlers for the `vsdl` binary:
//!
//! - [`serve`] — run the custodial server.
//! - [`demo`] — walk the three-party protocol in-process and print every
//!   artifact a real deployment would exchange.
//! - [`verify`] — verify a saved partition proof offline, the way a
//!   delegate who distrusts the server would.

pub mod demo;
pub mod serve;
pub mod verify;
