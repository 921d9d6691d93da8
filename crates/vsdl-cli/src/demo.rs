//! # `vsdl demo` — Three-Party Walkthrough
//!
//! Runs the whole protocol in one process against the seeded catalog and
//! prints every artifact a real deployment would exchange: the signed
//! token and delegation URL (owner), the filtered record and partition
//! proof (server → delegate), and the delegate's verification report.

use std::collections::BTreeSet;

use anyhow::Context;
use clap::Args;
use serde_json::json;

use vsdl_core::{PolicyId, RecordId};
use vsdl_server::{delegation, ServerConfig, ServerState};
use vsdl_token::{verify_disclosure, verify_token};

/// Arguments for the `demo` subcommand.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Record to delegate.
    #[arg(long, default_value = "citizen-001")]
    pub record: String,

    /// Policy to issue under.
    #[arg(long, default_value = "id-renewal")]
    pub policy: String,

    /// Token lifetime in seconds.
    #[arg(long, default_value_t = 300)]
    pub expires_in: u64,
}

/// Run the walkthrough. Exit code 0 when the disclosure verifies.
pub fn run_demo(args: &DemoArgs) -> anyhow::Result<u8> {
    let state = ServerState::with_seed_data(ServerConfig::ephemeral()?);
    let record_id = RecordId::new(args.record.as_str()).context("record id")?;
    let policy_id = PolicyId::new(args.policy.as_str()).context("policy id")?;

    // Owner: issue.
    let issued = delegation::issue(&state, &record_id, &policy_id, args.expires_in)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "step": "issue",
            "tokenId": issued.token_id.to_string(),
            "url": issued.url,
            "expiresAt": issued.expires_at,
            "recordCommitment": issued.commitment.to_hex(),
            "policyHash": issued.policy_hash.to_string(),
        }))?
    );

    // Delegate: redeem.
    let outcome = delegation::dispense(&state, &issued.token)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "step": "dispense",
            "filteredRecord": &outcome.filtered,
            "actions": &outcome.actions,
            "proof": &outcome.proof,
        }))?
    );

    // Delegate: verify locally against the commitment inside the signed
    // token, not the copy the server echoed.
    let claims = verify_token(&issued.token, state.secret())?;
    let bound = claims.commitment_point()?;
    let expected: BTreeSet<String> = outcome.filtered.keys().cloned().collect();
    let report = verify_disclosure(&outcome.proof, bound, &expected);

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "step": "verify",
            "valid": report.valid,
            "recomputedVisible": report.recomputed_visible.to_hex(),
            "failure": report.failure.as_ref().map(|f| f.to_string()),
        }))?
    );

    Ok(if report.valid { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_walkthrough_verifies() {
        let args = DemoArgs {
            record: "citizen-001".to_string(),
            policy: "id-renewal".to_string(),
            expires_in: 60,
        };
        assert_eq!(run_demo(&args).unwrap(), 0);
    }

    #[test]
    fn demo_with_every_seed_policy() {
        for policy in ["id-renewal", "tax-filing", "medical-proxy"] {
            let args = DemoArgs {
                record: "citizen-001".to_string(),
                policy: policy.to_string(),
                expires_in: 60,
            };
            assert_eq!(run_demo(&args).unwrap(), 0, "policy {policy}");
        }
    }

    #[test]
    fn demo_unknown_record_errors() {
        let args = DemoArgs {
            record: "citizen-404".to_string(),
            policy: "id-renewal".to_string(),
            expires_in: 60,
        };
        assert!(run_demo(&args).is_err());
    }
}
