//! # `vsdl verify` — Offline Proof Verification
//!
//! Verifies a saved partition proof the way a distrusting delegate would:
//! against the record commitment taken from their signed token and the
//! visible-field set their policy entitles them to.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde_json::json;

use vsdl_crypto::Point;
use vsdl_token::{verify_disclosure, PartitionProof};

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to a JSON partition proof (the `proof` object from a
    /// dispense response).
    #[arg(long)]
    pub proof: PathBuf,

    /// Hex record commitment from the signed token's claims.
    #[arg(long)]
    pub commitment: String,

    /// Comma-separated field names the policy entitles you to see.
    #[arg(long, default_value = "")]
    pub visible: String,
}

/// Run the verification. Exit code 0 when the proof verifies, 1 when it
/// does not.
pub fn run_verify(args: &VerifyArgs) -> anyhow::Result<u8> {
    let text = std::fs::read_to_string(&args.proof)
        .with_context(|| format!("reading {}", args.proof.display()))?;
    let proof: PartitionProof = serde_json::from_str(&text).context("parsing proof")?;
    let bound = Point::from_hex(&args.commitment).context("decoding commitment")?;
    let expected: BTreeSet<String> = args
        .visible
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let report = verify_disclosure(&proof, bound, &expected);
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
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
    use vsdl_core::{PolicyId, RecordId};
    use vsdl_server::{delegation, ServerConfig, ServerState};

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("vsdl-test-{name}-{}.json", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn dispensed_proof() -> (PartitionProof, String, String) {
        let state = ServerState::with_seed_data(ServerConfig::ephemeral().unwrap());
        let issued = delegation::issue(
            &state,
            &RecordId::new("citizen-001").unwrap(),
            &PolicyId::new("id-renewal").unwrap(),
            60,
        )
        .unwrap();
        let outcome = delegation::dispense(&state, &issued.token).unwrap();
        let visible = outcome
            .filtered
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(",");
        (outcome.proof, issued.commitment.to_hex(), visible)
    }

    #[test]
    fn verify_accepts_honest_proof_file() {
        let (proof, commitment, visible) = dispensed_proof();
        let path = write_temp("honest", &serde_json::to_string(&proof).unwrap());
        let args = VerifyArgs {
            proof: path.clone(),
            commitment,
            visible,
        };
        assert_eq!(run_verify(&args).unwrap(), 0);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn verify_flags_tampered_proof_file() {
        let (mut proof, commitment, visible) = dispensed_proof();
        proof.openings[0].value = "Elsewhere".to_string();
        let path = write_temp("tampered", &serde_json::to_string(&proof).unwrap());
        let args = VerifyArgs {
            proof: path.clone(),
            commitment,
            visible,
        };
        assert_eq!(run_verify(&args).unwrap(), 1);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn verify_rejects_unparseable_proof() {
        let path = write_temp("garbage", "{not json");
        let args = VerifyArgs {
            proof: path.clone(),
            commitment: "aa".repeat(32),
            visible: String::new(),
        };
        assert!(run_verify(&args).is_err());
        std::fs::remove_file(path).ok();
    }
}
