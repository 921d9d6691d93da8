//! # vsdl CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros for argument parsing.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vsdl_cli::demo::{run_demo, DemoArgs};
use vsdl_cli::serve::{run_serve, ServeArgs};
use vsdl_cli::verify::{run_verify, VerifyArgs};

/// VSDL — verifiable selective-disclosure delegation.
///
/// Issues delegation tokens that let a record owner authorize a third party
/// to view a chosen subset of their record, with cryptographic evidence
/// that the custodial server disclosed exactly the authorized subset.
#[derive(Parser, Debug)]
#[command(name = "vsdl", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the custodial server.
    Serve(ServeArgs),

    /// Walk issue → dispense → verify in-process and print the artifacts.
    Demo(DemoArgs),

    /// Verify a saved partition proof offline.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => run_serve(&args),
        Commands::Demo(args) => run_demo(&args),
        Commands::Verify(args) => run_verify(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
