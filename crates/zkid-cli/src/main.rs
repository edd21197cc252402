//! # zkid CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zkid_cli::commit::{run_commit, CommitArgs};
use zkid_cli::issue::{run_issue, IssueArgs};
use zkid_cli::setup::{run_setup, SetupArgs};
use zkid_cli::verify::{run_verify, VerifyArgs};

/// Zero-knowledge student identity toolchain.
///
/// Generates circuit keys, computes attribute commitments, issues
/// selective-disclosure credentials, and verifies them off-chain and on a
/// ledger.
#[derive(Parser, Debug)]
#[command(name = "zkid", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate Groth16 proving and verification keys.
    Setup(SetupArgs),

    /// Print the circuit input and commitment for an attribute file.
    Commit(CommitArgs),

    /// Issue a credential: prove, verify on both paths, package.
    Issue(IssueArgs),

    /// Verify a credential bundle.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let json_logs = std::env::var("ZKID_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Setup(args) => run_setup(&args),
        Commands::Commit(args) => run_commit(&args),
        Commands::Issue(args) => run_issue(&args),
        Commands::Verify(args) => run_verify(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
