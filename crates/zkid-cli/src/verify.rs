//! # Verify Subcommand
//!
//! Runs the verification lifecycle on a bundle file. With
//! `--wallet-account`, the ledger check is a direct contract call from that
//! account instead of the service's own read-only call.
//!
//! Exit status follows the trust classification: 0 for `FullyVerified`,
//! 2 for `Rejected`, 3 for `PartiallyVerified` or `Indeterminate`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use url::Url;
use zkid_core::TrustClassification;
use zkid_ledger::{WalletConfig, WalletSession};
use zkid_lifecycle::VerificationPath;

/// Arguments for `zkid verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Bundle file, as written by `zkid issue --out` or scanned from a QR code.
    #[arg(value_name = "FILE")]
    pub bundle: PathBuf,

    /// Directory holding the circuit keys.
    #[arg(long, default_value = "keys")]
    pub keys: PathBuf,

    /// Verify from this wallet account via a direct contract call.
    #[arg(long, value_name = "0x..")]
    pub wallet_account: Option<String>,

    /// Ledger JSON-RPC endpoint, overriding `ZKID_RPC_URL`.
    #[arg(long)]
    pub rpc_url: Option<Url>,

    /// Print the full report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute `zkid verify`.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let payload = std::fs::read_to_string(&args.bundle)
        .with_context(|| format!("failed to read {}", args.bundle.display()))?;
    let ledger = crate::ledger_config(args.rpc_url.as_ref())?;
    let mut coordinator = crate::coordinator(&args.keys, &ledger)?;
    let runtime = crate::runtime()?;

    if let Some(account) = &args.wallet_account {
        let config = WalletConfig {
            account: Some(account.clone()),
            timeout_secs: ledger.timeout_secs,
            ..WalletConfig::new(ledger.rpc_url.clone(), ledger.verifier_address.clone())
        };
        let session = runtime
            .block_on(WalletSession::connect(config))
            .context("wallet connection failed")?;
        tracing::info!(account = session.account(), chain_id = session.chain_id(), "wallet connected");
        coordinator =
            coordinator.with_ledger_path(VerificationPath::DirectContractCall(Arc::new(session)));
    }

    let report = runtime
        .block_on(coordinator.verify_bundle(serde_json::Value::String(payload)))
        .context("verification failed")?;

    println!(
        "{}: {}",
        report.classification,
        report.classification.describe()
    );
    println!("  Off-chain: {}", path_summary(&report.off_chain));
    println!("  Ledger:    {}", path_summary(&report.on_chain));
    if let Some(details) = &report.revealed_details {
        for attribute in details.attributes() {
            println!("  {attribute}: {}", details.get(attribute).unwrap_or_default());
        }
    }
    if !report.disclosure_violations.is_empty() {
        println!(
            "  WARNING: revealed without consent: {:?}",
            report.disclosure_violations
        );
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(exit_code(report.classification))
}

fn path_summary(outcome: &zkid_core::VerificationOutcome) -> String {
    match (outcome.definitive(), &outcome.error) {
        (Some(true), _) => "valid".to_string(),
        (Some(false), Some(reason)) => format!("invalid ({reason})"),
        (Some(false), None) => "invalid".to_string(),
        (None, Some(reason)) => format!("did not execute ({reason})"),
        (None, None) => "did not execute".to_string(),
    }
}

/// Process exit status for a classification.
pub fn exit_code(classification: TrustClassification) -> u8 {
    match classification {
        TrustClassification::FullyVerified => 0,
        TrustClassification::Rejected => 2,
        TrustClassification::PartiallyVerified | TrustClassification::Indeterminate => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{run_issue, IssueArgs};
    use zkid_core::{PathKind, VerificationOutcome};

    const CLOSED_PORT: &str = "http://127.0.0.1:1";

    #[test]
    fn exit_codes() {
        assert_eq!(exit_code(TrustClassification::FullyVerified), 0);
        assert_eq!(exit_code(TrustClassification::Rejected), 2);
        assert_eq!(exit_code(TrustClassification::Indeterminate), 3);
    }

    #[test]
    fn summaries_distinguish_invalid_from_unreachable() {
        let invalid = VerificationOutcome::verdict(PathKind::OffChain, false);
        let down = VerificationOutcome::execution_failed(PathKind::OnChain, "connection refused");
        assert_eq!(path_summary(&invalid), "invalid");
        assert_eq!(path_summary(&down), "did not execute (connection refused)");
    }

    #[test]
    fn issued_bundle_verifies_off_chain_with_ledger_down() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bundle.json");
        run_issue(&IssueArgs {
            attributes: crate::testutil::write_jane(dir.path()),
            keys: crate::testutil::keys_dir().to_path_buf(),
            reveal: None,
            out: Some(out.clone()),
            rpc_url: Some(Url::parse(CLOSED_PORT).unwrap()),
        })
        .unwrap();

        let code = run_verify(&VerifyArgs {
            bundle: out,
            keys: crate::testutil::keys_dir().to_path_buf(),
            wallet_account: None,
            rpc_url: Some(Url::parse(CLOSED_PORT).unwrap()),
            json: false,
        })
        .unwrap();
        assert_eq!(code, exit_code(TrustClassification::Indeterminate));
    }

    #[test]
    fn unreachable_wallet_fails_to_connect() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bundle.json");
        std::fs::write(&out, r#"{"proof":{},"publicSignals":[]}"#).unwrap();
        let err = run_verify(&VerifyArgs {
            bundle: out,
            keys: crate::testutil::keys_dir().to_path_buf(),
            wallet_account: Some("0x70997970C51812dc3A010C8d65cbE0E2A45aF0F1".into()),
            rpc_url: Some(Url::parse(CLOSED_PORT).unwrap()),
            json: false,
        })
        .unwrap_err();
        assert!(err.to_string().contains("wallet connection failed"));
    }
}
