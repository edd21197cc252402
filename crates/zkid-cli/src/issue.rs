//! # Issue Subcommand
//!
//! Runs the full issuance lifecycle against local keys and the configured
//! ledger, then writes the disclosure bundle.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use url::Url;
use zkid_core::AttributeName;
use zkid_credential::{DisclosureCodec, PrivacySettings};

/// Arguments for `zkid issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Attribute file: `name`, `rollNo`, `dob`, `phoneNo`, `branch`.
    #[arg(value_name = "FILE")]
    pub attributes: PathBuf,

    /// Directory holding the circuit keys.
    #[arg(long, default_value = "keys")]
    pub keys: PathBuf,

    /// Attributes to reveal, comma separated. Pass an empty value to
    /// conceal everything. Defaults to name, rollNo, branch.
    #[arg(long, value_delimiter = ',')]
    pub reveal: Option<Vec<String>>,

    /// Write the bundle here instead of printing the full report.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Ledger JSON-RPC endpoint, overriding `ZKID_RPC_URL`.
    #[arg(long)]
    pub rpc_url: Option<Url>,
}

/// Execute `zkid issue`.
pub fn run_issue(args: &IssueArgs) -> Result<u8> {
    let attributes = crate::read_attributes(&args.attributes)?;
    let settings = args.reveal.as_deref().map(privacy_settings).transpose()?;
    let ledger = crate::ledger_config(args.rpc_url.as_ref())?;
    let coordinator = crate::coordinator(&args.keys, &ledger)?;

    let report = crate::runtime()?
        .block_on(coordinator.issue(attributes, settings))
        .context("issuance failed")?;

    println!(
        "OK: issued credential (run {}, {} attempt(s))",
        report.run_id, report.attempts
    );
    println!("  Commitment:     {}", report.commitment);
    println!(
        "  Classification: {} ({})",
        report.classification,
        report.classification.describe()
    );

    match &args.out {
        Some(path) => {
            let payload = DisclosureCodec::to_json(&report.bundle)?;
            std::fs::write(path, payload)
                .with_context(|| format!("failed to write bundle: {}", path.display()))?;
            println!("  Bundle:         {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(0)
}

/// Parse `--reveal` values into settings.
pub fn privacy_settings(names: &[String]) -> Result<PrivacySettings> {
    let mut revealed = Vec::new();
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        match AttributeName::parse(name) {
            Some(attribute) => revealed.push(attribute),
            None => bail!(
                "unknown attribute \"{name}\" (expected name, rollNo, dob, phoneNo, branch)"
            ),
        }
    }
    Ok(PrivacySettings::revealing(revealed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_list_parses() {
        let settings = privacy_settings(&["name".into(), " branch ".into()]).unwrap();
        assert!(settings.is_revealed(AttributeName::Name));
        assert!(settings.is_revealed(AttributeName::Branch));
        assert!(!settings.is_revealed(AttributeName::RollNo));
        assert!(!settings.is_revealed(AttributeName::PhoneNo));
    }

    #[test]
    fn empty_reveal_conceals_everything() {
        let settings = privacy_settings(&[String::new()]).unwrap();
        assert_eq!(settings.revealed().count(), 0);
    }

    #[test]
    fn unknown_attribute_is_refused() {
        let err = privacy_settings(&["email".into()]).unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn issue_writes_a_decodable_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bundle.json");
        let args = IssueArgs {
            attributes: crate::testutil::write_jane(dir.path()),
            keys: crate::testutil::keys_dir().to_path_buf(),
            reveal: Some(vec!["name".into(), "rollNo".into()]),
            out: Some(out.clone()),
            rpc_url: Some(Url::parse("http://127.0.0.1:1").unwrap()),
        };
        assert_eq!(run_issue(&args).unwrap(), 0);

        let bundle = DisclosureCodec::decode(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(
            bundle.revealed_attributes(),
            vec![AttributeName::Name, AttributeName::RollNo]
        );
        assert_eq!(bundle.public_signals.len(), 1);
    }
}
