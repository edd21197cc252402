//! # zkid-cli — Command-Line Tool
//!
//! The `zkid` binary covers the offline half of the system and lets an
//! operator run either lifecycle without the HTTP service:
//!
//! ```bash
//! zkid setup --out keys/
//! zkid commit attributes.json
//! zkid issue attributes.json --keys keys/ --reveal name,rollNo,branch --out bundle.json
//! zkid verify bundle.json --keys keys/
//! ```
//!
//! Ledger settings come from the same `ZKID_RPC_*` and
//! `ZKID_VERIFIER_ADDRESS` variables the service reads; `--rpc-url`
//! overrides the endpoint.

pub mod commit;
pub mod issue;
pub mod setup;
pub mod verify;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use url::Url;
use zkid_core::{AttributeSet, RawAttributes};
use zkid_ledger::{LedgerConfig, OnChainVerifier};
use zkid_lifecycle::{
    CoordinatorConfig, DualPathVerifier, OffChainVerifier, ProofLifecycleCoordinator,
    VerificationPath,
};
use zkid_zkp::{KeyPair, ProofGenerator};

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Read an attributes file, reporting every invalid attribute.
pub fn read_attributes(path: &Path) -> Result<AttributeSet> {
    let raw: RawAttributes = serde_json::from_value(read_json(path)?)
        .with_context(|| format!("{} is not an attribute record", path.display()))?;
    let problems = raw.validate_all();
    if !problems.is_empty() {
        let listed: Vec<String> = problems.iter().map(ToString::to_string).collect();
        bail!("invalid attributes in {}:\n  {}", path.display(), listed.join("\n  "));
    }
    Ok(raw.validate()?)
}

/// Ledger configuration from the environment, with an optional endpoint
/// override.
pub fn ledger_config(rpc_url: Option<&Url>) -> Result<LedgerConfig> {
    let mut config = LedgerConfig::from_env().context("invalid ledger configuration")?;
    if let Some(url) = rpc_url {
        config.rpc_url = url.clone();
    }
    Ok(config)
}

/// A coordinator backed by the keys in `keys_dir` and the service's ledger
/// path.
pub fn coordinator(keys_dir: &Path, ledger: &LedgerConfig) -> Result<ProofLifecycleCoordinator> {
    let keys = KeyPair::load(keys_dir)
        .with_context(|| format!("failed to load keys from {}", keys_dir.display()))?;
    let on_chain = OnChainVerifier::new(ledger).context("failed to build ledger client")?;
    let verifier = DualPathVerifier::new(
        Arc::new(OffChainVerifier::new(Arc::new(keys.verifying))),
        VerificationPath::OnChain(Arc::new(on_chain)),
    );
    Ok(ProofLifecycleCoordinator::new(
        ProofGenerator::new(Arc::new(keys.proving)),
        verifier,
        CoordinatorConfig::default(),
    ))
}

/// A current-thread runtime for one command's lifecycle calls. Proving and
/// pairing checks still run on its blocking pool.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::path::{Path, PathBuf};
    use std::sync::OnceLock;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use zkid_zkp::KeyPair;

    /// Keys written once per test binary.
    pub fn keys_dir() -> &'static Path {
        static DIR: OnceLock<(tempfile::TempDir, PathBuf)> = OnceLock::new();
        &DIR.get_or_init(|| {
            let dir = tempfile::tempdir().unwrap();
            KeyPair::generate(&mut StdRng::seed_from_u64(5))
                .unwrap()
                .save(dir.path())
                .unwrap();
            let path = dir.path().to_path_buf();
            (dir, path)
        })
        .1
    }

    pub fn write_jane(dir: &Path) -> PathBuf {
        let path = dir.join("attributes.json");
        std::fs::write(
            &path,
            r#"{"name":"Jane Doe","rollNo":"22BCS01","dob":"01012000","phoneNo":"9876543210","branch":"CSE"}"#,
        )
        .unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_valid_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let path = testutil::write_jane(dir.path());
        let attrs = read_attributes(&path).unwrap();
        assert_eq!(attrs.name.as_str(), "Jane Doe");
    }

    #[test]
    fn lists_every_invalid_attribute() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"name":"J","rollNo":"22BCS01","dob":"31022000","phoneNo":"9876543210","branch":"XYZ"}"#,
        )
        .unwrap();
        let err = read_attributes(&path).unwrap_err().to_string();
        assert!(err.contains("invalid name"));
        assert!(err.contains("invalid date of birth"));
        assert!(err.contains("invalid branch"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_json(Path::new("/nonexistent/attributes.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn runtime_is_current_thread_with_a_blocking_pool() {
        let rt = runtime().unwrap();
        assert_eq!(
            rt.handle().runtime_flavor(),
            tokio::runtime::RuntimeFlavor::CurrentThread
        );
        let sum = rt.block_on(async { tokio::task::spawn_blocking(|| 2 + 2).await.unwrap() });
        assert_eq!(sum, 4);
    }

    #[test]
    fn missing_keys_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = ledger_config(None).unwrap();
        let err = coordinator(dir.path(), &config).unwrap_err();
        assert!(err.to_string().contains("failed to load keys"));
    }
}
