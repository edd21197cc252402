//! # Setup Subcommand
//!
//! Circuit-specific Groth16 key generation. Run once, offline; the service
//! and the verifier contract generator both consume its output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rand::rngs::{OsRng, StdRng};
use rand::SeedableRng;
use zkid_zkp::keys::{PROVING_KEY_FILE, VERIFICATION_KEY_JSON, VERIFYING_KEY_FILE};
use zkid_zkp::KeyPair;

/// Arguments for `zkid setup`.
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Directory to write the key files into.
    #[arg(long, short, default_value = "keys")]
    pub out: PathBuf,

    /// Seed the setup randomness. Reproducible keys are for testing only:
    /// anyone who knows the seed can forge proofs.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Execute `zkid setup`.
pub fn run_setup(args: &SetupArgs) -> Result<u8> {
    let keys = match args.seed {
        Some(seed) => {
            tracing::warn!(seed, "generating keys from a fixed seed");
            KeyPair::generate(&mut StdRng::seed_from_u64(seed))
        }
        None => KeyPair::generate(&mut OsRng),
    }
    .context("key generation failed")?;

    keys.save(&args.out)
        .with_context(|| format!("failed to write keys to {}", args.out.display()))?;

    print_written(&args.out);
    Ok(0)
}

fn print_written(dir: &Path) {
    println!("OK: generated identity circuit keys");
    for file in [PROVING_KEY_FILE, VERIFYING_KEY_FILE, VERIFICATION_KEY_JSON] {
        println!("  {}", dir.join(file).display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_writes_loadable_keys() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("keys");
        let code = run_setup(&SetupArgs {
            out: out.clone(),
            seed: Some(3),
        })
        .unwrap();
        assert_eq!(code, 0);
        assert!(out.join(VERIFICATION_KEY_JSON).exists());
        assert!(KeyPair::load(&out).is_ok());
    }
}
