//! # Commit Subcommand
//!
//! Prints the circuit input and public commitment for an attribute file,
//! without proving anything.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::json;
use zkid_crypto::{to_field_element, CommitmentHasher, HashScheme};

/// Arguments for `zkid commit`.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Attribute file: `name`, `rollNo`, `dob`, `phoneNo`, `branch`.
    #[arg(value_name = "FILE")]
    pub attributes: PathBuf,

    /// String hash scheme: `poseidon` or `sha256`.
    #[arg(long, default_value = "poseidon")]
    pub scheme: HashScheme,
}

/// Execute `zkid commit`.
pub fn run_commit(args: &CommitArgs) -> Result<u8> {
    let attributes = crate::read_attributes(&args.attributes)?;
    let output = commitment_json(&attributes, args.scheme);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(0)
}

fn commitment_json(attributes: &zkid_core::AttributeSet, scheme: HashScheme) -> serde_json::Value {
    let input = CommitmentHasher::new(scheme).circuit_input(attributes);
    json!({
        "scheme": scheme.as_str(),
        "circuitInput": input,
        "commitment": to_field_element(&input.commitment()),
    })
}
