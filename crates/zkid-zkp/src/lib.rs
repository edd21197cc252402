//! # zkid-zkp — Zero-Knowledge Proof System
//!
//! Trait-based proof system abstraction with a single real backend:
//! Groth16 over BN254 via arkworks.
//!
//! ## Architecture
//!
//! - [`ProofSystem`] (sealed) defines `prove` / `verify`.
//! - [`IdentityCircuit`] is the statement: knowledge of five attributes whose
//!   Poseidon hash equals the public commitment, with range-checked numeric
//!   attributes.
//! - [`Groth16ProofSystem`] implements the trait; [`ProofGenerator`] binds
//!   it to a loaded proving key.
//! - [`encoding`] converts to and from the snarkjs JSON layout, so proofs
//!   interoperate with Solidity verifiers generated from the same keys.
//! - [`keys`] writes and loads key files for the offline setup pipeline.

pub mod circuit;
pub mod encoding;
pub mod groth16;
pub mod keys;
pub mod prover;
pub mod traits;

// Re-export primary types.
pub use circuit::IdentityCircuit;
pub use groth16::{Groth16ProofSystem, IdentityProvingKey, IdentityVerifyingKey};
pub use keys::{KeyError, KeyPair};
pub use prover::ProofGenerator;
pub use traits::{ProofError, ProofSystem, VerifyError};
