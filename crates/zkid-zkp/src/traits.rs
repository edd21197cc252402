//! # Proof System Trait (Sealed)
//!
//! The abstraction every proof backend implements. The trait is sealed:
//! only implementations defined in `zkid-zkp` can exist, so no other crate
//! can slip an alternative verifier into the lifecycle.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use zkid_core::ErrorClass;

/// Error during proof generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// The circuit inputs are invalid or missing.
    #[error("invalid circuit inputs: {0}")]
    InvalidInputs(String),
    /// The witness does not satisfy the circuit (e.g. an attribute is out of
    /// range).
    #[error("witness violates circuit constraints: {0}")]
    ConstraintViolation(String),
    /// No proving key is loaded.
    #[error("proving key unavailable: {0}")]
    KeysUnavailable(String),
    /// Proof generation failed internally.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

impl ProofError {
    /// Always [`ErrorClass::ProofGeneration`].
    pub fn class(&self) -> ErrorClass {
        ErrorClass::ProofGeneration
    }

    /// Whether proving the same input again could succeed. Bad inputs and
    /// unsatisfied constraints fail identically every time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::KeysUnavailable(_) | Self::GenerationFailed(_))
    }
}

/// Error during proof verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The proof is structurally malformed: wrong arity, non-canonical or
    /// unparseable coordinates, points off the curve, wrong signal count.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// The verification routine itself failed.
    #[error("proof verification failed: {0}")]
    VerificationFailed(String),
}

/// Private module that seals the [`ProofSystem`] trait.
mod private {
    /// Sealing marker trait. Not accessible outside `zkid-zkp`.
    pub trait Sealed {}
}

/// Sealed trait defining the interface for a zero-knowledge proof system.
///
/// `Proof` carries its own public signals, so `verify` needs nothing but the
/// key and the proof. `Send + Sync` lets the lifecycle share one instance
/// across concurrent runs.
pub trait ProofSystem: private::Sealed + Send + Sync {
    /// The proof type produced by this system.
    type Proof: Serialize + DeserializeOwned + Clone + std::fmt::Debug;
    /// The verifying key type.
    type VerifyingKey: Clone;
    /// The proving key type.
    type ProvingKey;
    /// The witness the circuit is instantiated with.
    type Circuit: Clone;

    /// Generate a proof that the prover knows a witness satisfying the
    /// circuit.
    ///
    /// # Errors
    ///
    /// Returns [`ProofError::ConstraintViolation`] if the witness does not
    /// satisfy the circuit, [`ProofError::GenerationFailed`] if proving
    /// fails.
    fn prove(&self, pk: &Self::ProvingKey, circuit: &Self::Circuit)
        -> Result<Self::Proof, ProofError>;

    /// Verify a proof against the public signals it carries.
    ///
    /// `Ok(true)` if valid, `Ok(false)` if well-formed but cryptographically
    /// invalid.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::MalformedProof`] if the proof cannot be
    /// decoded.
    fn verify(&self, vk: &Self::VerifyingKey, proof: &Self::Proof) -> Result<bool, VerifyError>;
}

impl private::Sealed for crate::groth16::Groth16ProofSystem {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_error_display() {
        let err = ProofError::ConstraintViolation("phoneNo range".into());
        assert!(err.to_string().contains("phoneNo range"));
        assert_eq!(err.class(), ErrorClass::ProofGeneration);
    }

    #[test]
    fn only_transient_generation_failures_are_retryable() {
        assert!(!ProofError::ConstraintViolation("phoneNo range".into()).is_retryable());
        assert!(!ProofError::InvalidInputs("missing commitment".into()).is_retryable());
        assert!(ProofError::KeysUnavailable("no key".into()).is_retryable());
        assert!(ProofError::GenerationFailed("worker panicked".into()).is_retryable());
    }

    #[test]
    fn verify_error_display() {
        let err = VerifyError::MalformedProof("pi_a has 1 coordinate".into());
        assert!(err.to_string().starts_with("malformed proof"));
    }
}
