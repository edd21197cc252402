//! # Proof Generator
//!
//! Binds a loaded proving key to the Groth16 backend. CPU-bound and free of
//! I/O; callers on an async runtime should run [`ProofGenerator::generate`]
//! on a blocking worker.

use std::sync::Arc;

use zkid_core::ProofArtifact;
use zkid_crypto::CircuitInput;

use crate::groth16::{Groth16ProofSystem, IdentityProvingKey};
use crate::traits::{ProofError, ProofSystem};

/// Produces proofs for circuit inputs.
#[derive(Debug, Clone)]
pub struct ProofGenerator {
    system: Groth16ProofSystem,
    pk: Option<Arc<IdentityProvingKey>>,
}

impl ProofGenerator {
    /// A generator backed by `pk`.
    pub fn new(pk: Arc<IdentityProvingKey>) -> Self {
        Self {
            system: Groth16ProofSystem,
            pk: Some(pk),
        }
    }

    /// A generator with no proving key. Every call fails with
    /// [`ProofError::KeysUnavailable`].
    pub fn unavailable() -> Self {
        Self {
            system: Groth16ProofSystem,
            pk: None,
        }
    }

    /// Whether a proving key is loaded.
    pub fn is_ready(&self) -> bool {
        self.pk.is_some()
    }

    /// Prove knowledge of `input`.
    pub fn generate(&self, input: &CircuitInput) -> Result<ProofArtifact, ProofError> {
        let pk = self
            .pk
            .as_ref()
            .ok_or_else(|| ProofError::KeysUnavailable("no proving key loaded".to_string()))?;
        let started = std::time::Instant::now();
        let artifact = self.system.prove(pk, input)?;
        tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "proof generated");
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groth16::tests::{jane_input, keys};

    #[test]
    fn generates_with_loaded_key() {
        let generator = ProofGenerator::new(Arc::new(keys().0.clone()));
        assert!(generator.is_ready());
        let artifact = generator.generate(&jane_input()).unwrap();
        assert!(Groth16ProofSystem::verify_artifact(&keys().1, &artifact).unwrap());
    }

    #[test]
    fn missing_key_is_reported() {
        let generator = ProofGenerator::unavailable();
        assert!(!generator.is_ready());
        assert!(matches!(
            generator.generate(&jane_input()),
            Err(ProofError::KeysUnavailable(_))
        ));
    }
}
