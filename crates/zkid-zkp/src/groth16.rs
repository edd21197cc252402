//! # Groth16 Backend (arkworks, BN254)
//!
//! [`Groth16ProofSystem`] is the only [`ProofSystem`] implementation. It
//! proves [`IdentityCircuit`] statements and verifies snarkjs-layout
//! [`ProofArtifact`]s.
//!
//! ## Proving
//!
//! The Groth16 prover does not check that the witness satisfies the
//! circuit; an unsatisfied witness silently yields a proof that never
//! verifies. The witness is therefore synthesized and checked first, and an
//! unsatisfied constraint surfaces as [`ProofError::ConstraintViolation`].
//!
//! Proofs are randomized: proving the same input twice yields two different
//! encodings, both valid for the same public signals.
//!
//! ## Verification
//!
//! Verification fails closed. Anything that cannot be decoded into curve
//! points and canonical scalars is a [`VerifyError::MalformedProof`], and the
//! public-signal count must match the verification key exactly.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, PreparedVerifyingKey, ProvingKey, VerifyingKey};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_snark::SNARK;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zkid_core::ProofArtifact;
use zkid_crypto::{to_field_element, CircuitInput};

use crate::circuit::IdentityCircuit;
use crate::encoding::{proof_from_wire, proof_to_wire, public_signals_from_wire};
use crate::traits::{ProofError, ProofSystem, VerifyError};

/// Groth16 proving key for the identity circuit.
#[derive(Clone)]
pub struct IdentityProvingKey(pub(crate) ProvingKey<Bn254>);

impl IdentityProvingKey {
    /// Access the arkworks key.
    pub fn inner(&self) -> &ProvingKey<Bn254> {
        &self.0
    }

    /// The verifying key embedded in the proving key.
    pub fn verifying_key(&self) -> Result<IdentityVerifyingKey, VerifyError> {
        IdentityVerifyingKey::new(self.0.vk.clone())
    }
}

impl std::fmt::Debug for IdentityProvingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityProvingKey")
            .field("a_query_len", &self.0.a_query.len())
            .finish_non_exhaustive()
    }
}

/// Groth16 verifying key, kept alongside its pairing-prepared form.
#[derive(Clone)]
pub struct IdentityVerifyingKey {
    vk: VerifyingKey<Bn254>,
    pvk: PreparedVerifyingKey<Bn254>,
}

impl IdentityVerifyingKey {
    /// Prepare a verifying key.
    pub fn new(vk: VerifyingKey<Bn254>) -> Result<Self, VerifyError> {
        let pvk = Groth16::<Bn254>::process_vk(&vk)
            .map_err(|e| VerifyError::VerificationFailed(format!("preparing verifying key: {e}")))?;
        Ok(Self { vk, pvk })
    }

    /// Access the arkworks key.
    pub fn inner(&self) -> &VerifyingKey<Bn254> {
        &self.vk
    }

    /// Number of public signals a proof must carry.
    pub fn public_input_count(&self) -> usize {
        self.vk.gamma_abc_g1.len().saturating_sub(1)
    }
}

impl std::fmt::Debug for IdentityVerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifyingKey")
            .field("public_inputs", &self.public_input_count())
            .finish_non_exhaustive()
    }
}

/// Groth16 over BN254.
#[derive(Debug, Clone, Copy, Default)]
pub struct Groth16ProofSystem;

impl Groth16ProofSystem {
    /// Circuit-specific setup. Whoever runs this learns the toxic waste, so
    /// production keys come from an offline ceremony, not from a service.
    pub fn setup<R: RngCore + CryptoRng>(
        rng: &mut R,
    ) -> Result<(IdentityProvingKey, IdentityVerifyingKey), ProofError> {
        let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(IdentityCircuit::blank(), rng)
            .map_err(|e| ProofError::GenerationFailed(format!("setup: {e}")))?;
        let vk = IdentityVerifyingKey::new(vk)
            .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;
        Ok((IdentityProvingKey(pk), vk))
    }

    /// Synthesize the witness and check every constraint.
    pub fn check_witness(circuit: IdentityCircuit) -> Result<(), ProofError> {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit
            .generate_constraints(cs.clone())
            .map_err(|e| ProofError::InvalidInputs(e.to_string()))?;
        let satisfied = cs
            .is_satisfied()
            .map_err(|e| ProofError::InvalidInputs(e.to_string()))?;
        if !satisfied {
            let which = cs
                .which_is_unsatisfied()
                .ok()
                .flatten()
                .unwrap_or_else(|| "unknown constraint".to_string());
            return Err(ProofError::ConstraintViolation(which));
        }
        Ok(())
    }

    /// Prove with caller-supplied randomness.
    pub fn prove_with_rng<R: RngCore + CryptoRng>(
        pk: &IdentityProvingKey,
        input: &CircuitInput,
        rng: &mut R,
    ) -> Result<ProofArtifact, ProofError> {
        let circuit = IdentityCircuit::new(*input);
        Self::check_witness(circuit)?;
        let commitment = circuit
            .commitment()
            .ok_or_else(|| ProofError::InvalidInputs("missing commitment".to_string()))?;

        let proof = Groth16::<Bn254>::prove(&pk.0, circuit, rng)
            .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;

        Ok(ProofArtifact {
            proof: proof_to_wire(&proof),
            public_signals: vec![to_field_element(&commitment)],
        })
    }

    /// Verify an artifact. See the module docs for what counts as malformed.
    pub fn verify_artifact(
        vk: &IdentityVerifyingKey,
        artifact: &ProofArtifact,
    ) -> Result<bool, VerifyError> {
        let expected = vk.public_input_count();
        if artifact.public_signals.len() != expected {
            return Err(VerifyError::MalformedProof(format!(
                "expected {expected} public signal(s), got {}",
                artifact.public_signals.len()
            )));
        }
        let proof = proof_from_wire(&artifact.proof)?;
        let inputs = public_signals_from_wire(&artifact.public_signals)?;
        Groth16::<Bn254>::verify_with_processed_vk(&vk.pvk, &inputs, &proof)
            .map_err(|e| VerifyError::VerificationFailed(e.to_string()))
    }
}

impl ProofSystem for Groth16ProofSystem {
    type Proof = ProofArtifact;
    type VerifyingKey = IdentityVerifyingKey;
    type ProvingKey = IdentityProvingKey;
    type Circuit = CircuitInput;

    fn prove(
        &self,
        pk: &Self::ProvingKey,
        circuit: &Self::Circuit,
    ) -> Result<Self::Proof, ProofError> {
        Self::prove_with_rng(pk, circuit, &mut OsRng)
    }

    fn verify(&self, vk: &Self::VerifyingKey, proof: &Self::Proof) -> Result<bool, VerifyError> {
        Self::verify_artifact(vk, proof)
    }
}
