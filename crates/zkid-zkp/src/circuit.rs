//! # Identity Commitment Circuit
//!
//! R1CS statement: "I know `(name, rollNo, dob, phoneNo, branch)` such that
//! `Poseidon(name, rollNo, dob, phoneNo, branch) == commitment`, with `dob`
//! below 2^25 and `phoneNo` below 2^34."
//!
//! The five attributes are private witnesses; `commitment` is the only
//! public input. The range checks keep a prover from substituting an
//! arbitrary field element for a numeric attribute.

use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::ToBitsGadget;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use zkid_crypto::poseidon::hash_elements_var;
use zkid_crypto::{CircuitInput, DOB_BITS, PHONE_BITS};

/// Number of public inputs the circuit exposes.
pub const PUBLIC_INPUTS: usize = 1;

/// The identity circuit, optionally carrying a witness.
///
/// [`IdentityCircuit::blank`] is used for key generation, where only the
/// constraint shape matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCircuit {
    input: Option<CircuitInput>,
    commitment: Option<Fr>,
}

impl IdentityCircuit {
    /// A circuit without witness values, for setup.
    pub fn blank() -> Self {
        Self::default()
    }

    /// A circuit for proving knowledge of `input`. The public commitment is
    /// computed natively with the same Poseidon instance the circuit uses.
    pub fn new(input: CircuitInput) -> Self {
        Self {
            input: Some(input),
            commitment: Some(input.commitment()),
        }
    }

    /// Override the public commitment. Produces an unsatisfiable circuit
    /// unless it equals the witness commitment.
    pub fn with_commitment(mut self, commitment: Fr) -> Self {
        self.commitment = Some(commitment);
        self
    }

    /// The public commitment, when a witness is present.
    pub fn commitment(&self) -> Option<Fr> {
        self.commitment
    }
}

impl ConstraintSynthesizer<Fr> for IdentityCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let commitment = FpVar::new_input(cs.clone(), || {
            self.commitment.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let values = self.input.map(|input| input.as_field_elements());
        let mut attributes = Vec::with_capacity(5);
        for idx in 0..5 {
            attributes.push(FpVar::new_witness(cs.clone(), || {
                values
                    .map(|v| v[idx])
                    .ok_or(SynthesisError::AssignmentMissing)
            })?);
        }

        enforce_bit_width(&attributes[2], DOB_BITS)?;
        enforce_bit_width(&attributes[3], PHONE_BITS)?;

        let digest = hash_elements_var(cs, &attributes)?;
        digest.enforce_equal(&commitment)
    }
}

/// Constrain `var` to fit in `bits` bits.
fn enforce_bit_width(var: &FpVar<Fr>, bits: usize) -> Result<(), SynthesisError> {
    let decomposition = var.to_bits_le()?;
    Boolean::kary_or(&decomposition[bits..])?.enforce_equal(&Boolean::constant(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_relations::r1cs::ConstraintSystem;
    use zkid_core::RawAttributes;
    use zkid_crypto::CommitmentHasher;

    fn jane_input() -> CircuitInput {
        let attrs = RawAttributes {
            name: "Jane Doe".into(),
            roll_no: "22BCS01".into(),
            dob: "01012000".into(),
            phone_no: "9876543210".into(),
            branch: "CSE".into(),
        }
        .validate()
        .unwrap();
        CommitmentHasher::default().circuit_input(&attrs)
    }

    fn satisfied(circuit: IdentityCircuit) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn valid_witness_satisfies() {
        assert!(satisfied(IdentityCircuit::new(jane_input())));
    }

    #[test]
    fn exposes_one_public_input() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        IdentityCircuit::new(jane_input())
            .generate_constraints(cs.clone())
            .unwrap();
        // The constant "one" is also an instance variable.
        assert_eq!(cs.num_instance_variables(), PUBLIC_INPUTS + 1);
    }

    #[test]
    fn wrong_commitment_is_unsatisfied() {
        let circuit = IdentityCircuit::new(jane_input()).with_commitment(Fr::from(7u64));
        assert!(!satisfied(circuit));
    }

    #[test]
    fn phone_out_of_range_is_unsatisfied() {
        let mut input = jane_input();
        input.phone_no = 1u64 << PHONE_BITS;
        assert!(!satisfied(IdentityCircuit::new(input)));
        input.phone_no = (1u64 << PHONE_BITS) - 1;
        assert!(satisfied(IdentityCircuit::new(input)));
    }

    #[test]
    fn dob_out_of_range_is_unsatisfied() {
        let mut input = jane_input();
        input.dob = 1u64 << DOB_BITS;
        assert!(!satisfied(IdentityCircuit::new(input)));
    }

    #[test]
    fn blank_circuit_has_no_commitment() {
        assert!(IdentityCircuit::blank().commitment().is_none());
    }
}
