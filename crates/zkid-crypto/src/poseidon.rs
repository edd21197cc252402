//! # Poseidon over BN254
//!
//! One parameter set serves every Poseidon evaluation in the system: hashing
//! attribute strings, computing the commitment natively when building a
//! witness, and constraining the commitment inside the circuit. The native
//! and in-circuit functions here share [`poseidon_config`], so a witness built
//! natively always satisfies the gadget.
//!
//! ## Parameters
//!
//! | Parameter      | Value |
//! |----------------|-------|
//! | field          | BN254 `Fr` |
//! | width          | 6 (rate 5, capacity 1) |
//! | S-box          | x^5 |
//! | full rounds    | 8 |
//! | partial rounds | 60 |
//!
//! Round constants and the MDS matrix come from the Grain LFSR procedure
//! (`find_poseidon_ark_and_mds`), so they are reproducible from the
//! parameters alone.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::constraints::CryptographicSpongeVar;
use ark_crypto_primitives::sponge::poseidon::constraints::PoseidonSpongeVar;
use ark_crypto_primitives::sponge::poseidon::{
    find_poseidon_ark_and_mds, PoseidonConfig, PoseidonSponge,
};
use ark_crypto_primitives::sponge::CryptographicSponge;
use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

/// Sponge rate. Five attributes absorb in a single permutation.
pub const RATE: usize = 5;
/// Sponge capacity.
pub const CAPACITY: usize = 1;
/// Full S-box rounds.
pub const FULL_ROUNDS: usize = 8;
/// Partial S-box rounds.
pub const PARTIAL_ROUNDS: usize = 60;
/// S-box exponent.
pub const ALPHA: u64 = 5;

/// The pinned Poseidon parameters.
pub fn poseidon_config() -> &'static PoseidonConfig<Fr> {
    static CONFIG: OnceLock<PoseidonConfig<Fr>> = OnceLock::new();
    CONFIG.get_or_init(|| {
        let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
            u64::from(Fr::MODULUS_BIT_SIZE),
            RATE,
            FULL_ROUNDS as u64,
            PARTIAL_ROUNDS as u64,
            0,
        );
        PoseidonConfig::new(FULL_ROUNDS, PARTIAL_ROUNDS, ALPHA, mds, ark, RATE, CAPACITY)
    })
}

/// Hash a sequence of field elements to one element.
pub fn hash_elements(inputs: &[Fr]) -> Fr {
    let mut sponge = PoseidonSponge::new(poseidon_config());
    for x in inputs {
        sponge.absorb(x);
    }
    let out: Vec<Fr> = sponge.squeeze_field_elements(1);
    out[0]
}

/// In-circuit counterpart of [`hash_elements`].
pub fn hash_elements_var(
    cs: ConstraintSystemRef<Fr>,
    inputs: &[FpVar<Fr>],
) -> Result<FpVar<Fr>, SynthesisError> {
    let mut sponge = PoseidonSpongeVar::new(cs, poseidon_config());
    for x in inputs {
        sponge.absorb(x)?;
    }
    let mut out = sponge.squeeze_field_elements(1)?;
    out.pop().ok_or(SynthesisError::Unsatisfiable)
}
