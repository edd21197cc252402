//! # zkid-crypto — Field and Hash Primitives
//!
//! This crate provides the cryptographic building blocks shared by the prover,
//! the verifiers, and the credential codec:
//!
//! - **Field parsing** ([`field`]) between wire strings and BN254 field
//!   elements, rejecting non-canonical values.
//! - **Poseidon** ([`poseidon`]) over the BN254 scalar field: one pinned
//!   parameter set used natively and inside the circuit.
//! - **Commitment hashing** ([`commitment`]): attribute strings to field
//!   elements, [`CircuitInput`] construction, and the public commitment.

pub mod commitment;
pub mod error;
pub mod field;
pub mod poseidon;

pub use commitment::{CircuitInput, CommitmentHasher, HashScheme, DOB_BITS, PHONE_BITS};
pub use error::CryptoError;
pub use field::{fq_from_element, fr_from_element, to_decimal, to_field_element};
pub use poseidon::{hash_elements, poseidon_config};
