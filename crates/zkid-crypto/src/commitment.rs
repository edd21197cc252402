//! # Commitment Hashing
//!
//! Turns a validated [`AttributeSet`] into the circuit's input and computes
//! the public commitment the proof binds to.
//!
//! String attributes (`name`, `rollNo`, `branch`) are hashed to scalar-field
//! elements; numeric attributes (`dob`, `phoneNo`) pass through as integers.
//! The commitment is `Poseidon(name, rollNo, dob, phoneNo, branch)` with the
//! parameters pinned in [`crate::poseidon`].
//!
//! ## Schemes
//!
//! [`HashScheme::Poseidon`] packs UTF-8 bytes into 31-byte limbs and hashes
//! them with the same Poseidon instance as the commitment.
//! [`HashScheme::Sha256Reduced`] takes SHA-256 of the UTF-8 bytes reduced
//! modulo `Fr`, for clients that pre-hash that way. The scheme only affects
//! the string-to-field step. A holder and verifier using different schemes
//! get different commitments, and nothing detects it until a proof is
//! checked against an expected commitment.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zkid_core::{AttributeSet, FieldElement};

use crate::error::CryptoError;
use crate::field::{fr_from_element, to_field_element};
use crate::poseidon::hash_elements;

/// Bits the circuit allows for `dob`. `31129999 < 2^25`.
pub const DOB_BITS: usize = 25;

/// Bits the circuit allows for `phoneNo`. `9999999999 < 2^34`.
pub const PHONE_BITS: usize = 34;

/// Bytes per limb when packing strings. 31 bytes always fit below the
/// 254-bit modulus.
const LIMB_BYTES: usize = 31;

/// Leading element that separates string hashes from commitments.
const STRING_DOMAIN_TAG: u64 = 0x7a6b_6964_7374_72; // "zkidstr"

/// String-to-field hashing scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashScheme {
    /// Poseidon over 31-byte limbs.
    #[default]
    Poseidon,
    /// SHA-256 reduced modulo the scalar field.
    Sha256Reduced,
}

impl HashScheme {
    /// Configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poseidon => "poseidon",
            Self::Sha256Reduced => "sha256",
        }
    }
}

impl std::str::FromStr for HashScheme {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poseidon" => Ok(Self::Poseidon),
            "sha256" | "sha256_reduced" | "sha256-reduced" => Ok(Self::Sha256Reduced),
            _ => Err(CryptoError::UnknownScheme(s.to_string())),
        }
    }
}

impl std::fmt::Display for HashScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic attribute hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitmentHasher {
    scheme: HashScheme,
}

impl CommitmentHasher {
    /// A hasher using `scheme` for string attributes.
    pub fn new(scheme: HashScheme) -> Self {
        Self { scheme }
    }

    /// The configured scheme.
    pub fn scheme(&self) -> HashScheme {
        self.scheme
    }

    /// Hash a string attribute to a scalar-field element.
    pub fn hash(&self, value: &str) -> Fr {
        match self.scheme {
            HashScheme::Poseidon => poseidon_string(value),
            HashScheme::Sha256Reduced => Fr::from_be_bytes_mod_order(&Sha256::digest(value.as_bytes())),
        }
    }

    /// Build the circuit input for an attribute set.
    pub fn circuit_input(&self, attributes: &AttributeSet) -> CircuitInput {
        CircuitInput {
            name: self.hash(attributes.name.as_str()),
            roll_no: self.hash(attributes.roll_no.as_str()),
            dob: attributes.dob.as_u64(),
            phone_no: attributes.phone_no.as_u64(),
            branch: self.hash(attributes.branch.as_str()),
        }
    }

    /// Recompute the public commitment for an attribute set.
    pub fn commitment(&self, attributes: &AttributeSet) -> Fr {
        self.circuit_input(attributes).commitment()
    }
}

fn poseidon_string(value: &str) -> Fr {
    let bytes = value.as_bytes();
    let mut elements = Vec::with_capacity(2 + bytes.len().div_ceil(LIMB_BYTES));
    elements.push(Fr::from(STRING_DOMAIN_TAG));
    elements.push(Fr::from(bytes.len() as u64));
    elements.extend(bytes.chunks(LIMB_BYTES).map(Fr::from_be_bytes_mod_order));
    hash_elements(&elements)
}

/// Attribute set transformed for the proving circuit.
///
/// Serialized in the shape clients submit to `generate-proof`: hashed string
/// attributes as decimal strings, `dob` and `phoneNo` as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CircuitInputWire", into = "CircuitInputWire")]
pub struct CircuitInput {
    /// Hash of the name.
    pub name: Fr,
    /// Hash of the roll number.
    pub roll_no: Fr,
    /// Date of birth as `ddmmyyyy` integer.
    pub dob: u64,
    /// Ten-digit phone number as integer.
    pub phone_no: u64,
    /// Hash of the branch code.
    pub branch: Fr,
}

impl CircuitInput {
    /// The five witness values in circuit order.
    pub fn as_field_elements(&self) -> [Fr; 5] {
        [
            self.name,
            self.roll_no,
            Fr::from(self.dob),
            Fr::from(self.phone_no),
            self.branch,
        ]
    }

    /// `Poseidon(name, rollNo, dob, phoneNo, branch)`.
    pub fn commitment(&self) -> Fr {
        hash_elements(&self.as_field_elements())
    }

    /// Whether the numeric attributes fit the circuit's range checks.
    pub fn within_bounds(&self) -> bool {
        self.dob < (1u64 << DOB_BITS) && self.phone_no < (1u64 << PHONE_BITS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CircuitInputWire {
    name: FieldElement,
    roll_no: FieldElement,
    dob: Integer,
    phone_no: Integer,
    branch: FieldElement,
}

/// JSON integer or a decimal string holding one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Integer {
    Number(u64),
    Text(String),
}

impl Integer {
    fn value(&self, field: &str) -> Result<u64, String> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .parse()
                .map_err(|_| format!("{field} must be a non-negative integer, got \"{s}\"")),
        }
    }
}

impl TryFrom<CircuitInputWire> for CircuitInput {
    type Error = String;

    fn try_from(wire: CircuitInputWire) -> Result<Self, Self::Error> {
        Ok(Self {
            name: fr_from_element(&wire.name).map_err(|e| format!("name: {e}"))?,
            roll_no: fr_from_element(&wire.roll_no).map_err(|e| format!("rollNo: {e}"))?,
            dob: wire.dob.value("dob")?,
            phone_no: wire.phone_no.value("phoneNo")?,
            branch: fr_from_element(&wire.branch).map_err(|e| format!("branch: {e}"))?,
        })
    }
}

impl From<CircuitInput> for CircuitInputWire {
    fn from(input: CircuitInput) -> Self {
        Self {
            name: to_field_element(&input.name),
            roll_no: to_field_element(&input.roll_no),
            dob: Integer::Number(input.dob),
            phone_no: Integer::Number(input.phone_no),
            branch: to_field_element(&input.branch),
        }
    }
}
