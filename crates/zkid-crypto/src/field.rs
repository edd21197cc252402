//! # Field Element Parsing
//!
//! Conversion between wire strings ([`FieldElement`]) and BN254 field
//! elements. Proof coordinates live in the base field `Fq`; public signals
//! live in the scalar field `Fr`.
//!
//! Parsing is strict: decimal digits or `0x`-prefixed hex, no sign, no
//! whitespace, and the value must be strictly below the modulus. Reducing an
//! out-of-range value would let two different strings verify as the same
//! signal, so such values are rejected.

use ark_bn254::{Fq, Fr};
use ark_ff::PrimeField;
use num_bigint::BigUint;
use zkid_core::FieldElement;

use crate::error::CryptoError;

/// Parse an unsigned integer from a decimal or `0x`-hex string.
pub fn parse_biguint(s: &str) -> Result<BigUint, CryptoError> {
    let invalid = |reason| CryptoError::InvalidFieldElement {
        value: s.to_string(),
        reason,
    };

    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    if digits.is_empty() {
        return Err(invalid("empty"));
    }
    let well_formed = if radix == 16 {
        digits.chars().all(|c| c.is_ascii_hexdigit())
    } else {
        digits.chars().all(|c| c.is_ascii_digit())
    };
    if !well_formed {
        return Err(invalid(if radix == 16 {
            "not a hex integer"
        } else {
            "not a decimal integer"
        }));
    }
    BigUint::parse_bytes(digits.as_bytes(), radix).ok_or_else(|| invalid("unparseable integer"))
}

/// Parse a canonical element of any prime field.
pub fn parse_canonical<F: PrimeField>(s: &str) -> Result<F, CryptoError> {
    let value = parse_biguint(s)?;
    let modulus: BigUint = F::MODULUS.into();
    if value >= modulus {
        return Err(CryptoError::NonCanonical(s.to_string()));
    }
    Ok(F::from(value))
}

/// Parse a scalar-field element (public signals, attribute hashes).
pub fn fr_from_element(fe: &FieldElement) -> Result<Fr, CryptoError> {
    parse_canonical(fe.as_str())
}

/// Parse a base-field element (proof coordinates).
pub fn fq_from_element(fe: &FieldElement) -> Result<Fq, CryptoError> {
    parse_canonical(fe.as_str())
}

/// Decimal string of a field element.
pub fn to_decimal<F: PrimeField>(x: &F) -> String {
    let n: BigUint = (*x).into();
    n.to_str_radix(10)
}

/// Wire form of a field element.
pub fn to_field_element<F: PrimeField>(x: &F) -> FieldElement {
    FieldElement::new(to_decimal(x))
}
