//! # Verifier ABI
//!
//! Calldata for the Solidity Groth16 verifier:
//!
//! ```text
//! verifyProof(uint256[2] _pA, uint256[2][2] _pB, uint256[2] _pC, uint256[1] _pubSignals)
//! ```
//!
//! All arguments are static arrays, so the encoding is the 4-byte selector
//! followed by nine 32-byte big-endian words in declaration order. The
//! precompile expects Fq2 elements as `(c1, c0)`, so each G2 coordinate
//! pair is swapped relative to the snarkjs wire layout.

use ark_bn254::G2Affine;
use num_bigint::BigUint;
use zkid_core::ProofArtifact;
use zkid_zkp::encoding::{proof_from_wire, public_signals_from_wire};

use crate::error::LedgerError;

/// Function selector: first 4 bytes of
/// keccak256("verifyProof(uint256[2],uint256[2][2],uint256[2],uint256[1])").
pub const VERIFY_PROOF_SELECTOR: &str = "43753b4d";

/// Number of public signals the deployed verifier accepts.
pub const VERIFIER_PUBLIC_INPUTS: usize = 1;

/// Decoded arguments of a `verifyProof` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyProofCall {
    /// `_pA`.
    pub a: [BigUint; 2],
    /// `_pB`, already in EVM order.
    pub b: [[BigUint; 2]; 2],
    /// `_pC`.
    pub c: [BigUint; 2],
    /// `_pubSignals`.
    pub signals: Vec<BigUint>,
}

impl VerifyProofCall {
    /// Build call arguments from a wire artifact.
    ///
    /// The proof goes through the same structural, canonicity, and curve
    /// checks as off-chain verification. Anything that fails them is
    /// [`LedgerError::MalformedProof`] and is never sent.
    pub fn from_artifact(artifact: &ProofArtifact) -> Result<Self, LedgerError> {
        let proof = proof_from_wire(&artifact.proof)
            .map_err(|e| LedgerError::MalformedProof(e.to_string()))?;
        let signals = public_signals_from_wire(&artifact.public_signals)
            .map_err(|e| LedgerError::MalformedProof(e.to_string()))?;
        if signals.len() != VERIFIER_PUBLIC_INPUTS {
            return Err(LedgerError::MalformedProof(format!(
                "verifier takes {VERIFIER_PUBLIC_INPUTS} public signal(s), got {}",
                signals.len()
            )));
        }
        Ok(Self {
            a: [proof.a.x.into(), proof.a.y.into()],
            b: reorder_g2_for_evm(g2_words(&proof.b)),
            c: [proof.c.x.into(), proof.c.y.into()],
            signals: signals.into_iter().map(BigUint::from).collect(),
        })
    }

    /// `0x`-prefixed calldata.
    pub fn encode(&self) -> String {
        let words = self
            .a
            .iter()
            .chain(self.b.iter().flatten())
            .chain(self.c.iter())
            .chain(self.signals.iter());
        let mut out = String::with_capacity(2 + 8 + 64 * (8 + self.signals.len()));
        out.push_str("0x");
        out.push_str(VERIFY_PROOF_SELECTOR);
        for word in words {
            out.push_str(&encode_word(word));
        }
        out
    }
}

/// Encode verifier calldata for an artifact.
pub fn encode_verify_proof_call(artifact: &ProofArtifact) -> Result<String, LedgerError> {
    Ok(VerifyProofCall::from_artifact(artifact)?.encode())
}

fn g2_words(p: &G2Affine) -> [[BigUint; 2]; 2] {
    [
        [p.x.c0.into(), p.x.c1.into()],
        [p.y.c0.into(), p.y.c1.into()],
    ]
}

/// Swap each `[c0, c1]` pair to `[c1, c0]`.
pub fn reorder_g2_for_evm(b: [[BigUint; 2]; 2]) -> [[BigUint; 2]; 2] {
    let [[x0, x1], [y0, y1]] = b;
    [[x1, x0], [y1, y0]]
}

/// One 32-byte big-endian word as 64 hex chars.
pub fn encode_word(value: &BigUint) -> String {
    format!("{value:064x}")
}

/// Decode an ABI `bool` return value.
///
/// Empty return data is not a bool; callers detect it first to report a
/// missing contract.
pub fn decode_bool(data: &str) -> Result<bool, LedgerError> {
    let hex = data
        .strip_prefix("0x")
        .ok_or_else(|| LedgerError::InvalidResponse(format!("return data without 0x: {data}")))?;
    if hex.len() < 64 {
        return Err(LedgerError::InvalidResponse(format!(
            "return data too short for bool: {data}"
        )));
    }
    let word = &hex[..64];
    if !word.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(LedgerError::InvalidResponse(format!("non-hex return data: {data}")));
    }
    let (head, last) = word.split_at(63);
    if head.chars().any(|c| c != '0') {
        return Err(LedgerError::InvalidResponse(format!("not an ABI bool: {data}")));
    }
    match last {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(LedgerError::InvalidResponse(format!("not an ABI bool: {data}"))),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ark_bn254::G1Affine;
    use ark_ec::AffineRepr;
    use zkid_core::{FieldElement, Groth16Proof};
    use zkid_zkp::encoding::{g1_to_wire, g2_to_wire};

    /// An artifact built from the curve generators: well-formed but not a
    /// valid proof for any key.
    pub(crate) fn generator_artifact() -> ProofArtifact {
        let g1 = G1Affine::generator();
        let g2 = G2Affine::generator();
        ProofArtifact {
            proof: Groth16Proof {
                pi_a: g1_to_wire(&g1),
                pi_b: g2_to_wire(&g2),
                pi_c: g1_to_wire(&g1),
                protocol: Some("groth16".into()),
                curve: Some("bn128".into()),
            },
            public_signals: vec![FieldElement::from("12345")],
        }
    }

    fn word(data: &str, i: usize) -> &str {
        let body = &data[10..];
        &body[i * 64..(i + 1) * 64]
    }

    #[test]
    fn selector_and_length() {
        let data = encode_verify_proof_call(&generator_artifact()).unwrap();
        assert!(data.starts_with("0x43753b4d"));
        // 0x + selector + 9 words
        assert_eq!(data.len(), 2 + 8 + 9 * 64);
    }

    #[test]
    fn g1_words_in_order() {
        let data = encode_verify_proof_call(&generator_artifact()).unwrap();
        assert_eq!(word(&data, 0), format!("{:064x}", 1));
        assert_eq!(word(&data, 1), format!("{:064x}", 2));
        assert_eq!(word(&data, 6), format!("{:064x}", 1));
        assert_eq!(word(&data, 7), format!("{:064x}", 2));
    }

    #[test]
    fn g2_pairs_are_swapped() {
        let g2 = G2Affine::generator();
        let data = encode_verify_proof_call(&generator_artifact()).unwrap();
        assert_eq!(word(&data, 2), encode_word(&g2.x.c1.into()));
        assert_eq!(word(&data, 3), encode_word(&g2.x.c0.into()));
        assert_eq!(word(&data, 4), encode_word(&g2.y.c1.into()));
        assert_eq!(word(&data, 5), encode_word(&g2.y.c0.into()));
    }

    #[test]
    fn public_signal_is_last_word() {
        let data = encode_verify_proof_call(&generator_artifact()).unwrap();
        assert_eq!(word(&data, 8), format!("{:064x}", 12345));
    }

    #[test]
    fn reorder_swaps_each_pair() {
        let n = |v: u32| BigUint::from(v);
        let out = reorder_g2_for_evm([[n(1), n(2)], [n(3), n(4)]]);
        assert_eq!(out, [[n(2), n(1)], [n(4), n(3)]]);
    }

    #[test]
    fn malformed_proofs_are_not_encoded() {
        let mut artifact = generator_artifact();
        artifact.proof.pi_b.truncate(1);
        assert!(matches!(
            encode_verify_proof_call(&artifact),
            Err(LedgerError::MalformedProof(_))
        ));

        let mut artifact = generator_artifact();
        artifact.public_signals.push(FieldElement::from("1"));
        assert!(matches!(
            encode_verify_proof_call(&artifact),
            Err(LedgerError::MalformedProof(_))
        ));

        let mut artifact = generator_artifact();
        artifact.proof.pi_a[1] = FieldElement::from("3");
        assert!(matches!(
            encode_verify_proof_call(&artifact),
            Err(LedgerError::MalformedProof(_))
        ));
    }

    #[test]
    fn decodes_bools() {
        let t = format!("0x{:064x}", 1);
        let f = format!("0x{:064x}", 0);
        assert!(decode_bool(&t).unwrap());
        assert!(!decode_bool(&f).unwrap());
    }

    #[test]
    fn rejects_non_bool_return_data() {
        assert!(decode_bool("0x").is_err());
        assert!(decode_bool("0x01").is_err());
        assert!(decode_bool(&format!("0x{:064x}", 2)).is_err());
        assert!(decode_bool(&format!("{:064x}", 1)).is_err());
    }
}
