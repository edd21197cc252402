//! # snarkjs-Compatible Encoding
//!
//! Conversion between arkworks Groth16 types and the JSON layout used by
//! snarkjs and Solidity verifier generators.
//!
//! Decoding is where untrusted proofs are checked: coordinate arity, field
//! canonicity, curve membership, and subgroup membership. Every failure is a
//! [`VerifyError::MalformedProof`] naming the offending component.

use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_groth16::{Proof, VerifyingKey};
use serde_json::{json, Value};
use zkid_core::proof::{CURVE_BN128, PROTOCOL_GROTH16};
use zkid_core::{FieldElement, Groth16Proof};
use zkid_crypto::field::{fq_from_element, fr_from_element, to_decimal, to_field_element};

use crate::traits::VerifyError;

// ── Encoding ────────────────────────────────────────────────────────

/// `[x, y]` of a G1 point.
pub fn g1_to_wire(p: &G1Affine) -> Vec<FieldElement> {
    vec![to_field_element(&p.x), to_field_element(&p.y)]
}

/// `[[x.c0, x.c1], [y.c0, y.c1]]` of a G2 point.
pub fn g2_to_wire(p: &G2Affine) -> Vec<Vec<FieldElement>> {
    vec![
        vec![to_field_element(&p.x.c0), to_field_element(&p.x.c1)],
        vec![to_field_element(&p.y.c0), to_field_element(&p.y.c1)],
    ]
}

/// Wire form of an arkworks proof.
pub fn proof_to_wire(proof: &Proof<Bn254>) -> Groth16Proof {
    Groth16Proof {
        pi_a: g1_to_wire(&proof.a),
        pi_b: g2_to_wire(&proof.b),
        pi_c: g1_to_wire(&proof.c),
        protocol: Some(PROTOCOL_GROTH16.to_string()),
        curve: Some(CURVE_BN128.to_string()),
    }
}

/// Verification key in snarkjs `verification_key.json` layout.
///
/// Points use snarkjs' projective form (`[x, y, "1"]`, G2 with
/// `["1", "0"]`), which is what Solidity verifier templates consume.
pub fn verifying_key_json(vk: &VerifyingKey<Bn254>) -> Value {
    let g1 = |p: &G1Affine| json!([to_decimal(&p.x), to_decimal(&p.y), "1"]);
    let g2 = |p: &G2Affine| {
        json!([
            [to_decimal(&p.x.c0), to_decimal(&p.x.c1)],
            [to_decimal(&p.y.c0), to_decimal(&p.y.c1)],
            ["1", "0"]
        ])
    };
    json!({
        "protocol": PROTOCOL_GROTH16,
        "curve": CURVE_BN128,
        "nPublic": vk.gamma_abc_g1.len().saturating_sub(1),
        "vk_alpha_1": g1(&vk.alpha_g1),
        "vk_beta_2": g2(&vk.beta_g2),
        "vk_gamma_2": g2(&vk.gamma_g2),
        "vk_delta_2": g2(&vk.delta_g2),
        "IC": vk.gamma_abc_g1.iter().map(g1).collect::<Vec<_>>(),
    })
}

// ── Decoding ────────────────────────────────────────────────────────

fn malformed(msg: impl Into<String>) -> VerifyError {
    VerifyError::MalformedProof(msg.into())
}

fn coordinate(fe: &FieldElement, label: &str) -> Result<Fq, VerifyError> {
    fq_from_element(fe).map_err(|e| malformed(format!("{label}: {e}")))
}

fn fq2(pair: &[FieldElement], label: &str) -> Result<Fq2, VerifyError> {
    match pair {
        [c0, c1] => Ok(Fq2::new(coordinate(c0, label)?, coordinate(c1, label)?)),
        _ => Err(malformed(format!(
            "{label}: expected 2 components, got {}",
            pair.len()
        ))),
    }
}

/// Decode a G1 point, accepting `[x, y]` or snarkjs `[x, y, "1"]`.
pub fn g1_from_wire(coords: &[FieldElement], label: &str) -> Result<G1Affine, VerifyError> {
    let (x, y) = match coords {
        [x, y] => (x, y),
        [x, y, z] if z.as_str() == "1" => (x, y),
        [_, _, _] => return Err(malformed(format!("{label}: projective z must be 1"))),
        _ => {
            return Err(malformed(format!(
                "{label}: expected 2 coordinates, got {}",
                coords.len()
            )))
        }
    };
    let point = G1Affine::new_unchecked(coordinate(x, label)?, coordinate(y, label)?);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(malformed(format!("{label}: point is not on the curve")));
    }
    Ok(point)
}

/// Decode a G2 point, accepting `[x, y]` or snarkjs `[x, y, ["1", "0"]]`.
pub fn g2_from_wire(coords: &[Vec<FieldElement>], label: &str) -> Result<G2Affine, VerifyError> {
    let (x, y) = match coords {
        [x, y] => (x, y),
        [x, y, z] if z.len() == 2 && z[0].as_str() == "1" && z[1].as_str() == "0" => (x, y),
        [_, _, _] => return Err(malformed(format!("{label}: projective z must be [1, 0]"))),
        _ => {
            return Err(malformed(format!(
                "{label}: expected 2 coordinate pairs, got {}",
                coords.len()
            )))
        }
    };
    let point = G2Affine::new_unchecked(fq2(x, label)?, fq2(y, label)?);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(malformed(format!("{label}: point is not on the twist")));
    }
    Ok(point)
}

/// Decode and check a wire proof.
pub fn proof_from_wire(proof: &Groth16Proof) -> Result<Proof<Bn254>, VerifyError> {
    if let Some(protocol) = &proof.protocol {
        if protocol != PROTOCOL_GROTH16 {
            return Err(malformed(format!("unsupported protocol \"{protocol}\"")));
        }
    }
    if let Some(curve) = &proof.curve {
        if curve != CURVE_BN128 && curve != "bn254" {
            return Err(malformed(format!("unsupported curve \"{curve}\"")));
        }
    }
    Ok(Proof {
        a: g1_from_wire(&proof.pi_a, "pi_a")?,
        b: g2_from_wire(&proof.pi_b, "pi_b")?,
        c: g1_from_wire(&proof.pi_c, "pi_c")?,
    })
}

/// Decode public signals as canonical scalar-field elements.
pub fn public_signals_from_wire(signals: &[FieldElement]) -> Result<Vec<Fr>, VerifyError> {
    signals
        .iter()
        .enumerate()
        .map(|(i, s)| fr_from_element(s).map_err(|e| malformed(format!("publicSignals[{i}]: {e}"))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::AffineRepr;

    fn g1() -> G1Affine {
        G1Affine::generator()
    }

    fn g2() -> G2Affine {
        G2Affine::generator()
    }

    #[test]
    fn g1_roundtrip() {
        let wire = g1_to_wire(&g1());
        assert_eq!(wire.len(), 2);
        // BN254 G1 generator is (1, 2).
        assert_eq!(wire[0].as_str(), "1");
        assert_eq!(wire[1].as_str(), "2");
        assert_eq!(g1_from_wire(&wire, "p").unwrap(), g1());
    }

    #[test]
    fn g1_accepts_projective_form() {
        let mut wire = g1_to_wire(&g1());
        wire.push("1".into());
        assert_eq!(g1_from_wire(&wire, "p").unwrap(), g1());
        wire[2] = "2".into();
        assert!(g1_from_wire(&wire, "p").is_err());
    }

    #[test]
    fn g1_rejects_off_curve_point() {
        let wire = vec![FieldElement::new("1"), FieldElement::new("3")];
        let err = g1_from_wire(&wire, "pi_a").unwrap_err();
        assert!(err.to_string().contains("pi_a"));
    }

    #[test]
    fn g1_rejects_wrong_arity() {
        assert!(g1_from_wire(&[FieldElement::new("1")], "pi_c").is_err());
        assert!(g1_from_wire(&[], "pi_c").is_err());
    }

    #[test]
    fn g1_rejects_non_canonical_coordinate() {
        let wire = vec![
            FieldElement::new(
                "21888242871839275222246405745257275088696311157297823662689037894645226208584",
            ),
            FieldElement::new("2"),
        ];
        assert!(g1_from_wire(&wire, "pi_a").is_err());
    }

    #[test]
    fn g2_roundtrip_and_projective() {
        let mut wire = g2_to_wire(&g2());
        assert_eq!(g2_from_wire(&wire, "pi_b").unwrap(), g2());
        wire.push(vec!["1".into(), "0".into()]);
        assert_eq!(g2_from_wire(&wire, "pi_b").unwrap(), g2());
    }

    #[test]
    fn g2_rejects_swapped_components() {
        let wire = g2_to_wire(&g2());
        let swapped: Vec<Vec<FieldElement>> = wire
            .iter()
            .map(|pair| vec![pair[1].clone(), pair[0].clone()])
            .collect();
        assert!(g2_from_wire(&swapped, "pi_b").is_err());
    }

    #[test]
    fn proof_rejects_foreign_protocol() {
        let proof = Groth16Proof {
            pi_a: g1_to_wire(&g1()),
            pi_b: g2_to_wire(&g2()),
            pi_c: g1_to_wire(&g1()),
            protocol: Some("plonk".into()),
            curve: None,
        };
        assert!(proof_from_wire(&proof).is_err());
    }

    #[test]
    fn public_signals_must_be_canonical() {
        let ok = public_signals_from_wire(&["5".into()]).unwrap();
        assert_eq!(ok, vec![Fr::from(5u64)]);
        let err = public_signals_from_wire(&["5".into(), "x".into()]).unwrap_err();
        assert!(err.to_string().contains("publicSignals[1]"));
    }
}
