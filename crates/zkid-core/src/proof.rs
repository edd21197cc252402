//! # Proof Artifacts
//!
//! Wire representation of a Groth16 proof and its public signals, in the
//! layout the snarkjs ecosystem uses:
//!
//! ```json
//! {
//!   "proof": {
//!     "pi_a": ["<x>", "<y>"],
//!     "pi_b": [["<x.c0>", "<x.c1>"], ["<y.c0>", "<y.c1>"]],
//!     "pi_c": ["<x>", "<y>"],
//!     "protocol": "groth16",
//!     "curve": "bn128"
//!   },
//!   "publicSignals": ["<commitment>"]
//! }
//! ```
//!
//! Coordinates are kept as strings here; curve and field checks happen where
//! the artifact is verified, so that a malformed artifact is representable
//! and can be rejected with a reason rather than failing to deserialize.

use serde::{Deserialize, Serialize};

/// Protocol tag carried by every proof this system emits.
pub const PROTOCOL_GROTH16: &str = "groth16";

/// Curve tag carried by every proof this system emits (snarkjs naming).
pub const CURVE_BN128: &str = "bn128";

/// A field element as a decimal (or `0x`-prefixed hex) string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldElement(String);

impl FieldElement {
    /// Wrap a string without checking it. Parsing is the verifier's job.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the value is written in hex.
    pub fn is_hex(&self) -> bool {
        self.0.starts_with("0x") || self.0.starts_with("0X")
    }
}

impl std::fmt::Display for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldElement {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldElement {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The three group elements of a Groth16 proof.
///
/// `pi_a` and `pi_c` are G1 points `[x, y]`; `pi_b` is a G2 point
/// `[[x.c0, x.c1], [y.c0, y.c1]]`. Inputs in snarkjs' projective form (a
/// trailing `"1"` / `["1", "0"]`) are accepted by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groth16Proof {
    /// Point A (G1).
    pub pi_a: Vec<FieldElement>,
    /// Point B (G2).
    pub pi_b: Vec<Vec<FieldElement>>,
    /// Point C (G1).
    pub pi_c: Vec<FieldElement>,
    /// Proof system tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Curve tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,
}

/// A proof together with its ordered public signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofArtifact {
    /// The proof.
    pub proof: Groth16Proof,
    /// Public signals in circuit order. For the identity circuit this is
    /// the single attribute commitment.
    pub public_signals: Vec<FieldElement>,
}

impl ProofArtifact {
    /// The first public signal, which the identity circuit defines as the
    /// attribute commitment.
    pub fn commitment(&self) -> Option<&FieldElement> {
        self.public_signals.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProofArtifact {
        ProofArtifact {
            proof: Groth16Proof {
                pi_a: vec!["1".into(), "2".into()],
                pi_b: vec![vec!["3".into(), "4".into()], vec!["5".into(), "6".into()]],
                pi_c: vec!["7".into(), "8".into()],
                protocol: Some(PROTOCOL_GROTH16.into()),
                curve: Some(CURVE_BN128.into()),
            },
            public_signals: vec!["42".into()],
        }
    }

    #[test]
    fn serializes_snarkjs_layout() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["proof"]["pi_a"][0], "1");
        assert_eq!(json["proof"]["pi_b"][1][0], "5");
        assert_eq!(json["proof"]["protocol"], "groth16");
        assert_eq!(json["proof"]["curve"], "bn128");
        assert_eq!(json["publicSignals"][0], "42");
    }

    #[test]
    fn accepts_snarkjs_projective_form() {
        let json = serde_json::json!({
            "proof": {
                "pi_a": ["1", "2", "1"],
                "pi_b": [["3", "4"], ["5", "6"], ["1", "0"]],
                "pi_c": ["7", "8", "1"],
                "protocol": "groth16",
                "curve": "bn128"
            },
            "publicSignals": ["42"]
        });
        let artifact: ProofArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(artifact.proof.pi_a.len(), 3);
        assert_eq!(artifact.proof.pi_b.len(), 3);
        assert_eq!(artifact.commitment().map(FieldElement::as_str), Some("42"));
    }

    #[test]
    fn tags_are_optional() {
        let json = serde_json::json!({
            "proof": { "pi_a": [], "pi_b": [], "pi_c": [] },
            "publicSignals": []
        });
        let artifact: ProofArtifact = serde_json::from_value(json).unwrap();
        assert!(artifact.proof.protocol.is_none());
        assert!(artifact.commitment().is_none());
    }

    #[test]
    fn hex_detection() {
        assert!(FieldElement::new("0x1f").is_hex());
        assert!(!FieldElement::new("31").is_hex());
    }
}
