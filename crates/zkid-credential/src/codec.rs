//! # Disclosure Codec
//!
//! Builds disclosure bundles from a proof and the holder's attributes, and
//! moves them to and from the compact JSON carried in a QR code.
//!
//! Decoding is structural only. It never checks the proof; that is the
//! verifier's job, and a structurally sound bundle with a forged proof must
//! still reach it.

use serde_json::Value;
use zkid_core::{AttributeSet, ProofArtifact, Timestamp};

use crate::bundle::{DisclosureBundle, RevealedDetails};
use crate::error::CodecError;
use crate::privacy::PrivacySettings;

/// Default `proofType`.
pub const DEFAULT_PROOF_TYPE: &str = "student-identity";

/// Fields without which a payload is not a credential.
const REQUIRED_FIELDS: [&str; 2] = ["proof", "publicSignals"];

/// Encoder/decoder for [`DisclosureBundle`].
#[derive(Debug, Clone)]
pub struct DisclosureCodec {
    proof_type: String,
}

impl Default for DisclosureCodec {
    fn default() -> Self {
        Self::new(DEFAULT_PROOF_TYPE)
    }
}

impl DisclosureCodec {
    /// Codec stamping bundles with `proof_type`.
    pub fn new(proof_type: impl Into<String>) -> Self {
        Self {
            proof_type: proof_type.into(),
        }
    }

    /// Bundle `artifact` with the attributes `settings` flags for disclosure.
    pub fn encode(
        &self,
        artifact: &ProofArtifact,
        attributes: &AttributeSet,
        settings: &PrivacySettings,
    ) -> DisclosureBundle {
        let mut details = RevealedDetails::default();
        for attribute in settings.revealed() {
            details.insert(attribute, attributes.value_of(attribute));
        }
        DisclosureBundle {
            proof: artifact.proof.clone(),
            public_signals: artifact.public_signals.clone(),
            revealed_details: (!details.is_empty()).then_some(details),
            privacy_settings: Some(settings.clone()),
            generated_at: Some(Timestamp::now()),
            proof_type: Some(self.proof_type.clone()),
        }
    }

    /// Compact JSON for a QR payload.
    pub fn to_json(bundle: &DisclosureBundle) -> Result<String, CodecError> {
        serde_json::to_string(bundle).map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// Decode a JSON payload.
    pub fn decode(payload: &str) -> Result<DisclosureBundle, CodecError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| CodecError::Parse(e.to_string()))?;
        Self::decode_object(value)
    }

    /// Decode an already-parsed payload. A JSON string is treated as a
    /// serialized bundle and decoded in turn.
    pub fn decode_value(value: Value) -> Result<DisclosureBundle, CodecError> {
        match value {
            Value::String(payload) => Self::decode(&payload),
            other => Self::decode_object(other),
        }
    }

    fn decode_object(value: Value) -> Result<DisclosureBundle, CodecError> {
        let Value::Object(map) = &value else {
            return Err(CodecError::Parse(format!(
                "expected a JSON object, got {}",
                kind(&value)
            )));
        };
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|f| map.get(*f).map_or(true, Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Err(CodecError::MissingFields(missing));
        }
        serde_json::from_value(value).map_err(|e| CodecError::Parse(e.to_string()))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
