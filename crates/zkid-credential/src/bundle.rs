//! The disclosure bundle handed from holder to verifier.

use serde::{Deserialize, Serialize};
use zkid_core::{AttributeName, FieldElement, Groth16Proof, ProofArtifact, Timestamp};

use crate::privacy::PrivacySettings;

/// Plaintext values of the revealed attributes. Concealed attributes are
/// absent, never null or hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealedDetails {
    /// Full name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Roll number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
    /// Date of birth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    /// Branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl RevealedDetails {
    fn slot(&mut self, attribute: AttributeName) -> &mut Option<String> {
        match attribute {
            AttributeName::Name => &mut self.name,
            AttributeName::RollNo => &mut self.roll_no,
            AttributeName::Dob => &mut self.dob,
            AttributeName::PhoneNo => &mut self.phone_no,
            AttributeName::Branch => &mut self.branch,
        }
    }

    /// Value of one attribute, if revealed.
    pub fn get(&self, attribute: AttributeName) -> Option<&str> {
        match attribute {
            AttributeName::Name => self.name.as_deref(),
            AttributeName::RollNo => self.roll_no.as_deref(),
            AttributeName::Dob => self.dob.as_deref(),
            AttributeName::PhoneNo => self.phone_no.as_deref(),
            AttributeName::Branch => self.branch.as_deref(),
        }
    }

    /// Reveal one attribute.
    pub fn insert(&mut self, attribute: AttributeName, value: impl Into<String>) {
        *self.slot(attribute) = Some(value.into());
    }

    /// Revealed attribute names, in circuit order.
    pub fn attributes(&self) -> impl Iterator<Item = AttributeName> + '_ {
        AttributeName::ALL
            .into_iter()
            .filter(|a| self.get(*a).is_some())
    }

    /// Whether nothing is revealed.
    pub fn is_empty(&self) -> bool {
        self.attributes().next().is_none()
    }
}

/// Proof plus selective disclosure, as serialized into a QR payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosureBundle {
    /// The Groth16 proof.
    pub proof: Groth16Proof,
    /// Public signals; the first is the attribute commitment.
    pub public_signals: Vec<FieldElement>,
    /// Revealed attributes, or `null` when nothing is revealed.
    #[serde(default)]
    pub revealed_details: Option<RevealedDetails>,
    /// The flags the holder chose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_settings: Option<PrivacySettings>,
    /// When the bundle was encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<Timestamp>,
    /// Credential kind, e.g. `student-identity`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_type: Option<String>,
}

impl DisclosureBundle {
    /// The proof and signals as a verifiable artifact.
    pub fn artifact(&self) -> ProofArtifact {
        ProofArtifact {
            proof: self.proof.clone(),
            public_signals: self.public_signals.clone(),
        }
    }

    /// Revealed attribute names, in circuit order.
    pub fn revealed_attributes(&self) -> Vec<AttributeName> {
        self.revealed_details
            .as_ref()
            .map(|d| d.attributes().collect())
            .unwrap_or_default()
    }

    /// Revealed attributes whose privacy flag is not set.
    ///
    /// A bundle without privacy settings carries no flags to check against
    /// and reports nothing.
    pub fn disclosure_violations(&self) -> Vec<AttributeName> {
        let Some(settings) = &self.privacy_settings else {
            return Vec::new();
        };
        self.revealed_attributes()
            .into_iter()
            .filter(|a| !settings.is_revealed(*a))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(details: Option<RevealedDetails>, settings: Option<PrivacySettings>) -> DisclosureBundle {
        DisclosureBundle {
            proof: Groth16Proof {
                pi_a: vec!["1".into(), "2".into()],
                pi_b: vec![vec!["3".into(), "4".into()], vec!["5".into(), "6".into()]],
                pi_c: vec!["7".into(), "8".into()],
                protocol: None,
                curve: None,
            },
            public_signals: vec!["9".into()],
            revealed_details: details,
            privacy_settings: settings,
            generated_at: None,
            proof_type: None,
        }
    }

    #[test]
    fn revealed_details_insert_and_get() {
        let mut d = RevealedDetails::default();
        assert!(d.is_empty());
        d.insert(AttributeName::Branch, "CSE");
        assert_eq!(d.get(AttributeName::Branch), Some("CSE"));
        assert_eq!(d.get(AttributeName::Dob), None);
        assert_eq!(d.attributes().collect::<Vec<_>>(), vec![AttributeName::Branch]);
    }

    #[test]
    fn concealed_fields_are_absent_on_the_wire() {
        let mut d = RevealedDetails::default();
        d.insert(AttributeName::Name, "Jane Doe");
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Jane Doe" }));
    }

    #[test]
    fn violations_report_unflagged_reveals() {
        let mut d = RevealedDetails::default();
        d.insert(AttributeName::Name, "Jane Doe");
        d.insert(AttributeName::PhoneNo, "9876543210");
        let b = bundle(Some(d), Some(PrivacySettings::default()));
        assert_eq!(b.disclosure_violations(), vec![AttributeName::PhoneNo]);
    }

    #[test]
    fn no_settings_no_violations() {
        let mut d = RevealedDetails::default();
        d.insert(AttributeName::Dob, "01012000");
        assert!(bundle(Some(d), None).disclosure_violations().is_empty());
    }

    #[test]
    fn artifact_carries_proof_and_signals() {
        let b = bundle(None, None);
        let artifact = b.artifact();
        assert_eq!(artifact.proof, b.proof);
        assert_eq!(artifact.public_signals, b.public_signals);
        assert!(b.revealed_attributes().is_empty());
    }
}
