//! Per-attribute disclosure flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zkid_core::AttributeName;

/// Which attributes the holder chose to reveal.
///
/// An attribute with no entry is not revealed. Unknown keys in a decoded
/// payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, bool>")]
pub struct PrivacySettings(BTreeMap<AttributeName, bool>);

impl PrivacySettings {
    /// No attribute revealed.
    pub fn conceal_all() -> Self {
        Self(AttributeName::ALL.into_iter().map(|a| (a, false)).collect())
    }

    /// Reveal exactly `attributes`; everything else is explicitly concealed.
    pub fn revealing(attributes: impl IntoIterator<Item = AttributeName>) -> Self {
        let mut settings = Self::conceal_all();
        for attribute in attributes {
            settings.set(attribute, true);
        }
        settings
    }

    /// Set one flag.
    pub fn set(&mut self, attribute: AttributeName, revealed: bool) {
        self.0.insert(attribute, revealed);
    }

    /// Whether `attribute` is flagged for disclosure.
    pub fn is_revealed(&self, attribute: AttributeName) -> bool {
        self.0.get(&attribute).copied().unwrap_or(false)
    }

    /// Flagged attributes, in circuit order.
    pub fn revealed(&self) -> impl Iterator<Item = AttributeName> + '_ {
        AttributeName::ALL
            .into_iter()
            .filter(|a| self.is_revealed(*a))
    }
}

/// Name, roll number and branch revealed; date of birth and phone concealed.
impl Default for PrivacySettings {
    fn default() -> Self {
        Self::revealing([AttributeName::Name, AttributeName::RollNo, AttributeName::Branch])
    }
}

impl From<BTreeMap<String, bool>> for PrivacySettings {
    fn from(raw: BTreeMap<String, bool>) -> Self {
        Self(
            raw.into_iter()
                .filter_map(|(k, v)| AttributeName::parse(&k).map(|a| (a, v)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reveals_name_roll_and_branch() {
        let s = PrivacySettings::default();
        assert!(s.is_revealed(AttributeName::Name));
        assert!(s.is_revealed(AttributeName::RollNo));
        assert!(s.is_revealed(AttributeName::Branch));
        assert!(!s.is_revealed(AttributeName::Dob));
        assert!(!s.is_revealed(AttributeName::PhoneNo));
    }

    #[test]
    fn missing_entry_is_concealed() {
        let s: PrivacySettings = serde_json::from_str(r#"{"name": true}"#).unwrap();
        assert!(s.is_revealed(AttributeName::Name));
        assert!(!s.is_revealed(AttributeName::Branch));
        assert_eq!(s.revealed().collect::<Vec<_>>(), vec![AttributeName::Name]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let s: PrivacySettings =
            serde_json::from_str(r#"{"name": true, "favouriteColour": true}"#).unwrap();
        assert_eq!(s.revealed().count(), 1);
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_value(PrivacySettings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": true,
                "rollNo": true,
                "dob": false,
                "phoneNo": false,
                "branch": true
            })
        );
    }
}
