//! # Temporal Types
//!
//! UTC-only timestamp used for verification outcomes, transition records,
//! and the `generatedAt` field of disclosure bundles. Serialized as ISO 8601
//! with millisecond precision and a `Z` suffix (`2026-01-15T12:00:00.000Z`),
//! the format browsers and mobile clients produce natively. Any RFC 3339
//! string is accepted on input.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to the serialized precision.
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(3))
    }

    /// Wrap a `chrono::DateTime<Utc>`.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// ISO 8601 with milliseconds and `Z` suffix.
    pub fn to_iso_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Parse any RFC 3339 timestamp, normalizing to UTC.
    pub fn parse(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid RFC 3339 timestamp: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn iso_string_has_millis_and_z() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.to_iso_string(), "2026-01-15T12:00:00.000Z");
    }

    #[test]
    fn serde_roundtrip_via_string() {
        let dt = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 15).unwrap();
        let ts = Timestamp::from(dt);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2025-06-01T08:30:15.000Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn parse_normalizes_offsets() {
        let ts = Timestamp::parse("2025-06-01T10:30:15+02:00").unwrap();
        assert_eq!(ts.to_iso_string(), "2025-06-01T08:30:15.000Z");
        assert!(Timestamp::parse("yesterday").is_none());
    }
}
