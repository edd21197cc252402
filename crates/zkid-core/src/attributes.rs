//! # Identity Attributes
//!
//! The holder's raw identity record and the validated newtypes it is built
//! from. An [`AttributeSet`] is created once at intake, is immutable
//! thereafter, and is never persisted beyond the issuance flow.
//!
//! ## Validation
//!
//! | Attribute | Rule |
//! |-----------|------|
//! | `name`    | trimmed, 2-128 characters |
//! | `rollNo`  | `^\d{2}[A-Z]{2,4}\d{2,3}$` (e.g. `22BCS01`) |
//! | `dob`     | 8-digit `ddmmyyyy`, a real calendar date, year ≥ 1900 |
//! | `phoneNo` | 10 digits; a leading `+91` is stripped |
//! | `branch`  | one of `CSE`, `ECE`, `ME`, `SM`, `Design` |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Attribute names
// ---------------------------------------------------------------------------

/// Wire name of a single identity attribute.
///
/// Used as the key type of privacy settings and revealed details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeName {
    /// Full name.
    Name,
    /// Institutional roll number.
    RollNo,
    /// Date of birth.
    Dob,
    /// Phone number.
    PhoneNo,
    /// Academic branch.
    Branch,
}

impl AttributeName {
    /// All attributes in circuit input order.
    pub const ALL: [AttributeName; 5] = [
        Self::Name,
        Self::RollNo,
        Self::Dob,
        Self::PhoneNo,
        Self::Branch,
    ];

    /// The camelCase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::RollNo => "rollNo",
            Self::Dob => "dob",
            Self::PhoneNo => "phoneNo",
            Self::Branch => "branch",
        }
    }

    /// Parse a wire name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }
}

impl std::fmt::Display for AttributeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Validated newtypes
// ---------------------------------------------------------------------------

/// Holder's full name, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate and trim a name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidName`] when the trimmed value has
    /// fewer than 2 or more than 128 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if !(2..=128).contains(&len) {
            return Err(ValidationError::InvalidName(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Institutional roll number, e.g. `22BCS01`.
///
/// Two-digit admission year, a 2-4 letter programme code, and a 2-3 digit
/// serial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RollNumber(String);

impl RollNumber {
    /// Validate a roll number against the institutional pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRollNumber`] on any mismatch.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let s = raw.trim();
        if !matches_roll_pattern(s) {
            return Err(ValidationError::InvalidRollNumber(raw));
        }
        Ok(Self(s.to_string()))
    }

    /// Access the roll number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn matches_roll_pattern(s: &str) -> bool {
    let bytes = s.as_bytes();
    let year = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if year != 2 {
        return false;
    }
    let code = bytes[year..]
        .iter()
        .take_while(|b| b.is_ascii_uppercase())
        .count();
    if !(2..=4).contains(&code) {
        return false;
    }
    let rest = &bytes[year + code..];
    (2..=3).contains(&rest.len()) && rest.iter().all(u8::is_ascii_digit)
}

/// Date of birth as an 8-digit `ddmmyyyy` numeral.
///
/// The circuit consumes it as an integer, so leading zeros of the day are
/// dropped by [`DateOfBirth::as_u64`] (`01012000` becomes `1012000`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateOfBirth(String);

impl DateOfBirth {
    /// Validate a `ddmmyyyy` date.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDateOfBirth`] if the value is not
    /// eight digits or does not name a real date on or after 1900-01-01.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let s = raw.trim();
        if s.len() != 8 || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidDateOfBirth(raw));
        }
        let day: u32 = s[0..2].parse().map_err(|_| ValidationError::InvalidDateOfBirth(raw.clone()))?;
        let month: u32 = s[2..4].parse().map_err(|_| ValidationError::InvalidDateOfBirth(raw.clone()))?;
        let year: i32 = s[4..8].parse().map_err(|_| ValidationError::InvalidDateOfBirth(raw.clone()))?;
        if year < 1900 || NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(ValidationError::InvalidDateOfBirth(raw));
        }
        Ok(Self(s.to_string()))
    }

    /// Access the `ddmmyyyy` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value fed to the circuit.
    pub fn as_u64(&self) -> u64 {
        // Eight ASCII digits always fit.
        self.0.bytes().fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'))
    }
}

/// Ten-digit phone number without country code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate a phone number, stripping an optional `+91` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPhoneNumber`] unless exactly ten
    /// digits remain.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix("+91").unwrap_or(trimmed);
        if digits.len() != 10 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidPhoneNumber(raw));
        }
        Ok(Self(digits.to_string()))
    }

    /// Access the ten digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value fed to the circuit.
    pub fn as_u64(&self) -> u64 {
        self.0.bytes().fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'))
    }
}

/// Academic branch (programme).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Branch {
    /// Computer Science and Engineering.
    Cse,
    /// Electronics and Communication Engineering.
    Ece,
    /// Mechanical Engineering.
    Me,
    /// School of Management.
    Sm,
    /// Design.
    Design,
}

impl Branch {
    /// Every recognized branch.
    pub const ALL: [Branch; 5] = [Self::Cse, Self::Ece, Self::Me, Self::Sm, Self::Design];

    /// Parse a branch code, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBranch`] for unknown codes.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = value.as_ref();
        let s = raw.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::InvalidBranch(raw.to_string()))
    }

    /// Canonical code string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cse => "CSE",
            Self::Ece => "ECE",
            Self::Me => "ME",
            Self::Sm => "SM",
            Self::Design => "Design",
        }
    }
}

macro_rules! string_conversions {
    ($($ty:ident),*) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = ValidationError;
                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.as_str().to_string()
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

string_conversions!(FullName, RollNumber, DateOfBirth, PhoneNumber, Branch);

// ---------------------------------------------------------------------------
// AttributeSet
// ---------------------------------------------------------------------------

/// Attributes exactly as a client submits them, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttributes {
    /// Full name.
    pub name: String,
    /// Roll number.
    pub roll_no: String,
    /// Date of birth, `ddmmyyyy`.
    pub dob: String,
    /// Phone number.
    pub phone_no: String,
    /// Branch code.
    pub branch: String,
}

impl RawAttributes {
    /// Validate every attribute, returning the first failure.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first attribute (in circuit
    /// order) that fails its rule.
    pub fn validate(self) -> Result<AttributeSet, ValidationError> {
        Ok(AttributeSet {
            name: FullName::new(self.name)?,
            roll_no: RollNumber::new(self.roll_no)?,
            dob: DateOfBirth::new(self.dob)?,
            phone_no: PhoneNumber::new(self.phone_no)?,
            branch: Branch::new(self.branch)?,
        })
    }

    /// Validate every attribute, collecting all failures.
    pub fn validate_all(&self) -> Vec<ValidationError> {
        [
            FullName::new(self.name.clone()).err(),
            RollNumber::new(self.roll_no.clone()).err(),
            DateOfBirth::new(self.dob.clone()).err(),
            PhoneNumber::new(self.phone_no.clone()).err(),
            Branch::new(&self.branch).err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// The holder's validated identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawAttributes")]
pub struct AttributeSet {
    /// Full name.
    pub name: FullName,
    /// Roll number.
    pub roll_no: RollNumber,
    /// Date of birth.
    pub dob: DateOfBirth,
    /// Phone number.
    pub phone_no: PhoneNumber,
    /// Branch.
    pub branch: Branch,
}

impl AttributeSet {
    /// Plaintext value of one attribute, as it would be disclosed.
    pub fn value_of(&self, attribute: AttributeName) -> &str {
        match attribute {
            AttributeName::Name => self.name.as_str(),
            AttributeName::RollNo => self.roll_no.as_str(),
            AttributeName::Dob => self.dob.as_str(),
            AttributeName::PhoneNo => self.phone_no.as_str(),
            AttributeName::Branch => self.branch.as_str(),
        }
    }
}

impl TryFrom<RawAttributes> for AttributeSet {
    type Error = ValidationError;

    fn try_from(raw: RawAttributes) -> Result<Self, Self::Error> {
        raw.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> RawAttributes {
        RawAttributes {
            name: "Jane Doe".into(),
            roll_no: "22BCS01".into(),
            dob: "01012000".into(),
            phone_no: "9876543210".into(),
            branch: "CSE".into(),
        }
    }

    // -- Name --

    #[test]
    fn name_is_trimmed() {
        let name = FullName::new("  Jane Doe ").unwrap();
        assert_eq!(name.as_str(), "Jane Doe");
    }

    #[test]
    fn name_rejects_short() {
        assert!(FullName::new("J").is_err());
        assert!(FullName::new("   ").is_err());
        assert!(FullName::new("J ").is_err());
    }

    // -- Roll number --

    #[test]
    fn roll_number_valid_examples() {
        assert!(RollNumber::new("22BCS01").is_ok());
        assert!(RollNumber::new("21EC101").is_ok());
        assert!(RollNumber::new("23ABCD999").is_ok());
    }

    #[test]
    fn roll_number_rejects_invalid() {
        assert!(RollNumber::new("").is_err());
        assert!(RollNumber::new("2BCS01").is_err());
        assert!(RollNumber::new("22bcs01").is_err());
        assert!(RollNumber::new("22B01").is_err());
        assert!(RollNumber::new("22BCSEE01").is_err());
        assert!(RollNumber::new("22BCS1").is_err());
        assert!(RollNumber::new("22BCS0001").is_err());
        assert!(RollNumber::new("22BCS01X").is_err());
    }

    // -- Date of birth --

    #[test]
    fn dob_numeric_value_drops_leading_zero() {
        let dob = DateOfBirth::new("01012000").unwrap();
        assert_eq!(dob.as_u64(), 1_012_000);
        assert_eq!(DateOfBirth::new("31121999").unwrap().as_u64(), 31_121_999);
    }

    #[test]
    fn dob_rejects_impossible_dates() {
        assert!(DateOfBirth::new("31022000").is_err());
        assert!(DateOfBirth::new("00012000").is_err());
        assert!(DateOfBirth::new("01131999").is_err());
        assert!(DateOfBirth::new("0101200").is_err());
        assert!(DateOfBirth::new("01-01-2000").is_err());
        assert!(DateOfBirth::new("01011850").is_err());
    }

    #[test]
    fn dob_accepts_leap_day() {
        assert!(DateOfBirth::new("29022000").is_ok());
        assert!(DateOfBirth::new("29021999").is_err());
    }

    // -- Phone --

    #[test]
    fn phone_strips_country_code() {
        let phone = PhoneNumber::new("+919876543210").unwrap();
        assert_eq!(phone.as_str(), "9876543210");
        assert_eq!(phone.as_u64(), 9_876_543_210);
    }

    #[test]
    fn phone_rejects_wrong_length() {
        assert!(PhoneNumber::new("987654321").is_err());
        assert!(PhoneNumber::new("98765432100").is_err());
        assert!(PhoneNumber::new("98765x3210").is_err());
        assert!(PhoneNumber::new("+1 9876543210").is_err());
    }

    // -- Branch --

    #[test]
    fn branch_is_case_insensitive() {
        assert_eq!(Branch::new("cse").unwrap(), Branch::Cse);
        assert_eq!(Branch::new("DESIGN").unwrap(), Branch::Design);
        assert_eq!(Branch::new("Design").unwrap().as_str(), "Design");
        assert!(Branch::new("Physics").is_err());
    }

    // -- AttributeSet --

    #[test]
    fn attribute_set_from_valid_raw() {
        let set = jane().validate().unwrap();
        assert_eq!(set.value_of(AttributeName::Name), "Jane Doe");
        assert_eq!(set.value_of(AttributeName::RollNo), "22BCS01");
        assert_eq!(set.value_of(AttributeName::Branch), "CSE");
    }

    #[test]
    fn validate_all_collects_every_failure() {
        let mut raw = jane();
        raw.name = "J".into();
        raw.phone_no = "123".into();
        let errors = raw.validate_all();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].attribute(), "name");
        assert_eq!(errors[1].attribute(), "phoneNo");
    }

    #[test]
    fn attribute_set_deserializes_with_validation() {
        let json = serde_json::json!({
            "name": "Jane Doe",
            "rollNo": "22BCS01",
            "dob": "01012000",
            "phoneNo": "9876543210",
            "branch": "CSE"
        });
        let set: AttributeSet = serde_json::from_value(json).unwrap();
        assert_eq!(set.phone_no.as_str(), "9876543210");

        let bad = serde_json::json!({
            "name": "Jane Doe",
            "rollNo": "bad",
            "dob": "01012000",
            "phoneNo": "9876543210",
            "branch": "CSE"
        });
        let err = serde_json::from_value::<AttributeSet>(bad).unwrap_err();
        assert!(err.to_string().contains("roll number"));
    }

    #[test]
    fn attribute_set_serializes_camel_case() {
        let set = jane().validate().unwrap();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["rollNo"], "22BCS01");
        assert_eq!(json["phoneNo"], "9876543210");
        assert_eq!(json["branch"], "CSE");
    }

    #[test]
    fn attribute_name_wire_names() {
        for attr in AttributeName::ALL {
            assert_eq!(AttributeName::parse(attr.as_str()), Some(attr));
            let json = serde_json::to_value(attr).unwrap();
            assert_eq!(json, attr.as_str());
        }
        assert_eq!(AttributeName::parse("email"), None);
    }

    mod proptests {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_ten_digit_phone_is_accepted(n in 0u64..10_000_000_000) {
                let s = format!("{n:010}");
                let phone = PhoneNumber::new(s.clone()).unwrap();
                prop_assert_eq!(phone.as_u64(), n);
                prop_assert!(phone.as_u64() < (1u64 << 34));
            }

            #[test]
            fn valid_dob_fits_in_25_bits(day in 1u32..=28, month in 1u32..=12, year in 1900u32..=2099) {
                let s = format!("{day:02}{month:02}{year:04}");
                let dob = DateOfBirth::new(s).unwrap();
                prop_assert!(dob.as_u64() < (1u64 << 25));
            }

            #[test]
            fn generated_roll_numbers_are_accepted(
                year in 0u32..100,
                code in "[A-Z]{2,4}",
                serial in "[0-9]{2,3}",
            ) {
                let roll = format!("{year:02}{code}{serial}");
                prop_assert!(RollNumber::new(roll).is_ok());
            }
        }
    }
}
