/// Phone number normalization.
///
/// Every phone number entering the service goes through [`normalize_phone`]
/// before it touches the store, so the store only ever sees one spelling per
/// subscriber:
/// - `8 (999) 123-45-67`, `+7 999 1234567` and `79991234567` all become `+79991234567`
/// - numbers without a country code resolve against the default region (RU)
/// - numbers with an explicit `+` resolve internationally
use phonenumber::country::Id as CountryId;
use phonenumber::Mode;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Region used when the input carries no country code.
pub const DEFAULT_REGION: CountryId = CountryId::RU;

/// Reasons a raw phone string is rejected.
///
/// Both variants are client-input faults and are never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// Input could not be parsed as a phone number at all.
    Malformed(String),
    /// Input parsed but is not a real number in its numbering plan.
    Invalid(String),
}

impl fmt::Display for PhoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhoneError::Malformed(detail) => write!(f, "Malformed phone number: {}", detail),
            PhoneError::Invalid(input) => write!(f, "Invalid phone number: {}", input),
        }
    }
}

impl std::error::Error for PhoneError {}

/// A phone number in E.164 form (`+` country code subscriber number, no separators).
///
/// Only produced by normalization, so holding one means the number is valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for CanonicalPhone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl FromStr for CanonicalPhone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_phone(s)
    }
}

/// Parse an ISO 3166 alpha-2 region code (`"ru"`, `"BR"`, ...).
pub fn parse_region(code: &str) -> Option<CountryId> {
    code.trim().to_ascii_uppercase().parse::<CountryId>().ok()
}

/// Normalize a phone number against the default region (RU).
pub fn normalize_phone(raw: &str) -> Result<CanonicalPhone, PhoneError> {
    normalize_phone_in(DEFAULT_REGION, raw)
}

/// Validate and normalize a phone number
///
/// Uses phonenumber library (port of Google's libphonenumber) to:
/// - Parse the trimmed input with `region` as the national context
/// - Validate it against the numbering plan it resolves to
/// - Return normalized E.164 format (+79991234567)
pub fn normalize_phone_in(region: CountryId, raw: &str) -> Result<CanonicalPhone, PhoneError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(PhoneError::Malformed("empty input".to_string()));
    }

    let number = match phonenumber::parse(Some(region), value) {
        Ok(number) => number,
        // Well-formed digits whose national number is empty or all zeros
        Err(phonenumber::ParseError::MalformedInteger(_)) => {
            return Err(PhoneError::Invalid(value.to_string()))
        }
        Err(e) => return Err(PhoneError::Malformed(format!("{:?}", e))),
    };

    if !phonenumber::is_valid(&number) {
        return Err(PhoneError::Invalid(value.to_string()));
    }

    Ok(CanonicalPhone(number.format().mode(Mode::E164).to_string()))
}
