//! Telephony URNs and countries.
//!
//! Only the `tel` scheme is modelled: it is the one URN kind the wait core
//! constructs itself (dial waits). Numbers are normalized to E.164.

use crate::error::{Result, TarryError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of digits in an E.164 number.
const MAX_E164_DIGITS: usize = 15;

/// Minimum number of digits we accept as a callable number.
const MIN_PHONE_DIGITS: usize = 7;

/// Calling codes for the countries we can resolve national numbers for.
const CALLING_CODES: &[(&str, &str)] = &[
    ("AR", "54"),
    ("BR", "55"),
    ("CA", "1"),
    ("CO", "57"),
    ("DE", "49"),
    ("EC", "593"),
    ("ES", "34"),
    ("FR", "33"),
    ("GB", "44"),
    ("IN", "91"),
    ("KE", "254"),
    ("MX", "52"),
    ("NG", "234"),
    ("PE", "51"),
    ("RW", "250"),
    ("UG", "256"),
    ("US", "1"),
    ("ZA", "27"),
];

/// An ISO 3166-1 alpha-2 country code, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Country(String);

impl Country {
    /// Parse a two-letter country code (case-insensitive).
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TarryError::invalid(
                "country",
                format!("'{code}' is not a two-letter country code"),
            ));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Get the code as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// International calling code, if known.
    pub fn calling_code(&self) -> Option<&'static str> {
        CALLING_CODES
            .iter()
            .find(|(country, _)| *country == self.0)
            .map(|(_, code)| *code)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Country {
    type Error = TarryError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.0
    }
}

/// A telephony URN such as `tel:+593979123456`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Urn(String);

impl Urn {
    /// The scheme prefix of telephony URNs.
    pub const TEL_SCHEME: &'static str = "tel";

    /// Parse an already-formed `tel:` URN.
    pub fn parse(value: &str) -> Result<Self> {
        let path = value
            .strip_prefix("tel:")
            .ok_or_else(|| invalid_urn(value, "scheme must be 'tel'"))?;
        let digits = path
            .strip_prefix('+')
            .ok_or_else(|| invalid_urn(value, "number must be in E.164 format"))?;
        check_digits(value, digits)?;
        Ok(Self(value.to_string()))
    }

    /// Build a telephony URN from free text such as the output of a template.
    ///
    /// International numbers (`+...` or `00...`) are taken as-is. National
    /// numbers are resolved with `country`'s calling code after dropping a
    /// leading trunk `0`.
    pub fn from_phone(text: &str, country: Option<&Country>) -> Result<Self> {
        let trimmed = text.trim();
        let trimmed = trimmed.strip_prefix("tel:").unwrap_or(trimmed);
        let cleaned: String = trimmed
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
            .collect();

        if cleaned.is_empty() {
            return Err(invalid_urn(text, "not a possible number"));
        }

        let international = cleaned
            .strip_prefix('+')
            .or_else(|| cleaned.strip_prefix("00"));

        let digits = match international {
            Some(digits) => digits.to_string(),
            None => {
                let country = country
                    .ok_or_else(|| invalid_urn(text, "national number without a country"))?;
                let code = country.calling_code().ok_or_else(|| {
                    invalid_urn(text, &format!("no calling code known for {country}"))
                })?;
                let national = cleaned.strip_prefix('0').unwrap_or(&cleaned);
                format!("{code}{national}")
            }
        };

        check_digits(text, &digits)?;
        Ok(Self(format!("{}:+{}", Self::TEL_SCHEME, digits)))
    }

    /// The URN scheme (always `tel`).
    pub fn scheme(&self) -> &str {
        Self::TEL_SCHEME
    }

    /// The E.164 number including the leading `+`.
    pub fn path(&self) -> &str {
        &self.0[Self::TEL_SCHEME.len() + 1..]
    }

    /// Get the full URN as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Urn {
    type Error = TarryError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Urn> for String {
    fn from(urn: Urn) -> Self {
        urn.0
    }
}

fn check_digits(original: &str, digits: &str) -> Result<()> {
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid_urn(original, "contains non-digit characters"));
    }
    if digits.len() < MIN_PHONE_DIGITS {
        return Err(invalid_urn(original, "too short to be a phone number"));
    }
    if digits.len() > MAX_E164_DIGITS {
        return Err(invalid_urn(original, "too long to be a phone number"));
    }
    Ok(())
}

fn invalid_urn(value: &str, cause: &str) -> TarryError {
    TarryError::InvalidUrn {
        value: value.to_string(),
        cause: cause.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn international_numbers() {
        let urn = Urn::from_phone("+593979123456", None).unwrap();
        assert_eq!(urn.as_str(), "tel:+593979123456");
        assert_eq!(urn.path(), "+593979123456");

        let urn = Urn::from_phone(" +1 (206) 555-1212 ", None).unwrap();
        assert_eq!(urn.as_str(), "tel:+12065551212");

        let urn = Urn::from_phone("00250788123123", None).unwrap();
        assert_eq!(urn.as_str(), "tel:+250788123123");
    }

    #[test]
    fn national_numbers_use_country() {
        let ec = Country::parse("ec").unwrap();
        let urn = Urn::from_phone("0979123456", Some(&ec)).unwrap();
        assert_eq!(urn.as_str(), "tel:+593979123456");

        assert!(Urn::from_phone("0979123456", None).is_err());
        let unknown = Country::parse("ZZ").unwrap();
        assert!(Urn::from_phone("0979123456", Some(&unknown)).is_err());
    }

    #[test]
    fn rejects_impossible_numbers() {
        assert!(matches!(
            Urn::from_phone("", None),
            Err(TarryError::InvalidUrn { .. })
        ));
        assert!(Urn::from_phone("+12", None).is_err());
        assert!(Urn::from_phone("+1206555121x", None).is_err());
        assert!(Urn::from_phone("+1234567890123456", None).is_err());
    }

    #[test]
    fn parse_requires_tel_e164() {
        assert!(Urn::parse("tel:+593979123456").is_ok());
        assert!(Urn::parse("tel:0979123456").is_err());
        assert!(Urn::parse("mailto:bob@example.com").is_err());
    }

    #[test]
    fn serde_validates() {
        let urn: Urn = serde_json::from_str("\"tel:+12065551212\"").unwrap();
        assert_eq!(urn.as_str(), "tel:+12065551212");
        assert!(serde_json::from_str::<Urn>("\"tel:abc\"").is_err());
    }

    #[test]
    fn country_parse() {
        assert_eq!(Country::parse("us").unwrap().as_str(), "US");
        assert_eq!(Country::parse("US").unwrap().calling_code(), Some("1"));
        assert!(Country::parse("USA").is_err());
    }
}
