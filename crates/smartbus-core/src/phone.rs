//! Phone number validation.
//!
//! Only the bare 10-digit national format is accepted. Country prefixes are a
//! delivery concern and are added by the gateway, never by the caller.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{OtpError, Result};

// `\d` would also match non-ASCII digits.
static PHONE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone number regex is valid"));

/// Returns `true` if `value` is exactly 10 ASCII digits.
#[must_use]
pub fn is_valid_phone_number(value: &str) -> bool {
    PHONE_NUMBER_RE.is_match(value)
}

/// Log-safe rendering of any phone-like string: all but the last four
/// characters are replaced by `*`. Strings of four characters or fewer are
/// fully hidden.
#[must_use]
pub fn mask(value: &str) -> String {
    let len = value.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let visible: String = value.chars().skip(len - 4).collect();
    format!("{}{visible}", "*".repeat(len - 4))
}

/// A validated 10-digit phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate and wrap a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::InvalidPhoneNumber`] unless `value` is exactly 10 ASCII digits.
    pub fn parse(value: &str) -> Result<Self> {
        if is_valid_phone_number(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(OtpError::InvalidPhoneNumber)
        }
    }

    /// The raw digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe rendering that keeps only the last four digits, e.g. `******3210`.
    #[must_use]
    pub fn masked(&self) -> String {
        mask(&self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
