//! Validated locker number.

use crate::error::InvalidLockerNumber;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number shown (and persisted) when the store holds no record.
pub const DEFAULT_LOCKER_NUMBER: &str = "1234";

/// Digit-only locker identifier.
///
/// Stored and compared as text: `0042` and `42` are different lockers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct LockerNumber(String);

impl LockerNumber {
    /// Parse a candidate number, rejecting empty or non-digit input.
    pub fn parse(input: &str) -> Result<Self, InvalidLockerNumber> {
        if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidLockerNumber);
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LockerNumber {
    fn default() -> Self {
        Self(DEFAULT_LOCKER_NUMBER.to_string())
    }
}

impl fmt::Display for LockerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LockerNumber {
    type Error = InvalidLockerNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LockerNumber> for String {
    fn from(value: LockerNumber) -> Self {
        value.0
    }
}
