//! Member code value object (`MEM-####`)

use serde::{Deserialize, Serialize};
use std::fmt;

const PREFIX: &str = "MEM-";
const DIGITS: usize = 4;

/// Highest number representable in the four-digit code space
pub const MAX_MEMBER_NUMBER: u32 = 9_999;

/// Tenant-unique, human-facing member code
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    /// Parse and validate a code such as `MEM-0042`
    pub fn parse(value: impl AsRef<str>) -> Result<Self, MemberIdError> {
        let value = value.as_ref().trim();
        let digits = value
            .strip_prefix(PREFIX)
            .ok_or_else(|| MemberIdError::InvalidFormat(value.to_string()))?;

        if digits.len() != DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MemberIdError::InvalidFormat(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    /// Build the code for a sequence number
    pub fn from_number(number: u32) -> Result<Self, MemberIdError> {
        if number == 0 || number > MAX_MEMBER_NUMBER {
            return Err(MemberIdError::OutOfRange(number));
        }
        Ok(Self(format!("{PREFIX}{number:0>width$}", width = DIGITS)))
    }

    /// Numeric part of the code
    pub fn number(&self) -> u32 {
        self.0[PREFIX.len()..].parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MemberId {
    type Error = MemberIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemberIdError {
    #[error("invalid member id `{0}` (use MEM-XXXX)")]
    InvalidFormat(String),
    #[error("member number {0} does not fit the MEM-XXXX code space")]
    OutOfRange(u32),
}
