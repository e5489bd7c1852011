//! Account addresses.
//!
//! An [`Address`] identifies the party that owns or acts on a capsule. It is
//! the 20-byte account identity used by the ledger, written as `0x` followed
//! by 40 hex digits. Parsing validates the format only; whether an account
//! actually exists is the ledger's business.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A ledger account address: 20 bytes, rendered as `0x` + 40 hex digits.
///
/// Comparison is case-insensitive; the canonical form is lowercase.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must start with 0x")]
    MissingPrefix,
    #[error("address must be 40 hex digits, got {0}")]
    BadLength(usize),
    #[error("address contains non-hex characters")]
    BadDigit,
}

impl Address {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Canonical lowercase `0x...` form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Abbreviated display form: first and last few digits, `0x1234...abcd`.
    pub fn short(&self) -> String {
        let full = self.to_hex();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").ok_or(AddressError::MissingPrefix)?;
        if digits.len() != 40 {
            return Err(AddressError::BadLength(digits.len()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits.to_ascii_lowercase(), &mut bytes)
            .map_err(|_| AddressError::BadDigit)?;
        Ok(Self(bytes))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x00a329c0648769a73afac7f9381e08fb43dbea72";

    #[test]
    fn test_parse_roundtrip() {
        let addr: Address = ALICE.parse().unwrap();
        assert_eq!(addr.to_hex(), ALICE);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let lower: Address = ALICE.parse().unwrap();
        let upper: Address = ALICE.to_uppercase().replace("0X", "0x").parse().unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            "00a329c0648769a73afac7f9381e08fb43dbea72".parse::<Address>(),
            Err(AddressError::MissingPrefix)
        );
        assert_eq!(
            "0x00a329".parse::<Address>(),
            Err(AddressError::BadLength(6))
        );
        assert_eq!(
            "0xzza329c0648769a73afac7f9381e08fb43dbea72".parse::<Address>(),
            Err(AddressError::BadDigit)
        );
    }

    #[test]
    fn test_short_form() {
        let addr: Address = ALICE.parse().unwrap();
        assert_eq!(addr.short(), "0x00a3...ea72");
    }

    #[test]
    fn test_serde_string_form() {
        let addr: Address = ALICE.parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", ALICE));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
