//! Domain Value Objects
//!
//! Immutable value types for the PoW domain.

use crate::error::{PowError, PowResult};
use primitive_types::U256;
use std::fmt;

/// Maximum allowed hash value (the difficulty threshold)
///
/// A digest qualifies when it is less than or equal to this value, so a
/// smaller value is harder and a larger value is easier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HashValue(U256);

impl HashValue {
    /// Hex width of a 256-bit value
    pub const HEX_LEN: usize = 64;

    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// Parse 1 to 64 hex characters (either case)
    pub fn from_hex(s: &str) -> PowResult<Self> {
        if s.is_empty() || s.len() > Self::HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PowError::InvalidHashValue(s.to_string()));
        }

        let padded = format!("{:0>width$}", s, width = Self::HEX_LEN);
        let bytes = hex::decode(&padded).map_err(|_| PowError::InvalidHashValue(s.to_string()))?;
        Ok(Self(U256::from_big_endian(&bytes)))
    }

    /// Render as 64 zero-padded uppercase hex characters
    pub fn to_hex(&self) -> String {
        let mut bytes = [0u8; 32];
        self.0.to_big_endian(&mut bytes);
        hex::encode_upper(bytes)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl From<U256> for HashValue {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<HashValue> for U256 {
    fn from(value: HashValue) -> Self {
        value.0
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_is_zero_padded_uppercase() {
        let value = HashValue::new(U256::from(0xabcu64));
        let hex = value.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.ends_with("ABC"));
        assert!(hex.starts_with("000000"));
    }

    #[test]
    fn test_parse_short_and_mixed_case() {
        assert_eq!(
            HashValue::from_hex("aBc").unwrap().as_u256(),
            U256::from(0xabcu64)
        );
        assert_eq!(
            HashValue::from_hex(&"F".repeat(64)).unwrap().as_u256(),
            U256::MAX
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(HashValue::from_hex("").is_err());
        assert!(HashValue::from_hex("xyz").is_err());
        assert!(HashValue::from_hex(&"0".repeat(65)).is_err());
    }
}
