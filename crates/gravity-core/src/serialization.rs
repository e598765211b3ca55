//! Serde helpers for configuration and snapshot files.
//!
//! These formats are for operators and tooling only. Nothing here feeds a
//! consensus hash.

/// Serializes a 256-bit target as a 64-digit big-endian hex string.
///
/// Deserialization accepts an optional `0x` prefix and any length up to 64
/// digits.
pub mod hex_biguint {
    use num_bigint::BigUint;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize `value` as zero-padded big-endian hex.
    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:064x}"))
    }

    /// Deserialize a big-endian hex string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let digits = raw.strip_prefix("0x").unwrap_or(&raw);
        if digits.is_empty() || digits.len() > 64 {
            return Err(D::Error::custom(format!(
                "expected 1..=64 hex digits, got {}",
                digits.len()
            )));
        }
        BigUint::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| D::Error::custom(format!("invalid hex target: {raw}")))
    }
}
