// Consensus-critical. Changes require spec update + tests.
//! Canonical protocol types shared by the chain index and the PoW engine.

use crate::constants::*;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors related to parsing, validation, or construction of core protocol types.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Hex string had an unexpected byte length.
    #[error("invalid hex length: expected {expected} bytes, got {got} bytes")]
    InvalidHexLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes provided.
        got: usize,
    },

    /// Hex decoding failed.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// A chain snapshot was built from non-consecutive heights.
    #[error("non-contiguous block index: expected height {expected}, got {got}")]
    NonContiguousHeight {
        /// Height the next record had to carry.
        expected: u32,
        /// Height it actually carried.
        got: u32,
    },

    /// A value violated protocol constraints.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

/// Fixed-size 32-byte hash.
///
/// Bytes are stored most significant first, so the numeric magnitude used by
/// proof-of-work checks is `BigUint::from_bytes_be(&hash.0)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hash32(pub [u8; HASH32_LEN]);

impl Hash32 {
    /// Returns an all-zero hash.
    pub const fn zero() -> Self {
        Self([0u8; HASH32_LEN])
    }

    /// Returns the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; HASH32_LEN] {
        &self.0
    }

    /// Builds a hash from a little-endian digest (Bitcoin internal byte order).
    pub fn from_le_bytes(mut bytes: [u8; HASH32_LEN]) -> Self {
        bytes.reverse();
        Self(bytes)
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", hex::encode(self.0))
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl From<[u8; HASH32_LEN]> for Hash32 {
    fn from(value: [u8; HASH32_LEN]) -> Self {
        Self(value)
    }
}

impl From<Hash32> for [u8; HASH32_LEN] {
    fn from(value: Hash32) -> Self {
        value.0
    }
}

impl FromStr for Hash32 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != HASH32_LEN {
            return Err(CoreError::InvalidHexLength {
                expected: HASH32_LEN,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; HASH32_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

/// The fields of a block index entry the PoW engine reads.
///
/// Records are owned by the chain index; predecessors are reached through a
/// [`ChainView`](crate::ChainView) rather than a stored link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockIndexNode {
    /// Height of the block (genesis is 0).
    pub height: u32,
    /// Block timestamp in seconds.
    pub time: i64,
    /// Compact target the block was mined against.
    pub bits: u32,
}

impl BlockIndexNode {
    /// Creates an index record.
    pub const fn new(height: u32, time: i64, bits: u32) -> Self {
        Self { height, time, bits }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_parses_with_and_without_prefix() {
        let hex64 = "00000000000000000000000000000000000000000000000000000000000000ff";
        let a: Hash32 = hex64.parse().unwrap();
        let b: Hash32 = format!("0x{hex64}").parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.0[31], 0xff);
        assert_eq!(a.to_string(), hex64);
    }

    #[test]
    fn hash_rejects_wrong_length() {
        let err = "abcd".parse::<Hash32>().unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidHexLength { expected: 32, got: 2 }
        ));
    }

    #[test]
    fn little_endian_digest_is_reversed() {
        let mut le = [0u8; HASH32_LEN];
        le[0] = 0x01;
        let h = Hash32::from_le_bytes(le);
        assert_eq!(h.0[31], 0x01);
        assert_eq!(h.0[0], 0x00);
    }
}
