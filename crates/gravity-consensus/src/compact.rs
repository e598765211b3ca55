// Consensus-critical. Changes require spec update + tests.
//! Compact target encoding.
//!
//! `bits` packs a 256-bit target as a base-256 float:
//!
//! - size     = bits >> 24 (number of significant bytes)
//! - mantissa = bits & 0x007fffff
//! - sign     = bits & 0x00800000
//!
//! target = mantissa * 256^(size - 3)
//!
//! Decoding reports the sign and overflow conditions instead of rejecting
//! them, so callers can apply their own rule. Encoding always produces the
//! normalized form, which is what every node writes into headers.

use crate::error::ConsensusError;
use gravity_core::TARGET_BITS;
use num_bigint::BigUint;
use num_traits::{One, Zero};

const SIGN_BIT: u32 = 0x0080_0000;
const MANTISSA_MASK: u32 = 0x007f_ffff;

/// Result of decoding compact `bits`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedCompact {
    /// Decoded magnitude, reduced modulo 2^256 like a fixed-width register.
    pub target: BigUint,
    /// Sign bit set on a non-zero mantissa.
    pub negative: bool,
    /// Magnitude does not fit in 256 bits.
    pub overflow: bool,
}

impl DecodedCompact {
    /// True if the target is usable as a PoW threshold (positive, in range).
    pub fn is_valid(&self) -> bool {
        !self.negative && !self.overflow && !self.target.is_zero()
    }
}

/// Decode compact `bits`.
pub fn decode_compact(bits: u32) -> DecodedCompact {
    let size = bits >> 24;
    let word = bits & MANTISSA_MASK;

    let target = if size <= 3 {
        BigUint::from(word >> (8 * (3 - size)))
    } else {
        truncate_to_256(BigUint::from(word) << (8 * (size - 3)))
    };

    let negative = word != 0 && (bits & SIGN_BIT) != 0;
    let overflow =
        word != 0 && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));

    DecodedCompact {
        target,
        negative,
        overflow,
    }
}

/// Encode a target into normalized compact `bits`.
///
/// Inputs wider than 256 bits are reduced modulo 2^256 first; the retarget
/// paths always clamp to the pow limit before encoding.
pub fn encode_compact(target: &BigUint) -> u32 {
    let reduced;
    let target = if target.bits() > TARGET_BITS {
        reduced = truncate_to_256(target.clone());
        &reduced
    } else {
        target
    };

    // At most 32 bytes here, so the casts below cannot truncate.
    let mut size = ((target.bits() + 7) / 8) as u32;
    let mut compact = if size <= 3 {
        (low_u64(target) << (8 * (3 - size))) as u32
    } else {
        low_u64(&(target >> (8 * (size - 3)))) as u32
    };

    // The sign bit is reserved: move the mantissa down a byte instead.
    if compact & SIGN_BIT != 0 {
        compact >>= 8;
        size += 1;
    }
    compact | (size << 24)
}

/// Decode compact `bits`, rejecting negative, overflowing and zero targets.
pub fn target_from_compact(bits: u32) -> Result<BigUint, ConsensusError> {
    let decoded = decode_compact(bits);
    if decoded.negative {
        return Err(ConsensusError::NegativeBits);
    }
    if decoded.overflow {
        return Err(ConsensusError::OverflowBits);
    }
    if decoded.target.is_zero() {
        return Err(ConsensusError::InvalidTarget);
    }
    Ok(decoded.target)
}

fn low_u64(value: &BigUint) -> u64 {
    value.iter_u64_digits().next().unwrap_or(0)
}

fn truncate_to_256(value: BigUint) -> BigUint {
    if value.bits() <= TARGET_BITS {
        return value;
    }
    let mask = (BigUint::one() << TARGET_BITS) - 1u32;
    value & mask
}
