//! Protocol-wide constants for the Gravity PoW engine.

/// Length in bytes of a 32-byte hash.
pub const HASH32_LEN: usize = 32;

/// Width in bits of a difficulty target.
pub const TARGET_BITS: u64 = 256;

/// Mainnet block spacing target in seconds.
pub const MAINNET_TARGET_SPACING_SECS: i64 = 2 * 60;

/// Mainnet legacy retarget window in seconds (one day).
pub const MAINNET_TARGET_TIMESPAN_SECS: i64 = 24 * 60 * 60;

/// Mainnet easiest target, big-endian.
///
/// `0x00000fffff...ff`, encoded as compact `0x1e0fffff`.
pub const MAINNET_POW_LIMIT_BYTES: [u8; HASH32_LEN] = [
    0x00, 0x00, 0x0f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

/// Regtest easiest target, big-endian (`0x7fffff...ff`, compact `0x207fffff`).
pub const REGTEST_POW_LIMIT_BYTES: [u8; HASH32_LEN] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

/// Missed steps at or below which long-gap relief scales linearly.
pub const RELIEF_LINEAR_STEPS: u64 = 5;

/// Numerator of the relief growth factor (1.14 = 114 / 100).
pub const RELIEF_GROWTH_NUM: u32 = 114;

/// Denominator of the relief growth factor.
pub const RELIEF_GROWTH_DEN: u32 = 100;

/// Exponent from which `1.14^k` exceeds `2^256`; any larger multiplier
/// already pushes every non-zero target past the pow limit.
pub const RELIEF_SATURATION_EXPONENT: u64 = 1_400;

/// Shift used as the saturated relief multiplier (`2^260`).
pub const RELIEF_SATURATED_SHIFT: u32 = 260;
