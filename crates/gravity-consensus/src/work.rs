// Consensus-critical. Changes require spec update + tests.
//! Work represented by a compact target (heaviest-chain selection).

use crate::compact::target_from_compact;
use crate::error::ConsensusError;
use num_bigint::BigUint;
use num_traits::One;

/// Compute per-block work from compact `bits`.
///
/// Work is defined as `work = floor((2^256) / (target + 1))`.
pub fn block_proof(bits: u32) -> Result<BigUint, ConsensusError> {
    let target = target_from_compact(bits)?;
    let two_256 = BigUint::one() << 256u32;
    Ok(&two_256 / (&target + BigUint::one()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_monotonic_vs_target() {
        let easy = block_proof(0x207f_ffff).unwrap();
        let harder = block_proof(0x1e0f_ffff).unwrap();
        assert!(harder > easy, "harder target must yield more work");
    }

    #[test]
    fn bitcoin_genesis_work() {
        // 2^256 / (0xffff * 2^208 + 1) = 0x100010001
        assert_eq!(block_proof(0x1d00_ffff).unwrap(), BigUint::from(0x1_0001_0001u64));
    }

    #[test]
    fn easiest_target_is_two() {
        // 0x207fffff decodes to 0x7fffff << 232, just under 2^255.
        assert_eq!(block_proof(0x207f_ffff).unwrap(), BigUint::from(2u32));
    }

    #[test]
    fn invalid_bits_are_reported() {
        assert_eq!(block_proof(0), Err(ConsensusError::InvalidTarget));
        assert_eq!(block_proof(0x0480_0001), Err(ConsensusError::NegativeBits));
        assert_eq!(block_proof(0xff12_3456), Err(ConsensusError::OverflowBits));
    }
}
