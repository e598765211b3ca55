// Consensus-critical. Changes require spec update + tests.
//! Proof-of-work validation.
//!
//! The PoW condition is:
//!     hash_as_u256 <= target(bits) <= pow_limit
//!
//! Hash bytes are read most significant first. Digests produced in the
//! little-endian convention go through [`Hash32::from_le_bytes`] first.

use crate::compact::decode_compact;
use crate::error::ConsensusError;
use gravity_core::{ConsensusParams, Hash32};
use num_bigint::BigUint;

/// Numeric magnitude of a hash.
pub fn hash_to_target(hash: &Hash32) -> BigUint {
    BigUint::from_bytes_be(hash.as_bytes())
}

/// Return true if `hash <= target`.
pub fn hash_meets_target(hash: &Hash32, target: &BigUint) -> bool {
    hash_to_target(hash) <= *target
}

/// Check `hash` against the target encoded in `bits`.
///
/// Negative, overflowing and zero targets fail, as does any target easier
/// than `params.pow_limit`. The cause is not reported.
pub fn check_proof_of_work(hash: &Hash32, bits: u32, params: &ConsensusParams) -> bool {
    let decoded = decode_compact(bits);
    if !decoded.is_valid() || decoded.target > params.pow_limit {
        return false;
    }
    hash_meets_target(hash, &decoded.target)
}

/// [`check_proof_of_work`] for `?` callers; every failure is
/// [`ConsensusError::InsufficientPoW`].
pub fn require_proof_of_work(
    hash: &Hash32,
    bits: u32,
    params: &ConsensusParams,
) -> Result<(), ConsensusError> {
    if check_proof_of_work(hash, bits, params) {
        Ok(())
    } else {
        Err(ConsensusError::InsufficientPoW)
    }
}
