//! Property-based tests using proptest.
//!
//! These check the retarget and codec invariants over randomly generated
//! chains, timestamps and targets.

use gravity_consensus::{
    calculate_next_work_required, check_proof_of_work, decode_compact, delta_gravity_wave,
    encode_compact, window_average, NoopObserver,
};
use gravity_core::{BlockIndexNode, ChainSnapshot, ConsensusParams, Hash32, RetargetRegime};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use proptest::prelude::*;

const T0: i64 = 1_700_000_000;

// ============================================================================
// Strategies
// ============================================================================

fn arb_regime() -> impl Strategy<Value = RetargetRegime> {
    prop_oneof![
        Just(RetargetRegime::FourBlock),
        Just(RetargetRegime::FourBlockLongGap),
        Just(RetargetRegime::TwentyBlock),
    ]
}

/// Random target at or below the mainnet pow limit, in normalized compact form.
fn arb_bits() -> impl Strategy<Value = u32> {
    (prop::array::uniform32(any::<u8>()), 0u32..64).prop_map(|(bytes, shift)| {
        let limit = ConsensusParams::mainnet().pow_limit;
        let target = (BigUint::from_bytes_be(&bytes) & limit) >> shift;
        encode_compact(&target)
    })
}

/// Random 256-bit magnitude.
fn arb_magnitude() -> impl Strategy<Value = BigUint> {
    prop::array::uniform32(any::<u8>()).prop_map(|bytes| BigUint::from_bytes_be(&bytes))
}

prop_compose! {
    /// Contiguous chain with jittered (possibly negative) spacing.
    fn arb_chain()(
        base in 0u32..50,
        rows in prop::collection::vec((-600i64..5_000, arb_bits()), 1..40),
    ) -> ChainSnapshot {
        let mut time = T0;
        let blocks = rows
            .into_iter()
            .enumerate()
            .map(|(i, (spacing, bits))| {
                time += spacing;
                BlockIndexNode::new(base + i as u32, time, bits)
            })
            .collect();
        ChainSnapshot::from_blocks(blocks).unwrap()
    }
}

fn uniform_chain(len: u32, spacing: i64, bits: u32) -> ChainSnapshot {
    let blocks = (0..len)
        .map(|h| BlockIndexNode::new(h, T0 + i64::from(h) * spacing, bits))
        .collect();
    ChainSnapshot::from_blocks(blocks).unwrap()
}

fn dgw(chain: &ChainSnapshot, candidate_time: i64, params: &ConsensusParams) -> u32 {
    delta_gravity_wave(chain, chain.tip(), candidate_time, params, &NoopObserver)
}

fn hash_of(value: &BigUint) -> Hash32 {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    Hash32(out)
}

// ============================================================================
// Retarget properties
// ============================================================================

proptest! {
    #[test]
    fn adaptive_output_never_exceeds_pow_limit(
        chain in arb_chain(),
        delay in -1_000_000i64..100_000_000,
        regime in arb_regime(),
    ) {
        let params = ConsensusParams::mainnet().with_regime(regime);
        let tip = *chain.tip().unwrap();
        let bits = dgw(&chain, tip.time + delay, &params);
        prop_assert!(decode_compact(bits).target <= params.pow_limit);
    }

    #[test]
    fn legacy_output_never_exceeds_pow_limit(
        bits in arb_bits(),
        elapsed in -10_000_000i64..10_000_000,
    ) {
        let params = ConsensusParams::mainnet();
        let last = BlockIndexNode::new(10_000, T0 + elapsed, bits);
        let out = calculate_next_work_required(&last, T0, &params);
        prop_assert!(decode_compact(out).target <= params.pow_limit);
    }

    #[test]
    fn short_history_bootstraps_to_pow_limit(
        tip_height in 0u32..4,
        candidate_time in any::<i64>(),
        bits in arb_bits(),
    ) {
        let params = ConsensusParams::mainnet();
        let chain = uniform_chain(tip_height + 1, 120, bits);
        prop_assert_eq!(dgw(&chain, candidate_time, &params), encode_compact(&params.pow_limit));
    }

    #[test]
    fn gap_within_threshold_gets_no_relief(
        chain in arb_chain(),
        gap in -1_000_000i64..=600,
    ) {
        let params = ConsensusParams::mainnet();
        let tip = *chain.tip().unwrap();
        prop_assert_eq!(dgw(&chain, tip.time + gap, &params), dgw(&chain, tip.time, &params));
    }

    #[test]
    fn timespan_clamp_is_idempotent(
        bits in arb_bits(),
        slow in 320i64..1_000_000,
        fast in -1_000_000i64..=80,
    ) {
        // Four blocks span three intervals against a 480s target span:
        // 320s spacing hits the 960s ceiling and 80s the 240s floor.
        let params = ConsensusParams::mainnet();
        let at_ceiling = uniform_chain(20, 320, bits);
        let at_floor = uniform_chain(20, 80, bits);
        let probe = |chain: &ChainSnapshot| dgw(chain, chain.tip().unwrap().time, &params);
        prop_assert_eq!(probe(&uniform_chain(20, slow, bits)), probe(&at_ceiling));
        prop_assert_eq!(probe(&uniform_chain(20, fast, bits)), probe(&at_floor));
    }

    #[test]
    fn no_retargeting_returns_bits_unchanged(
        bits in any::<u32>(),
        time in any::<i64>(),
        first_block_time in any::<i64>(),
    ) {
        let params = ConsensusParams::regtest();
        let last = BlockIndexNode::new(500, time, bits);
        prop_assert_eq!(calculate_next_work_required(&last, first_block_time, &params), bits);
    }

    #[test]
    fn window_respects_max_and_genesis(
        chain in arb_chain(),
        min in 1u32..30,
        extra in 0u32..10,
    ) {
        let max = min + extra;
        let tip = *chain.tip().unwrap();
        let w = window_average(&chain, &tip, min, max);
        prop_assert!(w.count <= max);
        prop_assert!(w.count <= tip.height);
        prop_assert!(w.count as usize <= chain.len());
    }
}

// ============================================================================
// Codec and validator properties
// ============================================================================

proptest! {
    #[test]
    fn encoded_targets_round_trip(x in arb_magnitude()) {
        let bits = encode_compact(&x);
        let normalized = decode_compact(bits).target;
        prop_assert!(normalized <= x);
        prop_assert_eq!(encode_compact(&normalized), bits);
        prop_assert_eq!(decode_compact(encode_compact(&normalized)).target, normalized);
    }

    #[test]
    fn encoded_bits_are_never_flagged(x in arb_magnitude()) {
        let decoded = decode_compact(encode_compact(&x));
        prop_assert!(!decoded.negative);
        prop_assert!(!decoded.overflow);
    }

    #[test]
    fn pow_boundary_is_inclusive(bits in arb_bits()) {
        let params = ConsensusParams::mainnet();
        let target = decode_compact(bits).target;
        prop_assume!(!target.is_zero());
        prop_assert!(check_proof_of_work(&hash_of(&target), bits, &params));
        prop_assert!(!check_proof_of_work(&hash_of(&(&target + BigUint::one())), bits, &params));
    }
}
