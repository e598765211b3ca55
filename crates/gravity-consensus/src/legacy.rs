// Consensus-critical. Changes require spec update + tests.
//! Legacy full-window linear retarget.
//!
//! Scales the previous target by `actual / pow_target_timespan` with the
//! ratio clamped to `[1/4, 4]`. Used for chain segments that predate the
//! adaptive algorithm and on networks with retargeting disabled.

use crate::compact::{decode_compact, encode_compact};
use gravity_core::{BlockIndexNode, ChainView, ConsensusParams};

/// Retarget from `last` given the timestamp of the first block of its window.
///
/// Returns `last.bits` untouched when `pow_no_retargeting` is set.
pub fn calculate_next_work_required(
    last: &BlockIndexNode,
    first_block_time: i64,
    params: &ConsensusParams,
) -> u32 {
    if params.pow_no_retargeting {
        return last.bits;
    }
    let timespan = params.pow_target_timespan;
    if timespan <= 0 {
        return last.bits;
    }

    let actual = last
        .time
        .saturating_sub(first_block_time)
        .max(timespan / 4)
        .min(timespan.saturating_mul(4));

    let mut target = decode_compact(last.bits).target;

    // Targets within one bit of the limit are shifted down around the
    // multiply, dropping their lowest bit exactly as 256-bit nodes do.
    let shift = params
        .pow_limit
        .bits()
        .checked_sub(1)
        .is_some_and(|limit_bits| target.bits() > limit_bits);
    if shift {
        target >>= 1u32;
    }
    target *= actual.unsigned_abs();
    target /= timespan.unsigned_abs();
    if shift {
        target <<= 1u32;
    }

    if target > params.pow_limit {
        target = params.pow_limit.clone();
    }
    encode_compact(&target)
}

/// Legacy retarget resolving the window start through `view`.
///
/// The window starts `difficulty_adjustment_interval() - 1` blocks below
/// `last`; if the view holds fewer blocks, its earliest block is used.
pub fn legacy_next_work_required<V>(
    view: &V,
    last: &BlockIndexNode,
    params: &ConsensusParams,
) -> u32
where
    V: ChainView + ?Sized,
{
    let depth = params.difficulty_adjustment_interval().saturating_sub(1).max(0);
    let depth = u32::try_from(depth).unwrap_or(u32::MAX);
    let first = view
        .ancestor(last, depth)
        .unwrap_or_else(|| view.earliest(last));
    calculate_next_work_required(last, first.time, params)
}
