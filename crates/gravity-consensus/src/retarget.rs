// Consensus-critical. Changes require spec update + tests.
//! DeltaGravityWave adaptive difficulty retarget.
//!
//! Combines a short windowed average of recent targets with a clamped
//! timespan ratio, then eases the target sharply if the candidate block
//! arrives after an anomalously long gap. All target arithmetic is done in
//! arbitrary width and clamped to the pow limit only at the end.

use crate::compact::encode_compact;
use crate::observe::{Adjustment, LogObserver, ReliefApplied, RetargetEvent, RetargetObserver};
use crate::relief::relief_multiplier;
use crate::window::window_average;
use gravity_core::{BlockIndexNode, ChainView, ConsensusParams};
use num_bigint::BigUint;

/// Compact target required of the block following `last`.
///
/// `candidate_time` is the timestamp of the block being built or validated.
/// Events go to [`LogObserver`].
pub fn next_work_required<V>(
    view: &V,
    last: Option<&BlockIndexNode>,
    candidate_time: i64,
    params: &ConsensusParams,
) -> u32
where
    V: ChainView + ?Sized,
{
    delta_gravity_wave(view, last, candidate_time, params, &LogObserver)
}

/// Same as [`next_work_required`], reporting to `observer`.
pub fn next_work_required_observed<V, O>(
    view: &V,
    last: Option<&BlockIndexNode>,
    candidate_time: i64,
    params: &ConsensusParams,
    observer: &O,
) -> u32
where
    V: ChainView + ?Sized,
    O: RetargetObserver + ?Sized,
{
    delta_gravity_wave(view, last, candidate_time, params, observer)
}

/// The adaptive retarget.
///
/// 1. Without `past_blocks_min` blocks of history, return the pow limit.
/// 2. Average recent targets over the window and measure its timespan.
/// 3. Clamp the timespan to `[target/2, target*2]` and scale the average by
///    `actual / target`.
/// 4. If `candidate_time` is more than `long_gap_threshold` seconds after
///    `last`, multiply by the relief factor for `gap / long_gap_step` steps.
/// 5. Clamp to the pow limit and encode.
pub fn delta_gravity_wave<V, O>(
    view: &V,
    last: Option<&BlockIndexNode>,
    candidate_time: i64,
    params: &ConsensusParams,
    observer: &O,
) -> u32
where
    V: ChainView + ?Sized,
    O: RetargetObserver + ?Sized,
{
    let limit_bits = encode_compact(&params.pow_limit);
    let last = match last {
        Some(block) if block.height != 0 && block.height >= params.past_blocks_min => block,
        other => {
            observer.on_retarget(&RetargetEvent::Bootstrap {
                height: other.map(|b| b.height),
                bits: limit_bits,
            });
            return limit_bits;
        }
    };

    let window = window_average(view, last, params.past_blocks_min, params.past_blocks_max);

    let target_timespan = i64::from(window.count).saturating_mul(params.pow_target_spacing);
    if target_timespan <= 0 {
        // Only reachable with a non-positive spacing, which validation rejects.
        observer.on_retarget(&RetargetEvent::Bootstrap {
            height: Some(last.height),
            bits: limit_bits,
        });
        return limit_bits;
    }
    let clamped_timespan = window
        .actual_timespan
        .max(target_timespan / 2)
        .min(target_timespan.saturating_mul(2));

    let retargeted = &window.average * clamped_timespan.unsigned_abs()
        / target_timespan.unsigned_abs();

    let relief = long_gap_relief(last, candidate_time, params);
    let mut new_target = match &relief {
        Some(r) => &retargeted * &r.multiplier,
        None => retargeted.clone(),
    };

    if new_target > params.pow_limit {
        new_target = params.pow_limit.clone();
    }
    let bits = encode_compact(&new_target);

    observer.on_retarget(&RetargetEvent::Adjusted(Adjustment {
        height: last.height,
        window_count: window.count,
        actual_timespan: window.actual_timespan,
        clamped_timespan,
        target_timespan,
        average: &window.average,
        retargeted: &retargeted,
        relief: relief.as_ref(),
        new_target: &new_target,
        bits,
    }));

    bits
}

fn long_gap_relief(
    last: &BlockIndexNode,
    candidate_time: i64,
    params: &ConsensusParams,
) -> Option<ReliefApplied> {
    let gap = candidate_time.saturating_sub(last.time);
    if gap <= params.long_gap_threshold {
        return None;
    }
    let missed_steps = gap.checked_div(params.long_gap_step)?;
    // gap > threshold >= 0 and step > 0, so the quotient is non-negative.
    let missed_steps = u64::try_from(missed_steps).ok()?;
    Some(ReliefApplied {
        gap,
        missed_steps,
        multiplier: relief_multiplier(missed_steps, params.relief_curve),
    })
}
