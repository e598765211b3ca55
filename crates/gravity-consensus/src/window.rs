// Consensus-critical. Changes require spec update + tests.
//! Windowed target average used by the adaptive retarget.

use crate::compact::decode_compact;
use gravity_core::{BlockIndexNode, ChainView};
use num_bigint::BigUint;
use num_traits::Zero;

/// Output of [`window_average`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowAverage {
    /// Running weighted average of the first `past_blocks_min` targets.
    pub average: BigUint,
    /// Seconds between the starting block and the last block walked.
    pub actual_timespan: i64,
    /// Blocks walked, starting block included.
    pub count: u32,
}

/// Walk back from `start` and average the targets of recent blocks.
///
/// The walk visits at most `past_blocks_max` blocks (0 means unbounded) and
/// stops before genesis or at the first block the view cannot resolve. Only
/// the first `past_blocks_min` blocks feed the average, with the recurrence
///
/// ```text
/// avg_1 = target_1
/// avg_k = (avg_{k-1} * k + target_k) / (k + 1)
/// ```
///
/// while every visited block contributes to the timespan.
pub fn window_average<V>(
    view: &V,
    start: &BlockIndexNode,
    past_blocks_min: u32,
    past_blocks_max: u32,
) -> WindowAverage
where
    V: ChainView + ?Sized,
{
    let mut average = BigUint::zero();
    let mut actual_timespan = 0i64;
    let mut last_block_time = 0i64;
    let mut count = 0u32;

    let mut reading = Some(start);
    while let Some(block) = reading {
        if block.height == 0 {
            break;
        }
        if past_blocks_max > 0 && count >= past_blocks_max {
            break;
        }
        count += 1;

        if count <= past_blocks_min {
            let target = decode_compact(block.bits).target;
            average = if count == 1 {
                target
            } else {
                (average * count + target) / (count + 1)
            };
        }

        // A non-positive timestamp never opens an interval.
        if last_block_time > 0 {
            let diff = last_block_time.saturating_sub(block.time);
            actual_timespan = actual_timespan.saturating_add(diff);
        }
        last_block_time = block.time;

        reading = view.predecessor(block);
    }

    WindowAverage {
        average,
        actual_timespan,
        count,
    }
}
