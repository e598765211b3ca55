//! Observability sink for retarget decisions.
//!
//! The retarget code reports what it computed through [`RetargetObserver`];
//! observers only see the facts and cannot change the outcome.

use log::{debug, info};
use num_bigint::BigUint;

const LOG_TARGET: &str = "gravity::retarget";

/// Long-gap relief applied to a retarget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReliefApplied {
    /// Seconds between the starting block and the candidate.
    pub gap: i64,
    /// `gap / long_gap_step`.
    pub missed_steps: u64,
    /// Factor the retargeted target was multiplied by.
    pub multiplier: BigUint,
}

/// Facts about one adaptive retarget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adjustment<'a> {
    /// Height of the starting block.
    pub height: u32,
    /// Blocks walked by the window.
    pub window_count: u32,
    /// Raw elapsed seconds over the window.
    pub actual_timespan: i64,
    /// Elapsed seconds after clamping.
    pub clamped_timespan: i64,
    /// `window_count * pow_target_spacing`.
    pub target_timespan: i64,
    /// Windowed average target.
    pub average: &'a BigUint,
    /// Target after the timespan ratio, before relief and clamping.
    pub retargeted: &'a BigUint,
    /// Relief, if the gap exceeded the threshold.
    pub relief: Option<&'a ReliefApplied>,
    /// Final target after the pow-limit clamp.
    pub new_target: &'a BigUint,
    /// Encoded result.
    pub bits: u32,
}

/// What the adaptive retarget reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RetargetEvent<'a> {
    /// Not enough history; the pow limit was returned.
    Bootstrap {
        /// Height of the starting block, if there was one.
        height: Option<u32>,
        /// Encoded pow limit.
        bits: u32,
    },
    /// A full computation ran.
    Adjusted(Adjustment<'a>),
}

/// Receives retarget facts.
pub trait RetargetObserver {
    /// Called once per retarget, after the result is fixed.
    fn on_retarget(&self, event: &RetargetEvent<'_>);
}

impl<F> RetargetObserver for F
where
    F: Fn(&RetargetEvent<'_>),
{
    fn on_retarget(&self, event: &RetargetEvent<'_>) {
        self(event)
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RetargetObserver for NoopObserver {
    fn on_retarget(&self, _event: &RetargetEvent<'_>) {}
}

/// Forwards events to the `log` facade under `gravity::retarget`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl RetargetObserver for LogObserver {
    fn on_retarget(&self, event: &RetargetEvent<'_>) {
        match event {
            RetargetEvent::Bootstrap { height, bits } => {
                debug!(target: LOG_TARGET,
                    "insufficient history at height {:?}, using pow limit {:08x}",
                    height, bits
                );
            }
            RetargetEvent::Adjusted(adj) => {
                if let Some(relief) = adj.relief {
                    info!(target: LOG_TARGET,
                        "block gap of {}s ({} missed steps), relief x{}: target cut to {:08x}",
                        relief.gap, relief.missed_steps, relief.multiplier, adj.bits
                    );
                }
                debug!(target: LOG_TARGET,
                    "height {} bits {:08x} window {} actual {}s (clamped {}s) target {}s before {:064x} after {:064x}",
                    adj.height,
                    adj.bits,
                    adj.window_count,
                    adj.actual_timespan,
                    adj.clamped_timespan,
                    adj.target_timespan,
                    adj.average,
                    adj.new_target
                );
            }
        }
    }
}
