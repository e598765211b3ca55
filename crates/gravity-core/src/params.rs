// Consensus-critical. Changes require spec update + tests.
//! Consensus parameters for difficulty retargeting and PoW checks.
//!
//! Every constant the retarget algorithms read lives here as a field. The
//! historical DeltaGravityWave deployments disagree on the window size and
//! the long-gap threshold/step pair, so those come as named
//! [`RetargetRegime`] presets instead of literals in the algorithm.

use crate::constants::*;
use core::fmt;
use core::str::FromStr;
use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameter sets rejected by [`ConsensusParams::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamsError {
    /// Pow limit is zero.
    #[error("pow limit must be non-zero")]
    ZeroPowLimit,

    /// Pow limit does not fit in 256 bits.
    #[error("pow limit exceeds 256 bits ({0} bits)")]
    PowLimitTooWide(u64),

    /// Block spacing must be positive.
    #[error("target spacing must be positive, got {0}")]
    NonPositiveSpacing(i64),

    /// Legacy timespan must be a positive multiple of the spacing.
    #[error("target timespan {timespan} is not a positive multiple of spacing {spacing}")]
    TimespanNotMultiple {
        /// Configured timespan.
        timespan: i64,
        /// Configured spacing.
        spacing: i64,
    },

    /// Window bounds are inverted or empty.
    #[error("invalid averaging window: min {min}, max {max}")]
    InvalidWindow {
        /// Configured `past_blocks_min`.
        min: u32,
        /// Configured `past_blocks_max`.
        max: u32,
    },

    /// Long-gap step must be positive.
    #[error("long-gap step must be positive, got {0}")]
    NonPositiveGapStep(i64),

    /// Long-gap threshold must not be negative.
    #[error("long-gap threshold must not be negative, got {0}")]
    NegativeGapThreshold(i64),

    /// Unknown network or regime name.
    #[error("unknown {kind}: {name}")]
    UnknownName {
        /// What was being parsed.
        kind: &'static str,
        /// The rejected input.
        name: String,
    },
}

/// How the exponential part of long-gap relief is evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReliefCurve {
    /// `round_half_up(114^k / 100^k)` in exact integer arithmetic.
    #[default]
    Exact,
    /// Replays the historical single-precision evaluation, including the
    /// truncation of the multiplier to 32 bits. Only for re-validating
    /// chain segments produced by nodes that used it.
    LegacyFloat,
}

impl ReliefCurve {
    /// Stable name used by config files and the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            ReliefCurve::Exact => "exact",
            ReliefCurve::LegacyFloat => "legacy_float",
        }
    }
}

impl fmt::Display for ReliefCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReliefCurve {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(ReliefCurve::Exact),
            "legacy_float" | "legacy-float" => Ok(ReliefCurve::LegacyFloat),
            other => Err(ParamsError::UnknownName {
                kind: "relief curve",
                name: other.to_string(),
            }),
        }
    }
}

/// Named window and long-gap constants used by historical deployments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RetargetRegime {
    /// 4-block window, relief after 10 minutes in 4-minute steps.
    FourBlock,
    /// 4-block window, relief after 32 minutes in 4-minute steps.
    FourBlockLongGap,
    /// 20..24-block window, relief after 32 minutes in 15-minute steps.
    TwentyBlock,
}

impl RetargetRegime {
    /// `(past_blocks_min, past_blocks_max, long_gap_threshold, long_gap_step)`.
    pub const fn constants(self) -> (u32, u32, i64, i64) {
        match self {
            RetargetRegime::FourBlock => (4, 4, 2 * 5 * 60, 4 * 60),
            RetargetRegime::FourBlockLongGap => (4, 4, 32 * 60, 4 * 60),
            RetargetRegime::TwentyBlock => (20, 24, 32 * 60, 15 * 60),
        }
    }

    /// Stable name used by config files and the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            RetargetRegime::FourBlock => "four-block",
            RetargetRegime::FourBlockLongGap => "four-block-long-gap",
            RetargetRegime::TwentyBlock => "twenty-block",
        }
    }
}

impl fmt::Display for RetargetRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RetargetRegime {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            RetargetRegime::FourBlock,
            RetargetRegime::FourBlockLongGap,
            RetargetRegime::TwentyBlock,
        ]
        .into_iter()
        .find(|r| r.name() == s)
        .ok_or_else(|| ParamsError::UnknownName {
            kind: "retarget regime",
            name: s.to_string(),
        })
    }
}

/// Networks with built-in parameter presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Production network.
    Mainnet,
    /// Public test network.
    Testnet,
    /// Local regression-test network; retargeting disabled.
    Regtest,
}

impl FromStr for Network {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(ParamsError::UnknownName {
                kind: "network",
                name: other.to_string(),
            }),
        }
    }
}

/// Immutable consensus configuration read by the PoW engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConsensusParams {
    /// Easiest permissible target.
    #[cfg_attr(feature = "serde", serde(with = "crate::serialization::hex_biguint"))]
    pub pow_limit: BigUint,
    /// Ideal seconds between blocks.
    pub pow_target_spacing: i64,
    /// Full window span of the legacy retarget, in seconds.
    pub pow_target_timespan: i64,
    /// Legacy retarget returns the previous bits unchanged when set.
    pub pow_no_retargeting: bool,
    /// Minimum history before the adaptive algorithm leaves bootstrap, and
    /// the number of blocks folded into its running average.
    pub past_blocks_min: u32,
    /// Upper bound on blocks walked by the adaptive algorithm.
    pub past_blocks_max: u32,
    /// Seconds since the previous block after which relief applies.
    pub long_gap_threshold: i64,
    /// Seconds per missed step once relief applies.
    pub long_gap_step: i64,
    /// Evaluation of the exponential relief multiplier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub relief_curve: ReliefCurve,
}

impl ConsensusParams {
    /// Preset for `network`.
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::mainnet(),
            Network::Testnet => Self::testnet(),
            Network::Regtest => Self::regtest(),
        }
    }

    /// Mainnet preset.
    pub fn mainnet() -> Self {
        Self::from_parts(
            BigUint::from_bytes_be(&MAINNET_POW_LIMIT_BYTES),
            MAINNET_TARGET_SPACING_SECS,
            MAINNET_TARGET_TIMESPAN_SECS,
            false,
            RetargetRegime::FourBlock,
        )
    }

    /// Testnet preset: mainnet timing with the long-gap regime.
    pub fn testnet() -> Self {
        Self::from_parts(
            BigUint::from_bytes_be(&MAINNET_POW_LIMIT_BYTES),
            MAINNET_TARGET_SPACING_SECS,
            MAINNET_TARGET_TIMESPAN_SECS,
            false,
            RetargetRegime::FourBlockLongGap,
        )
    }

    /// Regtest preset: trivially easy limit, retargeting disabled.
    pub fn regtest() -> Self {
        Self::from_parts(
            BigUint::from_bytes_be(&REGTEST_POW_LIMIT_BYTES),
            MAINNET_TARGET_SPACING_SECS,
            MAINNET_TARGET_TIMESPAN_SECS,
            true,
            RetargetRegime::FourBlock,
        )
    }

    fn from_parts(
        pow_limit: BigUint,
        spacing: i64,
        timespan: i64,
        no_retargeting: bool,
        regime: RetargetRegime,
    ) -> Self {
        let (past_blocks_min, past_blocks_max, long_gap_threshold, long_gap_step) =
            regime.constants();
        Self {
            pow_limit,
            pow_target_spacing: spacing,
            pow_target_timespan: timespan,
            pow_no_retargeting: no_retargeting,
            past_blocks_min,
            past_blocks_max,
            long_gap_threshold,
            long_gap_step,
            relief_curve: ReliefCurve::Exact,
        }
    }

    /// Replaces the window and long-gap constants with `regime`'s.
    pub fn with_regime(mut self, regime: RetargetRegime) -> Self {
        let (min, max, threshold, step) = regime.constants();
        self.past_blocks_min = min;
        self.past_blocks_max = max;
        self.long_gap_threshold = threshold;
        self.long_gap_step = step;
        self
    }

    /// Replaces the relief curve.
    pub fn with_relief_curve(mut self, curve: ReliefCurve) -> Self {
        self.relief_curve = curve;
        self
    }

    /// Blocks per legacy retarget window.
    pub fn difficulty_adjustment_interval(&self) -> i64 {
        if self.pow_target_spacing <= 0 {
            return 0;
        }
        self.pow_target_timespan / self.pow_target_spacing
    }

    /// Checks the invariants the retarget algorithms rely on.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.pow_limit.is_zero() {
            return Err(ParamsError::ZeroPowLimit);
        }
        if self.pow_limit.bits() > TARGET_BITS {
            return Err(ParamsError::PowLimitTooWide(self.pow_limit.bits()));
        }
        if self.pow_target_spacing <= 0 {
            return Err(ParamsError::NonPositiveSpacing(self.pow_target_spacing));
        }
        if self.pow_target_timespan <= 0 || self.pow_target_timespan % self.pow_target_spacing != 0
        {
            return Err(ParamsError::TimespanNotMultiple {
                timespan: self.pow_target_timespan,
                spacing: self.pow_target_spacing,
            });
        }
        if self.past_blocks_max == 0 || self.past_blocks_min > self.past_blocks_max {
            return Err(ParamsError::InvalidWindow {
                min: self.past_blocks_min,
                max: self.past_blocks_max,
            });
        }
        if self.long_gap_step <= 0 {
            return Err(ParamsError::NonPositiveGapStep(self.long_gap_step));
        }
        if self.long_gap_threshold < 0 {
            return Err(ParamsError::NegativeGapThreshold(self.long_gap_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for network in [Network::Mainnet, Network::Testnet, Network::Regtest] {
            ConsensusParams::for_network(network)
                .validate()
                .expect("preset must validate");
        }
        for regime in [
            RetargetRegime::FourBlock,
            RetargetRegime::FourBlockLongGap,
            RetargetRegime::TwentyBlock,
        ] {
            ConsensusParams::mainnet()
                .with_regime(regime)
                .validate()
                .expect("regime must validate");
        }
    }

    #[test]
    fn regime_names_roundtrip() {
        for regime in [
            RetargetRegime::FourBlock,
            RetargetRegime::FourBlockLongGap,
            RetargetRegime::TwentyBlock,
        ] {
            assert_eq!(regime.name().parse::<RetargetRegime>(), Ok(regime));
        }
        assert!("dgw-v9".parse::<RetargetRegime>().is_err());
    }

    #[test]
    fn relief_curve_names_parse() {
        assert_eq!("exact".parse::<ReliefCurve>(), Ok(ReliefCurve::Exact));
        assert_eq!("legacy-float".parse::<ReliefCurve>(), Ok(ReliefCurve::LegacyFloat));
        assert_eq!(ReliefCurve::LegacyFloat.to_string(), "legacy_float");
        assert_eq!(ReliefCurve::default(), ReliefCurve::Exact);
    }

    #[test]
    fn regimes_carry_distinct_constants() {
        let p = ConsensusParams::mainnet().with_regime(RetargetRegime::TwentyBlock);
        assert_eq!(p.past_blocks_min, 20);
        assert_eq!(p.past_blocks_max, 24);
        assert_eq!(p.long_gap_threshold, 1920);
        assert_eq!(p.long_gap_step, 900);

        let p = ConsensusParams::mainnet();
        assert_eq!((p.past_blocks_min, p.past_blocks_max), (4, 4));
        assert_eq!((p.long_gap_threshold, p.long_gap_step), (600, 240));
    }

    #[test]
    fn validate_rejects_broken_sets() {
        let mut p = ConsensusParams::mainnet();
        p.past_blocks_min = 10;
        p.past_blocks_max = 4;
        assert_eq!(
            p.validate(),
            Err(ParamsError::InvalidWindow { min: 10, max: 4 })
        );

        let mut p = ConsensusParams::mainnet();
        p.pow_target_spacing = 0;
        assert_eq!(p.validate(), Err(ParamsError::NonPositiveSpacing(0)));
        assert_eq!(p.difficulty_adjustment_interval(), 0);

        let mut p = ConsensusParams::mainnet();
        p.pow_target_timespan = 1_000;
        assert!(matches!(
            p.validate(),
            Err(ParamsError::TimespanNotMultiple { .. })
        ));

        let mut p = ConsensusParams::mainnet();
        p.pow_limit = BigUint::from(1u8) << 256u32;
        assert_eq!(p.validate(), Err(ParamsError::PowLimitTooWide(257)));

        let mut p = ConsensusParams::mainnet();
        p.long_gap_step = 0;
        assert_eq!(p.validate(), Err(ParamsError::NonPositiveGapStep(0)));
    }

    #[test]
    fn adjustment_interval_is_one_day_of_blocks() {
        assert_eq!(ConsensusParams::mainnet().difficulty_adjustment_interval(), 720);
    }

    #[test]
    fn network_names_parse() {
        assert_eq!("main".parse::<Network>(), Ok(Network::Mainnet));
        assert_eq!("regtest".parse::<Network>(), Ok(Network::Regtest));
        assert!("signet".parse::<Network>().is_err());
    }
}
