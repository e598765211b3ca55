// Consensus-critical. Changes require spec update + tests.
//! Long-gap relief multiplier.
//!
//! After an anomalously long gap since the previous block, the retargeted
//! target is multiplied by a factor that grows linearly for the first five
//! missed steps and then as `5 + round(1.14^(steps - 5))`.

use gravity_core::{
    ReliefCurve, RELIEF_GROWTH_DEN, RELIEF_GROWTH_NUM, RELIEF_LINEAR_STEPS,
    RELIEF_SATURATED_SHIFT, RELIEF_SATURATION_EXPONENT,
};
use num_bigint::BigUint;
use num_traits::One;

/// `1.14` as the historical nodes held it.
const LEGACY_GROWTH: f32 = 1.14;

/// Multiplier applied to the retargeted target after `missed_steps` steps.
pub fn relief_multiplier(missed_steps: u64, curve: ReliefCurve) -> BigUint {
    if missed_steps <= RELIEF_LINEAR_STEPS {
        return BigUint::from(missed_steps);
    }
    match curve {
        ReliefCurve::Exact => exact_multiplier(missed_steps - RELIEF_LINEAR_STEPS),
        ReliefCurve::LegacyFloat => BigUint::from(legacy_float_multiplier(missed_steps)),
    }
}

/// `5 + round_half_up(1.14^exponent)` in integer arithmetic.
///
/// From [`RELIEF_SATURATION_EXPONENT`] on the value already exceeds `2^256`,
/// so `2^260` stands in for it: clamping to the pow limit then yields the
/// same result as the unbounded product.
fn exact_multiplier(exponent: u64) -> BigUint {
    if exponent >= RELIEF_SATURATION_EXPONENT {
        return BigUint::one() << RELIEF_SATURATED_SHIFT;
    }
    // exponent < 1400 here.
    let exponent = exponent as u32;
    let num = BigUint::from(RELIEF_GROWTH_NUM).pow(exponent);
    let den = BigUint::from(RELIEF_GROWTH_DEN).pow(exponent);
    let rounded = (num * 2u32 + &den) / (den * 2u32);
    rounded + RELIEF_LINEAR_STEPS
}

/// Historical evaluation: `powf` in single precision, `+0.5` and floor in
/// double precision, conversion to `i64` with the out-of-range value of
/// x86-64 (`i64::MIN`), then truncation of `5 + x` to 32 bits.
fn legacy_float_multiplier(missed_steps: u64) -> u32 {
    let exponent = missed_steps as f32 - RELIEF_LINEAR_STEPS as f32;
    let curve = LEGACY_GROWTH.powf(exponent);
    let rounded = (f64::from(curve) + 0.5).floor();
    let limit = 2f64.powi(63);
    let whole = if rounded.is_finite() && rounded >= -limit && rounded < limit {
        rounded as i64
    } else {
        i64::MIN
    };
    (RELIEF_LINEAR_STEPS as i64).wrapping_add(whole) as u32
}
