//! Concept2 pace-to-watts conversion.
//!
//! `watts = 2.80 / (seconds_per_500m / 500)^3`. The constant already bakes in
//! the 500 m normalization, so the workout distance plays no part.

use std::time::Duration;

use crate::error::PowerError;

/// Constant of the Concept2 power formula.
pub const POWER_CONSTANT: f64 = 2.80;

/// Distance a pace is quoted over, in meters.
pub const PACE_DISTANCE_M: f64 = 500.0;

/// Power in whole watts for a pace per 500 m.
///
/// Rounds half to even, so a value of exactly `x.5` lands on the even watt.
///
/// # Errors
///
/// Returns [`PowerError::InvalidArgument`] for a zero pace and
/// [`PowerError::OutOfRange`] when the wattage does not fit in `u32`.
pub fn power(pace: Duration) -> Result<u32, PowerError> {
    let watts = power_exact(pace)?.round_ties_even();
    if !watts.is_finite() || watts > f64::from(u32::MAX) {
        return Err(PowerError::OutOfRange(watts));
    }
    Ok(watts as u32)
}

/// Unrounded power in watts.
///
/// # Errors
///
/// Returns [`PowerError::InvalidArgument`] for a zero pace.
pub fn power_exact(pace: Duration) -> Result<f64, PowerError> {
    if pace.is_zero() {
        return Err(PowerError::InvalidArgument);
    }
    let per_meter = pace.as_secs_f64() / PACE_DISTANCE_M;
    Ok(POWER_CONSTANT / per_meter.powi(3))
}
