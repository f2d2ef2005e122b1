//! Easing curves
//!
//! An easing function maps progress in `[0, 1]` onto the shaping curve
//! that is then scaled by the configured maximum value. Curves are
//! monotonic but not necessarily strictly.

/// Easing function signature
pub type EaseFn = fn(f64) -> f64;

/// Identity curve
#[inline]
pub fn linear(t: f64) -> f64 {
    t
}

/// Quadratic ease-in-out
#[inline]
pub fn quad_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Cubic ease-in-out
#[inline]
pub fn cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = 2.0 * t - 2.0;
        0.5 * u * u * u + 1.0
    }
}

/// Round to three decimal places, half away from zero
///
/// Non-finite values and values too large to carry a fraction
/// are returned unchanged.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn round3(value: f64) -> f64 {
    const SCALE: f64 = 1000.0;
    // above 2^52 every f64 is already an integer
    const EXACT: f64 = 4_503_599_627_370_496.0;

    let scaled = value * SCALE;
    if !scaled.is_finite() || scaled.abs() >= EXACT {
        return value;
    }
    let half = if scaled < 0.0 { -0.5 } else { 0.5 };
    ((scaled + half) as i64) as f64 / SCALE
}
