use std::f64::consts::PI;

use crate::utils::EPSILON;

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

#[inline]
pub fn pow2(x: f64) -> f64 {
    x * x
}

#[inline]
pub fn pow3(x: f64) -> f64 {
    x * x * x
}

/// Sign of a value, with zero mapping to +1.
#[inline]
pub fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Approximate equality within [`EPSILON`].
#[inline]
pub fn equals(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * factor.clamp(0.0, 1.0)
}

/// Map `x` from `[from_lo, from_hi]` linearly onto `[to_lo, to_hi]` without clamping.
#[inline]
pub fn map(x: f64, from_lo: f64, from_hi: f64, to_lo: f64, to_hi: f64) -> f64 {
    (x - from_lo) / (from_hi - from_lo) * (to_hi - to_lo) + to_lo
}

/// Round to the nearest multiple of `resolution`.
#[inline]
pub fn round_to(x: f64, resolution: f64) -> f64 {
    (x / resolution).round() * resolution
}

/// Circular disk area for a radius.
#[inline]
pub fn disk_area(radius: f64) -> f64 {
    PI * radius * radius
}

/// sin(x)/x, exactly one at zero.
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x.abs() < EPSILON {
        1.0
    } else {
        x.sin() / x
    }
}
