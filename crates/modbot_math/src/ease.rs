//! Animation easing curves
//!
//! An easing curve maps linear animation progress in `[0, 1]` onto eased
//! progress in `[0, 1]`, fixing both endpoints.

use std::f32::consts::PI;

/// Sinusoidal ease-in-out: `(1 - cos(π·t)) / 2`
#[inline]
pub fn ease_in_out_sine(t: f32) -> f32 {
    (1.0 - (PI * t).cos()) / 2.0
}
