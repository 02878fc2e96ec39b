//! Trailing-window statistics over the sample ring.
//!
//! Both functions are pure: they read the ring as it is at call time and
//! never allocate. Logarithms are only taken above [`EPSILON`], so silence
//! and empty windows map to [`FLOOR_DB`].

use super::SampleRing;

/// "No signal" sentinel for every level in a measurement.
pub const FLOOR_DB: f64 = -100.0;

/// Linear level at or below which a value is treated as silence.
pub const EPSILON: f64 = 1e-8;

/// `20 * log10(linear)`, floored.
#[inline]
pub fn amplitude_to_db(linear: f64) -> f64 {
    if linear <= EPSILON {
        FLOOR_DB
    } else {
        20.0 * linear.log10()
    }
}

/// Plain (unweighted) RMS over the newest `window` samples, in dB.
pub fn rms_db(ring: &SampleRing, window: usize) -> f64 {
    if window == 0 {
        return FLOOR_DB;
    }

    let sum_sq: f64 = ring
        .recent(window)
        .map(|s| {
            let s = s as f64;
            s * s
        })
        .sum();

    amplitude_to_db((sum_sq / window as f64).sqrt())
}

/// Largest absolute sample over the newest `window` samples, in dB.
///
/// No oversampling: inter-sample peaks are not detected, so this is an
/// approximation of true peak.
pub fn peak_db(ring: &SampleRing, window: usize) -> f64 {
    let peak = ring
        .recent(window)
        .fold(0.0f32, |max, s| max.max(s.abs()));

    amplitude_to_db(peak as f64)
}
