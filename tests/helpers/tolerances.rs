//! Tolerance constants for level assertions.
//!
//! All levels are in dB, so tolerances are too.

/// Exact arithmetic on identical inputs (same samples, same windows).
pub const EXACT_DB: f64 = 1e-9;

/// Known-peak recovery from a single sample.
pub const PEAK_DB: f64 = 0.05;

/// Steady-state levels of synthesized tones.
pub const TONE_DB: f64 = 0.1;

/// RMS of a full-scale sine: 20 * log10(1 / sqrt(2)).
pub const FULL_SCALE_SINE_RMS_DB: f64 = -3.010299956639812;
