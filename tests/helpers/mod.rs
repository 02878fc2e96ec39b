//! Test helpers and fixtures for loudmeter integration tests
//!
//! Signal generators are deterministic so every level has a closed-form
//! expected value.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `EXACT_DB` (1e-9): identical inputs through identical windows
//! - `PEAK_DB` (0.05): single-sample peak recovery
//! - `TONE_DB` (0.1): steady-state tones

#![allow(dead_code)]

pub mod tolerances;

use loudmeter::prelude::*;
use std::time::Duration;

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// 5 ms at 48 kHz
pub const TEST_BLOCK_SIZE: usize = 240;

/// Analyzer with default settings at the test sample rate.
pub fn test_analyzer() -> LoudnessAnalyzer {
    LoudnessAnalyzer::new(AnalyzerConfig::new(TEST_SAMPLE_RATE))
        .expect("Failed to create test analyzer")
}

/// Sine wave at given frequency and peak amplitude.
pub fn generate_sine(
    frequency: f64,
    amplitude: f64,
    sample_rate: f64,
    num_samples: usize,
) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin()) as f32
        })
        .collect()
}

/// Generate silence (zero samples).
pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Single sample of `amplitude` at `position`, zeros elsewhere.
pub fn generate_impulse(num_samples: usize, position: usize, amplitude: f32) -> Vec<f32> {
    let mut samples = vec![0.0; num_samples];
    if position < num_samples {
        samples[position] = amplitude;
    }
    samples
}

/// Number of samples in `seconds` at the test sample rate.
pub fn seconds(seconds: f64) -> usize {
    (seconds * TEST_SAMPLE_RATE).round() as usize
}

/// Feed `samples` in test-sized blocks and collect every emission.
pub fn feed(analyzer: &mut LoudnessAnalyzer, samples: &[f32]) -> Vec<Measurement> {
    samples
        .chunks(TEST_BLOCK_SIZE)
        .filter_map(|block| analyzer.push_block(block))
        .collect()
}

/// Feed `samples` with explicit timestamps, one block per `step`.
pub fn feed_with_clock(
    analyzer: &mut LoudnessAnalyzer,
    samples: &[f32],
    block_size: usize,
    step: Duration,
) -> Vec<Measurement> {
    let mut now = Duration::ZERO;
    samples
        .chunks(block_size)
        .filter_map(|block| {
            now += step;
            analyzer.push_block_at(block, now)
        })
        .collect()
}

/// Plain energy average of momentary levels, no gate.
pub fn ungated_average_db(readings: &[Measurement]) -> f64 {
    let sum: f64 = readings
        .iter()
        .map(|m| 10f64.powf(m.momentary / 10.0))
        .sum();
    10.0 * (sum / readings.len() as f64).log10()
}
