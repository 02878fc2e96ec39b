//! Analyzer configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Momentary loudness window.
pub const MOMENTARY_WINDOW: Duration = Duration::from_millis(400);

/// Short-term loudness window.
pub const SHORT_TERM_WINDOW: Duration = Duration::from_millis(3000);

/// Minimum audio-clock time between two emitted measurements (~20 Hz).
pub const THROTTLE_PERIOD: Duration = Duration::from_millis(50);

/// Momentary level at or below which a block is left out of integration.
pub const GATE_THRESHOLD_DB: f64 = -70.0;

/// Extra ring history kept beyond the short-term window.
/// At 48 kHz this gives 144 000 + 6 000 = 150 000 samples.
pub const HISTORY_HEADROOM: Duration = Duration::from_millis(125);

/// Default depth of the bounded measurement queue.
pub const OUTPUT_CAPACITY: usize = 32;

/// Largest ring buffer an analyzer will allocate (64 MiB of `f32`).
/// Comfortably above 3.125 s at 768 kHz.
pub const MAX_RING_CAPACITY: usize = 1 << 24;

/// Configuration for a [`LoudnessAnalyzer`](crate::LoudnessAnalyzer).
///
/// The sample rate must be the rate actually negotiated with the input
/// stream; every window is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub sample_rate: f64,
    pub momentary_window: Duration,
    pub short_term_window: Duration,
    pub throttle: Duration,
    pub gate_threshold_db: f64,
    pub history_headroom: Duration,
    pub output_capacity: usize,
}

impl AnalyzerConfig {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            momentary_window: MOMENTARY_WINDOW,
            short_term_window: SHORT_TERM_WINDOW,
            throttle: THROTTLE_PERIOD,
            gate_threshold_db: GATE_THRESHOLD_DB,
            history_headroom: HISTORY_HEADROOM,
            output_capacity: OUTPUT_CAPACITY,
        }
    }

    pub fn with_windows(mut self, momentary: Duration, short_term: Duration) -> Self {
        self.momentary_window = momentary;
        self.short_term_window = short_term;
        self
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_gate(mut self, threshold_db: f64) -> Self {
        self.gate_threshold_db = threshold_db;
        self
    }

    pub fn with_history_headroom(mut self, headroom: Duration) -> Self {
        self.history_headroom = headroom;
        self
    }

    pub fn with_output_capacity(mut self, capacity: usize) -> Self {
        self.output_capacity = capacity;
        self
    }

    /// Momentary window length in samples, `round(sample_rate * 0.4)` by default.
    pub fn momentary_samples(&self) -> usize {
        self.samples_for(self.momentary_window)
    }

    /// Short-term window length in samples, `round(sample_rate * 3.0)` by default.
    pub fn short_term_samples(&self) -> usize {
        self.samples_for(self.short_term_window)
    }

    /// Ring buffer capacity: the short-term window plus headroom.
    ///
    /// Saturates instead of overflowing; [`validate`](Self::validate)
    /// rejects anything above [`MAX_RING_CAPACITY`].
    pub fn capacity(&self) -> usize {
        self.short_term_samples()
            .saturating_add(self.samples_for(self.history_headroom))
    }

    #[inline]
    fn samples_for(&self, window: Duration) -> usize {
        (self.sample_rate * window.as_secs_f64()).round() as usize
    }

    /// Sample count for `window`, or `None` if it cannot fit in a ring.
    fn checked_samples(&self, window: Duration) -> Option<usize> {
        let samples = (self.sample_rate * window.as_secs_f64()).round();
        (samples.is_finite() && samples <= MAX_RING_CAPACITY as f64).then_some(samples as usize)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }

        if self.throttle.is_zero() {
            return Err(Error::InvalidThrottle);
        }

        if !self.gate_threshold_db.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "gate threshold {} dB is not finite",
                self.gate_threshold_db
            )));
        }

        if self.output_capacity == 0 {
            return Err(Error::InvalidConfig(
                "output channel capacity must be at least 1".to_string(),
            ));
        }

        let capacity = self
            .checked_samples(self.short_term_window)
            .zip(self.checked_samples(self.history_headroom))
            .and_then(|(short_term, headroom)| short_term.checked_add(headroom))
            .filter(|&capacity| capacity <= MAX_RING_CAPACITY)
            .ok_or_else(|| Error::InvalidWindow {
                name: "ring",
                samples: self.capacity(),
                max: MAX_RING_CAPACITY,
            })?;

        let short_term = self.short_term_samples();
        let momentary = self.momentary_samples();

        if short_term == 0 || short_term > capacity {
            return Err(Error::InvalidWindow {
                name: "short-term",
                samples: short_term,
                max: capacity,
            });
        }

        if momentary == 0 || momentary > short_term {
            return Err(Error::InvalidWindow {
                name: "momentary",
                samples: momentary,
                max: short_term,
            });
        }

        Ok(())
    }
}
