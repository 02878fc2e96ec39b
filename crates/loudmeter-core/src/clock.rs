//! Audio-clock time derived from frames processed.

use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Counts frames and converts the count to elapsed stream time.
///
/// Time is recomputed from the total frame count on every read, so it
/// does not drift however many blocks are pushed. Integral rates (every
/// rate a device reports) use exact integer nanoseconds; fractional rates
/// fall back to `f64`.
#[derive(Debug, Clone)]
pub struct SampleClock {
    frames: u64,
    sample_rate: f64,
    rate_hz: Option<u64>,
}

impl SampleClock {
    pub fn new(sample_rate: f64) -> Self {
        let rate_hz = (sample_rate >= 1.0
            && sample_rate.fract() == 0.0
            && sample_rate <= u32::MAX as f64)
            .then_some(sample_rate as u64);

        Self {
            frames: 0,
            sample_rate,
            rate_hz,
        }
    }

    #[inline]
    pub fn advance(&mut self, frames: usize) {
        self.frames += frames as u64;
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Stream time of the end of the last advanced block.
    #[inline]
    pub fn now(&self) -> Duration {
        match self.rate_hz {
            Some(rate) => {
                let rate = rate as u128;
                let nanos = (self.frames as u128 * NANOS_PER_SEC + rate / 2) / rate;
                Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
            }
            None => {
                let nanos = (self.frames as f64 * 1e9 / self.sample_rate).round();
                Duration::from_nanos(nanos as u64)
            }
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn reset(&mut self) {
        self.frames = 0;
    }
}
