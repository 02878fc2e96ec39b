//! Builder for configuring and constructing a `LoudnessMeter`.

use crate::{LoudnessMeter, Result};
use loudmeter_core::{AnalyzerConfig, AudioSource, Downmix, LoudnessAnalyzer};
use std::time::Duration;

#[cfg(feature = "input")]
use loudmeter_core::CpalInput;

/// The sample rate is never configured here: it always comes from the
/// audio source (or is passed explicitly to [`build_detached`]), so the
/// analyzer windows match the stream they measure.
///
/// # Example
///
/// ```ignore
/// use loudmeter::prelude::*;
///
/// let meter = LoudnessMeter::builder()
///     .input_device(1)
///     .output_capacity(8)
///     .build()?;
///
/// while let Some(m) = meter.recv() {
///     println!("{m}");
/// }
/// ```
///
/// [`build_detached`]: LoudnessMeterBuilder::build_detached
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "input"), allow(dead_code))]
pub struct LoudnessMeterBuilder {
    input_device: Option<usize>,
    throttle: Duration,
    gate_threshold_db: f64,
    output_capacity: usize,
    downmix: Downmix,
}

impl Default for LoudnessMeterBuilder {
    fn default() -> Self {
        Self {
            input_device: None,
            throttle: loudmeter_core::config::THROTTLE_PERIOD,
            gate_threshold_db: loudmeter_core::config::GATE_THRESHOLD_DB,
            output_capacity: loudmeter_core::config::OUTPUT_CAPACITY,
            downmix: Downmix::default(),
        }
    }
}

impl LoudnessMeterBuilder {
    /// Default: the host's default input device.
    pub fn input_device(mut self, index: usize) -> Self {
        self.input_device = Some(index);
        self
    }

    /// Default: 50 ms
    pub fn throttle(mut self, period: Duration) -> Self {
        self.throttle = period;
        self
    }

    /// Default: -70
    pub fn gate_threshold_db(mut self, threshold: f64) -> Self {
        self.gate_threshold_db = threshold;
        self
    }

    /// Unread measurements kept before the oldest is discarded. Default: 32
    pub fn output_capacity(mut self, capacity: usize) -> Self {
        self.output_capacity = capacity;
        self
    }

    /// Default: first channel only
    pub fn downmix(mut self, downmix: Downmix) -> Self {
        self.downmix = downmix;
        self
    }

    fn config(&self, sample_rate: f64) -> AnalyzerConfig {
        AnalyzerConfig::new(sample_rate)
            .with_throttle(self.throttle)
            .with_gate(self.gate_threshold_db)
            .with_output_capacity(self.output_capacity)
    }

    /// Wire up a meter whose analyzer the caller drives from its own host.
    pub fn build_detached(self, sample_rate: f64) -> Result<(LoudnessMeter, LoudnessAnalyzer)> {
        let (analyzer, readings, control) = LoudnessAnalyzer::connect(self.config(sample_rate))?;
        tracing::debug!(sample_rate, "detached loudness meter built");
        Ok((LoudnessMeter::new(sample_rate, readings, control), analyzer))
    }

    /// Start `source` feeding a new analyzer configured for its sample rate.
    ///
    /// Returns the meter and the source's stream handle; keep the handle
    /// alive for as long as measurements should flow.
    pub fn build_with<A: AudioSource>(self, source: A) -> Result<(LoudnessMeter, A::Stream)> {
        let sample_rate = source.sample_rate();
        let (analyzer, readings, control) = LoudnessAnalyzer::connect(self.config(sample_rate))?;
        let stream = source.start(analyzer)?;
        Ok((LoudnessMeter::new(sample_rate, readings, control), stream))
    }

    /// Capture from the configured input device and meter it live.
    #[cfg(feature = "input")]
    pub fn build(self) -> Result<LoudnessMeter> {
        let input = CpalInput::open(self.input_device)?.downmix(self.downmix);
        let (meter, stream) = self.build_with(input)?;
        Ok(meter.with_stream(stream))
    }
}
