//! Streaming loudness analyzer (called from the audio callback).

use super::channel::{
    control_channel, measurement_channel, Control, ControlHandle, ControlReceiver,
    MeasurementReceiver, MeasurementSender,
};
use super::window::{peak_db, rms_db};
use super::{IntegrationState, Measurement, SampleRing};
use crate::clock::SampleClock;
use crate::config::AnalyzerConfig;
use crate::Result;
use std::time::Duration;

/// Real-time loudness analyzer.
///
/// Every block is appended to the sample ring. Once at least one throttle
/// period of audio-clock time has passed since the previous emission, the
/// analyzer evaluates all five levels and emits a [`Measurement`].
///
/// After construction nothing here allocates, locks, or fails, so
/// [`push_block`](Self::push_block) is safe to call from the audio thread.
/// The analyzer owns no threads or timers: the throttle is driven purely
/// by the timestamps it is given.
pub struct LoudnessAnalyzer {
    ring: SampleRing,
    integration: IntegrationState,
    momentary_samples: usize,
    short_term_samples: usize,
    throttle: Duration,
    gate_db: f64,
    sample_rate: f64,
    last_emit: Duration,
    clock: SampleClock,
    last: Measurement,
    output: Option<MeasurementSender>,
    control: Option<ControlReceiver>,
}

impl LoudnessAnalyzer {
    /// Build an analyzer for a stream running at `config.sample_rate`.
    ///
    /// This is the only fallible step; all window sizes are checked here.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;

        let capacity = config.capacity();
        tracing::debug!(
            sample_rate = config.sample_rate,
            momentary = config.momentary_samples(),
            short_term = config.short_term_samples(),
            capacity,
            "loudness analyzer created"
        );

        Ok(Self {
            ring: SampleRing::with_capacity(capacity),
            integration: IntegrationState::new(),
            momentary_samples: config.momentary_samples(),
            short_term_samples: config.short_term_samples(),
            throttle: config.throttle,
            gate_db: config.gate_threshold_db,
            sample_rate: config.sample_rate,
            last_emit: Duration::ZERO,
            clock: SampleClock::new(config.sample_rate),
            last: Measurement::SILENT,
            output: None,
            control: None,
        })
    }

    /// Build an analyzer already wired to a measurement queue and a control queue.
    pub fn connect(
        config: AnalyzerConfig,
    ) -> Result<(Self, MeasurementReceiver, ControlHandle)> {
        let (tx, rx) = measurement_channel(config.output_capacity);
        let (control, control_rx) = control_channel();
        let analyzer = Self::new(config)?.with_output(tx).with_control(control_rx);
        Ok((analyzer, rx, control))
    }

    pub fn with_output(mut self, output: MeasurementSender) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_control(mut self, control: ControlReceiver) -> Self {
        self.control = Some(control);
        self
    }

    /// Push a block timestamped by the analyzer's own sample clock.
    ///
    /// Returns the measurement if this block triggered an evaluation.
    #[inline]
    pub fn push_block(&mut self, samples: &[f32]) -> Option<Measurement> {
        self.clock.advance(samples.len());
        let now = self.clock.now();
        self.push_block_at(samples, now)
    }

    /// Push a block with a host-supplied audio-clock timestamp.
    ///
    /// Do not mix with [`push_block`](Self::push_block) on one stream: the
    /// internal clock only advances through that method.
    #[inline]
    pub fn push_block_at(&mut self, samples: &[f32], now: Duration) -> Option<Measurement> {
        self.process_control();
        self.ring.push_block(samples);

        if now.saturating_sub(self.last_emit) < self.throttle {
            return None;
        }

        let measurement = self.evaluate();
        self.last_emit = now;

        if let Some(output) = &self.output {
            // A full queue is coalesced by the sender; a gone consumer is ignored.
            let _ = output.send(measurement);
        }

        Some(measurement)
    }

    /// Compute all levels from the current history and feed the gate.
    ///
    /// Called once per throttle period by `push_block`. Calling it directly
    /// also counts as one gated block for the integrated estimate.
    pub fn evaluate(&mut self) -> Measurement {
        let momentary = rms_db(&self.ring, self.momentary_samples);
        let short_term = rms_db(&self.ring, self.short_term_samples);

        self.integration.accumulate(momentary, self.gate_db);
        let integrated = self.integration.integrated_db();

        let true_peak = peak_db(&self.ring, self.momentary_samples);
        let lra = (momentary - short_term).abs();

        self.last = Measurement {
            momentary,
            short_term,
            integrated,
            lra,
            true_peak,
        };
        self.last
    }

    /// Apply any pending [`Control`] commands.
    #[inline]
    pub fn process_control(&mut self) {
        while let Some(command) = self.control.as_ref().and_then(ControlReceiver::try_recv) {
            match command {
                Control::Reset => self.reset(),
                Control::ClearHistory => self.clear_history(),
            }
        }
    }

    /// Start integration over. Sample history is kept, so momentary and
    /// short-term values continue smoothly.
    pub fn reset(&mut self) {
        self.integration.reset();
    }

    /// Forget all sample history. The integrated estimate is kept.
    pub fn clear_history(&mut self) {
        self.ring.clear();
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn momentary_samples(&self) -> usize {
        self.momentary_samples
    }

    pub fn short_term_samples(&self) -> usize {
        self.short_term_samples
    }

    pub fn throttle(&self) -> Duration {
        self.throttle
    }

    pub fn ring(&self) -> &SampleRing {
        &self.ring
    }

    pub fn integration(&self) -> &IntegrationState {
        &self.integration
    }

    /// Most recent evaluation, [`Measurement::SILENT`] before the first one.
    pub fn last_measurement(&self) -> Measurement {
        self.last
    }

    /// Audio-clock time of the most recent emission.
    pub fn last_emit(&self) -> Duration {
        self.last_emit
    }
}

impl core::fmt::Debug for LoudnessAnalyzer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoudnessAnalyzer")
            .field("sample_rate", &self.sample_rate)
            .field("momentary_samples", &self.momentary_samples)
            .field("short_term_samples", &self.short_term_samples)
            .field("throttle", &self.throttle)
            .field("integration", &self.integration)
            .field("last_emit", &self.last_emit)
            .finish_non_exhaustive()
    }
}
