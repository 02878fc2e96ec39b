//! Consumer-side facade over a running analyzer.

use crate::LoudnessMeterBuilder;
use loudmeter_core::{ControlHandle, Measurement, MeasurementReceiver};
use std::time::Duration;

#[cfg(feature = "input")]
use loudmeter_core::InputStream;

/// Reads measurements from, and sends commands to, one analyzer.
///
/// The analyzer itself lives on the audio thread (inside an input stream,
/// or wherever the caller drives it); nothing here touches its state
/// directly. Measurements arrive over a bounded queue, commands leave over
/// another.
pub struct LoudnessMeter {
    sample_rate: f64,
    readings: MeasurementReceiver,
    control: ControlHandle,

    #[cfg(feature = "input")]
    stream: Option<InputStream>,
}

impl LoudnessMeter {
    pub fn builder() -> LoudnessMeterBuilder {
        LoudnessMeterBuilder::default()
    }

    pub(crate) fn new(
        sample_rate: f64,
        readings: MeasurementReceiver,
        control: ControlHandle,
    ) -> Self {
        Self {
            sample_rate,
            readings,
            control,
            #[cfg(feature = "input")]
            stream: None,
        }
    }

    #[cfg(feature = "input")]
    pub(crate) fn with_stream(mut self, stream: InputStream) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Sample rate the analyzer was configured with.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Whether this meter owns a live input stream.
    pub fn is_live(&self) -> bool {
        #[cfg(feature = "input")]
        {
            self.stream.is_some()
        }
        #[cfg(not(feature = "input"))]
        {
            false
        }
    }

    /// Block until the next measurement; `None` once the analyzer is gone.
    pub fn recv(&self) -> Option<Measurement> {
        self.readings.recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Measurement> {
        self.readings.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Option<Measurement> {
        self.readings.try_recv()
    }

    /// Newest queued measurement, discarding older ones. Suited to a UI
    /// that redraws slower than the ~20 Hz production rate.
    pub fn latest(&self) -> Option<Measurement> {
        self.readings.latest()
    }

    pub fn readings(&self) -> &MeasurementReceiver {
        &self.readings
    }

    /// Measurements discarded because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.readings.dropped()
    }

    /// Restart integrated loudness on the analyzer's next block.
    /// Sample history is kept.
    pub fn reset(&self) -> bool {
        let queued = self.control.reset();
        if !queued {
            tracing::warn!("reset not queued: control queue full");
        }
        queued
    }

    /// Forget sample history on the analyzer's next block.
    pub fn clear_history(&self) -> bool {
        let queued = self.control.clear_history();
        if !queued {
            tracing::warn!("clear-history not queued: control queue full");
        }
        queued
    }

    /// Another handle for sending commands from elsewhere.
    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    #[cfg(feature = "input")]
    pub fn pause(&mut self) -> crate::Result<()> {
        if let Some(stream) = self.stream.as_mut() {
            stream.pause()?;
        }
        Ok(())
    }

    #[cfg(feature = "input")]
    pub fn resume(&mut self) -> crate::Result<()> {
        if let Some(stream) = self.stream.as_mut() {
            stream.resume()?;
        }
        Ok(())
    }
}
