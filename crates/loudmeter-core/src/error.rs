//! Error types for loudmeter-core.

use thiserror::Error;

/// Error type for loudmeter-core operations.
///
/// Only construction and device I/O can fail. Once an analyzer exists,
/// streaming is infallible: silence and missing history resolve to the
/// `-100` floor instead of an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid sample rate: {0} Hz (must be finite and positive)")]
    InvalidSampleRate(f64),

    #[error("Invalid window: {name} spans {samples} samples (allowed 1..={max})")]
    InvalidWindow {
        name: &'static str,
        samples: usize,
        max: usize,
    },

    #[error("Invalid throttle period: must be greater than zero")]
    InvalidThrottle,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[cfg(feature = "input")]
    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    #[cfg(feature = "input")]
    #[error("Unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    #[cfg(feature = "input")]
    #[error("Audio device not available")]
    DeviceNotAvailable(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "input")]
    #[error("Failed to build audio stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "input")]
    #[error("Failed to play audio stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[cfg(feature = "input")]
    #[error("Failed to pause audio stream")]
    PauseStream(#[from] cpal::PauseStreamError),

    #[cfg(feature = "input")]
    #[error("Failed to enumerate devices")]
    DevicesError(#[from] cpal::DevicesError),

    #[cfg(feature = "input")]
    #[error("Failed to get device name")]
    DeviceNameError(#[from] cpal::DeviceNameError),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
