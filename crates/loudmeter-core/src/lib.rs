//! Real-time loudness analyzer kernel.
//!
//! Feeds mono sample blocks into a bounded ring buffer and, at a fixed
//! audio-clock cadence, reports momentary, short-term, integrated,
//! loudness-range and true-peak estimates.
//!
//! The levels are deliberately simple: plain RMS in dB (no K-weighting),
//! a single −70 gate for integration, `|momentary − short-term|` as the
//! loudness range and the sample peak over the momentary window as true
//! peak. They track, but are not, the broadcast-standard quantities.
//!
//! # Primary API
//!
//! - [`LoudnessAnalyzer`]: push blocks from the audio callback
//! - [`AnalyzerConfig`]: sample rate, windows, throttle, gate
//! - [`MeasurementReceiver`] / [`ControlHandle`]: the consumer side
//! - [`AudioSource`] / [`SampleSink`]: host abstraction
//! - `"input"` feature: [`CpalInput`] for live device capture
//!
//! # Example
//!
//! ```
//! use loudmeter_core::{AnalyzerConfig, LoudnessAnalyzer};
//!
//! let (mut analyzer, readings, control) =
//!     LoudnessAnalyzer::connect(AnalyzerConfig::new(48000.0))?;
//!
//! // Audio thread: 10 ms blocks
//! let block = [0.0f32; 480];
//! for _ in 0..10 {
//!     analyzer.push_block(&block);
//! }
//!
//! // UI thread
//! while let Some(m) = readings.try_recv() {
//!     println!("{m}");
//! }
//! control.reset();
//! # Ok::<(), loudmeter_core::Error>(())
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::AnalyzerConfig;

pub mod clock;
pub use clock::SampleClock;

pub(crate) mod metering;
pub use metering::{
    control_channel, measurement_channel, peak_db, rms_db, window, Control, ControlHandle,
    ControlReceiver, Db, IntegrationState, LoudnessAnalyzer, Measurement, MeasurementReceiver,
    MeasurementSender, Recent, SampleRing, SendOutcome, ACTIVITY_THRESHOLD_DB, EPSILON, FLOOR_DB,
};

pub mod source;
pub use source::{analyze_offline, AudioSource, ChannelTap, Downmix, SampleSink, SliceSource};

#[cfg(feature = "input")]
mod input;

#[cfg(feature = "input")]
pub use input::{CpalInput, InputStream};
