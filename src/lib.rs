//! # Loudmeter - Real-time Loudness Meter
//!
//! Measures a live audio stream and reports momentary, short-term,
//! integrated, loudness-range and true-peak levels about 20 times per
//! second.
//!
//! ## Architecture
//!
//! Loudmeter is an umbrella crate over:
//! - **loudmeter-core** - the analyzer kernel (ring buffer, window
//!   statistics, gated integration, throttled emission, queues, sources)
//!
//! ```text
//! audio thread                          consumer thread
//! ┌─────────────┐   ┌──────────────────┐   ┌───────────────┐
//! │ AudioSource │──►│ LoudnessAnalyzer │──►│ LoudnessMeter │
//! └─────────────┘   └──────────────────┘   └───────────────┘
//!                           ▲                      │
//!                           └──── Control ─────────┘
//! ```
//!
//! The levels are approximations: plain RMS in dB without K-weighting,
//! a single −70 gate, `|momentary − short-term|` for loudness range and
//! an un-oversampled sample peak for true peak.
//!
//! ## Quick Start
//!
//! ```
//! use loudmeter::prelude::*;
//!
//! let (meter, mut analyzer) = LoudnessMeter::builder().build_detached(48000.0)?;
//!
//! // Called from the host's audio callback
//! analyzer.push_block(&[0.0f32; 4800]);
//!
//! if let Some(m) = meter.latest() {
//!     println!("{m}");
//! }
//! # Ok::<(), loudmeter::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Analyzer, queues and offline analysis
//! - `input` - Live capture from an input device (CPAL) and the
//!   `loudmeter` monitor binary

/// Re-export of loudmeter-core for direct access
pub use loudmeter_core as core;

pub use loudmeter_core::{
    analyze_offline, AnalyzerConfig, AudioSource, ChannelTap, Control, ControlHandle, Db,
    Downmix, IntegrationState, LoudnessAnalyzer, Measurement, MeasurementReceiver, SampleClock,
    SampleSink, SliceSource, FLOOR_DB,
};

#[cfg(feature = "input")]
pub use loudmeter_core::{CpalInput, InputStream};

mod builder;
mod error;
mod meter;

pub use builder::LoudnessMeterBuilder;
pub use error::{Error, Result};
pub use meter::LoudnessMeter;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AnalyzerConfig, AudioSource, Control, Db, Downmix, LoudnessAnalyzer, LoudnessMeter,
        LoudnessMeterBuilder, Measurement, Result, SampleSink, SliceSource,
    };

    #[cfg(feature = "input")]
    pub use crate::CpalInput;
}
