//! Streaming loudness metering.
//!
//! - `SampleRing`: bounded history of recent samples
//! - `window`: RMS and peak levels over trailing windows
//! - `IntegrationState`: gated running average for integrated loudness
//! - `LoudnessAnalyzer`: throttled evaluation producing `Measurement`s
//! - `channel`: measurement output and control input queues

mod analyzer;
mod channel;
mod integration;
mod measurement;
mod ring;
pub mod window;

pub use analyzer::LoudnessAnalyzer;
pub use channel::{
    control_channel, measurement_channel, Control, ControlHandle, ControlReceiver,
    MeasurementReceiver, MeasurementSender, SendOutcome,
};
pub use integration::IntegrationState;
pub use measurement::{Db, Measurement, ACTIVITY_THRESHOLD_DB};
pub use ring::{Recent, SampleRing};
pub use window::{peak_db, rms_db, EPSILON, FLOOR_DB};
