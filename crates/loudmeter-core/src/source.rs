//! Audio sources that drive an analyzer.
//!
//! The analyzer does not depend on any host runtime. A host hands mono
//! blocks to a [`SampleSink`] with the audio-clock time at the end of each
//! block; an [`AudioSource`] is anything that can do that on its own.

use crate::clock::SampleClock;
use crate::config::AnalyzerConfig;
use crate::metering::{LoudnessAnalyzer, Measurement};
use crate::Result;
use std::time::Duration;

/// Frames per block the scratch buffer is sized for up front.
/// Covers the buffer sizes of common audio interfaces.
const MAX_FRAMES: usize = 8192;

/// Receiver of timestamped mono blocks.
///
/// Implementations are called from the audio thread and must not block.
pub trait SampleSink: Send {
    fn push_block(&mut self, samples: &[f32], now: Duration);
}

impl SampleSink for LoudnessAnalyzer {
    #[inline]
    fn push_block(&mut self, samples: &[f32], now: Duration) {
        let _ = self.push_block_at(samples, now);
    }
}

/// Something that produces audio and feeds it to a sink.
pub trait AudioSource {
    /// Handle that keeps the source running; dropping it stops the source.
    type Stream;

    /// The rate the source actually delivers, used to configure the analyzer.
    fn sample_rate(&self) -> f64;

    fn start<S: SampleSink + 'static>(self, sink: S) -> Result<Self::Stream>;
}

/// How interleaved multi-channel input is reduced to mono.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Downmix {
    /// Analyze the first channel only.
    #[default]
    FirstChannel,
    /// Average all channels.
    Average,
}

/// Deinterleaves input frames into a pre-allocated mono buffer.
///
/// RT-safe for blocks up to `MAX_FRAMES`; larger blocks grow the buffer
/// once and it stays that size.
pub struct ChannelTap {
    scratch: Vec<f32>,
    channels: usize,
    downmix: Downmix,
}

impl ChannelTap {
    pub fn new(channels: usize, downmix: Downmix) -> Self {
        Self {
            scratch: Vec::with_capacity(MAX_FRAMES),
            channels: channels.max(1),
            downmix,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn mono(&mut self, interleaved: &[f32]) -> &[f32] {
        self.mono_with(interleaved, |s| s)
    }

    /// Convert and downmix `interleaved` frames, returning the mono block.
    #[inline]
    pub fn mono_with<T, F>(&mut self, interleaved: &[T], to_f32: F) -> &[f32]
    where
        T: Copy,
        F: Fn(T) -> f32,
    {
        let channels = self.channels;
        let frames = interleaved.len() / channels;

        self.scratch.clear();
        match self.downmix {
            Downmix::FirstChannel => self.scratch.extend(
                interleaved
                    .chunks_exact(channels)
                    .map(|frame| to_f32(frame[0])),
            ),
            Downmix::Average => {
                let scale = 1.0 / channels as f32;
                self.scratch.extend(
                    interleaved
                        .chunks_exact(channels)
                        .map(|frame| frame.iter().map(|&s| to_f32(s)).sum::<f32>() * scale),
                )
            }
        }

        &self.scratch[..frames]
    }
}

/// Feeds a prerecorded mono signal in fixed-size blocks.
///
/// Blocks are timestamped with a [`SampleClock`], exactly as a live input
/// would be, so offline runs emit at the same cadence.
pub struct SliceSource<'a> {
    samples: &'a [f32],
    sample_rate: f64,
    block_size: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(samples: &'a [f32], sample_rate: f64, block_size: usize) -> Self {
        Self {
            samples,
            sample_rate,
            block_size: block_size.max(1),
        }
    }

    /// Drive `sink` with every block, the last one possibly short.
    pub fn feed<S: SampleSink + ?Sized>(&self, sink: &mut S) {
        let mut clock = SampleClock::new(self.sample_rate);
        for block in self.samples.chunks(self.block_size) {
            clock.advance(block.len());
            sink.push_block(block, clock.now());
        }
    }
}

impl AudioSource for SliceSource<'_> {
    type Stream = ();

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn start<S: SampleSink + 'static>(self, mut sink: S) -> Result<()> {
        self.feed(&mut sink);
        Ok(())
    }
}

/// Collects every emitted measurement without going through a queue.
struct Collector<'a> {
    analyzer: &'a mut LoudnessAnalyzer,
    readings: Vec<Measurement>,
}

impl SampleSink for Collector<'_> {
    fn push_block(&mut self, samples: &[f32], now: Duration) {
        if let Some(m) = self.analyzer.push_block_at(samples, now) {
            self.readings.push(m);
        }
    }
}

/// Run a whole mono signal through a fresh analyzer with default settings.
///
/// Returns every measurement that would have been emitted live, in order.
pub fn analyze_offline(
    samples: &[f32],
    sample_rate: f64,
    block_size: usize,
) -> Result<Vec<Measurement>> {
    let mut analyzer = LoudnessAnalyzer::new(AnalyzerConfig::new(sample_rate))?;
    let mut collector = Collector {
        analyzer: &mut analyzer,
        readings: Vec::new(),
    };

    SliceSource::new(samples, sample_rate, block_size).feed(&mut collector);
    Ok(collector.readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metering::FLOOR_DB;

    #[derive(Default)]
    struct Recorder {
        blocks: Vec<(usize, Duration)>,
    }

    impl SampleSink for Recorder {
        fn push_block(&mut self, samples: &[f32], now: Duration) {
            self.blocks.push((samples.len(), now));
        }
    }

    #[test]
    fn test_slice_source_blocks_and_timestamps() {
        let samples = vec![0.0f32; 1000];
        let mut recorder = Recorder::default();
        SliceSource::new(&samples, 1000.0, 300).feed(&mut recorder);

        assert_eq!(
            recorder.blocks,
            vec![
                (300, Duration::from_millis(300)),
                (300, Duration::from_millis(600)),
                (300, Duration::from_millis(900)),
                (100, Duration::from_millis(1000)),
            ]
        );
    }

    #[test]
    fn test_channel_tap_first_channel() {
        let mut tap = ChannelTap::new(2, Downmix::FirstChannel);
        let mono = tap.mono(&[0.1, 0.9, 0.2, 0.8, 0.3, 0.7]);
        assert_eq!(mono, &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_channel_tap_average() {
        let mut tap = ChannelTap::new(2, Downmix::Average);
        let mono = tap.mono(&[1.0, 0.0, -0.5, -0.5]);
        assert_eq!(mono, &[0.5, -0.5]);
    }

    #[test]
    fn test_channel_tap_converts_samples() {
        let mut tap = ChannelTap::new(1, Downmix::FirstChannel);
        let mono = tap.mono_with(&[i16::MAX, 0, i16::MIN], |s| s as f32 / 32768.0);
        assert_eq!(mono.len(), 3);
        assert!(mono[0] > 0.999);
        assert_eq!(mono[1], 0.0);
        assert_eq!(mono[2], -1.0);
    }

    #[test]
    fn test_channel_tap_ignores_partial_frame() {
        let mut tap = ChannelTap::new(2, Downmix::FirstChannel);
        assert_eq!(tap.mono(&[0.5, 0.5, 0.25]), &[0.5]);
    }

    #[test]
    fn test_analyze_offline_silence() {
        let silence = vec![0.0f32; 48000];
        let readings = analyze_offline(&silence, 48000.0, 480).unwrap();
        assert_eq!(readings.len(), 20);
        assert!(readings.iter().all(|m| *m == Measurement::SILENT));
        assert!(readings.iter().all(|m| m.integrated == FLOOR_DB));
    }

    #[test]
    fn test_analyze_offline_rejects_bad_rate() {
        assert!(analyze_offline(&[0.0; 16], -1.0, 4).is_err());
    }
}
