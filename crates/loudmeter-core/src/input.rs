//! CPAL audio input (feature `input`).

use crate::clock::SampleClock;
use crate::source::{AudioSource, ChannelTap, Downmix, SampleSink};
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::Sample;

/// Wrapper to hold a `cpal::Stream` in a `Send` context.
///
/// `cpal::Stream` is `!Send` due to platform internals. The handle is only
/// ever touched by its owner and dropped on the thread that owns it.
struct StreamHandle(cpal::Stream);

// SAFETY: the stream is never accessed concurrently; `InputStream` only
// exposes `&mut self` methods that forward to it.
unsafe impl Send for StreamHandle {}

/// Capture device whose samples feed a [`SampleSink`].
///
/// The stream configuration is the device default, so the sample rate
/// reported here is the one actually negotiated with the hardware.
pub struct CpalInput {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
    downmix: Downmix,
}

impl CpalInput {
    /// Open the host's default input device.
    pub fn default_device() -> Result<Self> {
        Self::open(None)
    }

    /// Open an input device by its index in [`CpalInput::list_devices`].
    pub fn with_device(index: usize) -> Result<Self> {
        Self::open(Some(index))
    }

    pub fn open(index: Option<usize>) -> Result<Self> {
        let device = get_device(index)?;
        let config = device.default_input_config()?;

        tracing::debug!(
            device = %device.name().unwrap_or_default(),
            sample_rate = config.sample_rate().0,
            channels = config.channels(),
            format = ?config.sample_format(),
            "input device opened"
        );

        Ok(Self {
            device,
            config,
            downmix: Downmix::default(),
        })
    }

    pub fn downmix(mut self, downmix: Downmix) -> Self {
        self.downmix = downmix;
        self
    }

    pub fn channels(&self) -> usize {
        self.config.channels() as usize
    }

    pub fn device_name(&self) -> Result<String> {
        Ok(self.device.name()?)
    }

    pub fn list_devices() -> Result<Vec<String>> {
        cpal::default_host()
            .input_devices()?
            .enumerate()
            .map(|(i, d)| Ok(format!("{i}: {}", d.name()?)))
            .collect()
    }
}

impl AudioSource for CpalInput {
    type Stream = InputStream;

    fn sample_rate(&self) -> f64 {
        self.config.sample_rate().0 as f64
    }

    fn start<S: SampleSink + 'static>(self, sink: S) -> Result<InputStream> {
        let sample_rate = self.sample_rate();
        let channels = self.channels();
        let stream_config: cpal::StreamConfig = self.config.clone().into();

        let stream = match self.config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32, S>(&self.device, &stream_config, sink, self.downmix)?
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16, S>(&self.device, &stream_config, sink, self.downmix)?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16, S>(&self.device, &stream_config, sink, self.downmix)?
            }
            format => {
                return Err(Error::UnsupportedSampleFormat(format!("{format:?}")));
            }
        };

        stream.play()?;
        tracing::info!(sample_rate, channels, "input stream started");

        Ok(InputStream {
            stream: StreamHandle(stream),
            sample_rate,
            channels,
        })
    }
}

/// Running capture stream. Dropping it stops capture.
pub struct InputStream {
    stream: StreamHandle,
    sample_rate: f64,
    channels: usize,
}

impl InputStream {
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn pause(&mut self) -> Result<()> {
        Ok(self.stream.0.pause()?)
    }

    pub fn resume(&mut self) -> Result<()> {
        Ok(self.stream.0.play()?)
    }
}

fn get_device(index: Option<usize>) -> Result<cpal::Device> {
    let host = cpal::default_host();

    match index {
        Some(i) => {
            let devices: Vec<_> = host.input_devices()?.collect();
            let count = devices.len();
            devices.into_iter().nth(i).ok_or_else(|| {
                Error::InvalidDevice(format!("Device index {i} out of range ({count} available)"))
            })
        }
        None => host
            .default_input_device()
            .ok_or_else(|| Error::InvalidDevice("No input device available".into())),
    }
}

fn build_stream<T, S>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut sink: S,
    downmix: Downmix,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample,
    f32: cpal::FromSample<T>,
    S: SampleSink + 'static,
{
    let mut tap = ChannelTap::new(config.channels as usize, downmix);
    let mut clock = SampleClock::new(config.sample_rate.0 as f64);

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            // A panic must not unwind into the host's audio thread.
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let mono = tap.mono_with(data, f32::from_sample);
                clock.advance(mono.len());
                sink.push_block(mono, clock.now());
            }));
        },
        |err| tracing::warn!("input stream error: {err}"),
        None,
    )?;

    Ok(stream)
}
