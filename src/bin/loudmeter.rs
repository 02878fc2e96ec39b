//! Print live loudness readings from an input device.
//!
//! Usage: `loudmeter [--list | DEVICE_INDEX]`

use loudmeter::prelude::*;
use std::time::Duration;

/// Silence from the device for this long is reported as a stall.
const STALL_TIMEOUT: Duration = Duration::from_secs(2);

fn main() -> loudmeter::Result<()> {
    tracing_subscriber::fmt::init();

    let mut builder = LoudnessMeter::builder();

    if let Some(arg) = std::env::args().nth(1) {
        if arg == "--list" {
            for device in CpalInput::list_devices().map_err(loudmeter::Error::from)? {
                println!("{device}");
            }
            return Ok(());
        }

        match arg.parse::<usize>() {
            Ok(index) => builder = builder.input_device(index),
            Err(_) => {
                eprintln!("usage: loudmeter [--list | DEVICE_INDEX]");
                std::process::exit(2);
            }
        }
    }

    let meter = builder.build()?;
    tracing::info!(
        sample_rate = meter.sample_rate(),
        "metering input, press Ctrl+C to stop"
    );

    // Runs until interrupted; the meter keeps the stream alive.
    loop {
        match meter.recv_timeout(STALL_TIMEOUT) {
            Some(m) => {
                let led = if m.is_active() { '*' } else { ' ' };
                println!("[{led}] {m}");
            }
            None => tracing::warn!(
                dropped = meter.dropped(),
                "no measurements for {STALL_TIMEOUT:?}, input stalled"
            ),
        }
    }
}
