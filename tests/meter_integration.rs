//! End-to-end tests through the `LoudnessMeter` facade
//!
//! The analyzer runs on its own thread (or inside a source) and the test
//! plays the consumer, reading measurements and sending commands.

#[path = "helpers/mod.rs"]
mod helpers;

use approx::assert_abs_diff_eq;
use helpers::tolerances::*;
use helpers::{generate_silence, generate_sine, seconds, TEST_BLOCK_SIZE, TEST_SAMPLE_RATE};
use loudmeter::prelude::*;
use loudmeter::FLOOR_DB;
use std::thread;
use std::time::Duration;

/// Linearly rising level: every trailing window is louder than the last.
fn generate_ramp(num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| (i + 1) as f32 / num_samples as f32)
        .collect()
}

fn assert_rising(readings: &[Measurement]) {
    for pair in readings.windows(2) {
        assert!(
            pair[1].momentary > pair[0].momentary,
            "readings out of order: {} then {}",
            pair[0].momentary,
            pair[1].momentary
        );
    }
}

// =============================================================================
// Sources
// =============================================================================

#[test]
fn test_slice_source_delivers_every_measurement() {
    let signal = generate_sine(1000.0, 1.0, TEST_SAMPLE_RATE, seconds(2.0));
    let source = SliceSource::new(&signal, TEST_SAMPLE_RATE, TEST_BLOCK_SIZE);

    let (meter, ()) = LoudnessMeter::builder()
        .output_capacity(128)
        .build_with(source)
        .unwrap();

    assert_eq!(meter.sample_rate(), TEST_SAMPLE_RATE);
    assert!(!meter.is_live());

    let readings: Vec<Measurement> = meter.readings().try_iter().collect();
    assert_eq!(readings.len(), 40);
    assert_eq!(meter.dropped(), 0);

    let last = readings.last().unwrap();
    assert_abs_diff_eq!(last.momentary, FULL_SCALE_SINE_RMS_DB, epsilon = TONE_DB);
    assert_abs_diff_eq!(last.true_peak, 0.0, epsilon = TONE_DB);

    // Source finished and dropped the analyzer
    assert!(meter.recv().is_none());
}

#[test]
fn test_offline_matches_live_source() {
    let signal = generate_sine(220.0, 0.25, TEST_SAMPLE_RATE, seconds(1.5));

    let offline = loudmeter::analyze_offline(&signal, TEST_SAMPLE_RATE, TEST_BLOCK_SIZE).unwrap();

    let (meter, ()) = LoudnessMeter::builder()
        .output_capacity(64)
        .build_with(SliceSource::new(&signal, TEST_SAMPLE_RATE, TEST_BLOCK_SIZE))
        .unwrap();
    let live: Vec<Measurement> = meter.readings().try_iter().collect();

    assert_eq!(offline, live);
}

// =============================================================================
// Threads
// =============================================================================

#[test]
fn test_analyzer_on_audio_thread() {
    let (meter, mut analyzer) = LoudnessMeter::builder()
        .output_capacity(64)
        .build_detached(TEST_SAMPLE_RATE)
        .unwrap();

    let signal = generate_ramp(seconds(2.0));
    let audio = thread::spawn(move || {
        for block in signal.chunks(TEST_BLOCK_SIZE) {
            analyzer.push_block(block);
        }
    });

    let mut readings = Vec::new();
    while let Some(m) = meter.recv_timeout(Duration::from_secs(5)) {
        readings.push(m);
    }
    audio.join().unwrap();

    assert_eq!(readings.len(), 40);
    assert_eq!(meter.dropped(), 0);
    assert_rising(&readings);
}

#[test]
fn test_slow_consumer_keeps_newest_in_order() {
    let capacity = 4;
    let (meter, mut analyzer) = LoudnessMeter::builder()
        .output_capacity(capacity)
        .build_detached(TEST_SAMPLE_RATE)
        .unwrap();

    let signal = generate_ramp(seconds(2.0));
    let audio = thread::spawn(move || {
        for block in signal.chunks(TEST_BLOCK_SIZE) {
            analyzer.push_block(block);
        }
        analyzer.last_measurement()
    });
    let newest = audio.join().unwrap();

    // Consumer wakes up only after 40 emissions
    let readings: Vec<Measurement> = meter.readings().try_iter().collect();
    assert_eq!(readings.len(), capacity);
    assert_eq!(meter.dropped(), 40 - capacity as u64);
    assert_rising(&readings);
    assert_eq!(*readings.last().unwrap(), newest);
}

#[test]
fn test_latest_drains_queue() {
    let (meter, mut analyzer) = LoudnessMeter::builder()
        .build_detached(TEST_SAMPLE_RATE)
        .unwrap();

    let mut last = None;
    for block in generate_ramp(seconds(0.5)).chunks(TEST_BLOCK_SIZE) {
        last = analyzer.push_block(block).or(last);
    }

    assert_eq!(meter.latest(), last);
    assert!(meter.try_recv().is_none());
}

#[test]
fn test_idle_analyzer_times_out_without_closing() {
    let (meter, mut analyzer) = LoudnessMeter::builder()
        .build_detached(TEST_SAMPLE_RATE)
        .unwrap();

    // Analyzer alive but not fed: the queue stays open and only times out
    assert!(meter.recv_timeout(Duration::from_millis(20)).is_none());

    let emitted = analyzer.push_block(&generate_silence(seconds(0.05)));
    assert!(emitted.is_some());
    assert_eq!(meter.recv_timeout(Duration::from_millis(20)), emitted);

    drop(analyzer);
    assert!(meter.recv().is_none());
}

#[test]
fn test_dropped_meter_does_not_stop_analyzer() {
    let (meter, mut analyzer) = LoudnessMeter::builder()
        .build_detached(TEST_SAMPLE_RATE)
        .unwrap();
    drop(meter);

    let emitted = generate_silence(seconds(1.0))
        .chunks(TEST_BLOCK_SIZE)
        .filter_map(|block| analyzer.push_block(block))
        .count();
    assert_eq!(emitted, 20);
}

// =============================================================================
// Control
// =============================================================================

#[test]
fn test_reset_through_meter() {
    let (meter, mut analyzer) = LoudnessMeter::builder()
        .build_detached(TEST_SAMPLE_RATE)
        .unwrap();

    for block in generate_sine(1000.0, 1.0, TEST_SAMPLE_RATE, seconds(2.0)).chunks(TEST_BLOCK_SIZE) {
        analyzer.push_block(block);
    }
    assert!(analyzer.integration().count() > 0);

    assert!(meter.reset());
    // Nothing happens until the audio thread's next block
    assert!(analyzer.integration().count() > 0);

    let quiet = generate_sine(1000.0, 0.1, TEST_SAMPLE_RATE, seconds(0.4));
    let after = analyzer.push_block(&quiet).unwrap();

    assert_eq!(analyzer.integration().count(), 1);
    assert_abs_diff_eq!(after.integrated, after.momentary, epsilon = EXACT_DB);
    assert_abs_diff_eq!(after.integrated, -23.0103, epsilon = TONE_DB);
}

#[test]
fn test_clear_history_keeps_integrated() {
    let (meter, mut analyzer) = LoudnessMeter::builder()
        .build_detached(TEST_SAMPLE_RATE)
        .unwrap();

    for block in generate_sine(1000.0, 0.5, TEST_SAMPLE_RATE, seconds(1.0)).chunks(TEST_BLOCK_SIZE) {
        analyzer.push_block(block);
    }
    let before = analyzer.last_measurement();

    assert!(meter.clear_history());
    let after = analyzer.push_block(&generate_silence(seconds(0.05))).unwrap();

    assert_eq!(after.momentary, FLOOR_DB);
    assert_eq!(after.short_term, FLOOR_DB);
    assert_eq!(after.true_peak, FLOOR_DB);
    // Floored block is below the gate, so the estimate is unchanged
    assert_abs_diff_eq!(after.integrated, before.integrated, epsilon = EXACT_DB);
}

#[test]
fn test_control_handle_from_other_thread() {
    let (meter, mut analyzer) = LoudnessMeter::builder()
        .build_detached(TEST_SAMPLE_RATE)
        .unwrap();

    for block in generate_sine(1000.0, 1.0, TEST_SAMPLE_RATE, seconds(1.0)).chunks(TEST_BLOCK_SIZE) {
        analyzer.push_block(block);
    }

    let control = meter.control();
    thread::spawn(move || assert!(control.send(Control::Reset)))
        .join()
        .unwrap();

    analyzer.process_control();
    assert_eq!(analyzer.integration().count(), 0);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_builder_rejects_invalid_settings() {
    assert!(LoudnessMeter::builder().build_detached(0.0).is_err());
    assert!(LoudnessMeter::builder()
        .output_capacity(0)
        .build_detached(TEST_SAMPLE_RATE)
        .is_err());
    assert!(LoudnessMeter::builder()
        .throttle(Duration::ZERO)
        .build_detached(TEST_SAMPLE_RATE)
        .is_err());
}

#[test]
fn test_custom_throttle_changes_cadence() {
    let signal = generate_silence(seconds(1.0));
    let (meter, ()) = LoudnessMeter::builder()
        .throttle(Duration::from_millis(100))
        .build_with(SliceSource::new(&signal, TEST_SAMPLE_RATE, TEST_BLOCK_SIZE))
        .unwrap();

    assert_eq!(meter.readings().try_iter().count(), 10);
}
