//! Message passing between the audio thread and its consumers.
//!
//! Measurements flow out over a bounded queue that the producer never
//! blocks on: when the consumer falls behind, the oldest unread
//! measurement is discarded to make room. Control commands flow in the
//! other direction and are drained by the analyzer on its next block.

use super::Measurement;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Pending control commands beyond this are rejected rather than queued.
const CONTROL_CAPACITY: usize = 16;

/// Result of handing a measurement to the output queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Queued without displacing anything.
    Delivered,
    /// Queued after discarding the oldest unread measurement.
    Coalesced,
    /// Every receiver is gone.
    Disconnected,
}

/// Create a bounded measurement queue holding at most `capacity` unread values.
pub fn measurement_channel(capacity: usize) -> (MeasurementSender, MeasurementReceiver) {
    let (tx, rx) = bounded(capacity.max(1));
    let dropped = Arc::new(AtomicU64::new(0));

    (
        MeasurementSender {
            tx,
            evict: rx.clone(),
            dropped: Arc::clone(&dropped),
        },
        MeasurementReceiver { rx, dropped },
    )
}

/// Producer half, owned by the analyzer on the audio thread.
pub struct MeasurementSender {
    tx: Sender<Measurement>,
    // Second handle on the queue, used only to evict the oldest value.
    evict: Receiver<Measurement>,
    dropped: Arc<AtomicU64>,
}

impl MeasurementSender {
    /// Queue a measurement. Lock-free and allocation-free; never blocks.
    #[inline]
    pub fn send(&self, measurement: Measurement) -> SendOutcome {
        if self.is_disconnected() {
            return SendOutcome::Disconnected;
        }

        let mut pending = measurement;
        let mut coalesced = false;

        // The consumer can only make room, so two attempts are enough.
        for _ in 0..2 {
            match self.tx.try_send(pending) {
                Ok(()) => {
                    return if coalesced {
                        SendOutcome::Coalesced
                    } else {
                        SendOutcome::Delivered
                    };
                }
                Err(TrySendError::Full(m)) => {
                    pending = m;
                    if self.evict.try_recv().is_ok() {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                        coalesced = true;
                    }
                }
                Err(TrySendError::Disconnected(_)) => return SendOutcome::Disconnected,
            }
        }

        // Still full: give up on this value rather than spin.
        self.dropped.fetch_add(1, Ordering::Relaxed);
        SendOutcome::Coalesced
    }

    /// Whether the consumer half has been dropped.
    ///
    /// The sender keeps its own eviction handle, so the queue itself never
    /// reports disconnection. The shared drop counter is held by exactly one
    /// receiver, which makes its reference count a liveness check.
    #[inline]
    pub fn is_disconnected(&self) -> bool {
        Arc::strong_count(&self.dropped) == 1
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Consumer half, read by the UI or any other non-real-time thread.
pub struct MeasurementReceiver {
    rx: Receiver<Measurement>,
    dropped: Arc<AtomicU64>,
}

impl MeasurementReceiver {
    /// Block until the next measurement. `None` once the producer is gone.
    pub fn recv(&self) -> Option<Measurement> {
        self.rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Measurement> {
        match self.rx.recv_timeout(timeout) {
            Ok(m) => Some(m),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn try_recv(&self) -> Option<Measurement> {
        match self.rx.try_recv() {
            Ok(m) => Some(m),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain everything queued and keep only the newest value.
    pub fn latest(&self) -> Option<Measurement> {
        self.rx.try_iter().last()
    }

    /// Iterate over the measurements queued right now, oldest first.
    pub fn try_iter(&self) -> impl Iterator<Item = Measurement> + '_ {
        self.rx.try_iter()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Measurements discarded because this receiver fell behind.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Commands accepted by a running analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Zero the integrated-loudness accumulator. Sample history is kept.
    Reset,
    /// Zero the sample history. The integrated accumulator is kept.
    ClearHistory,
}

/// Create the control queue for one analyzer.
pub fn control_channel() -> (ControlHandle, ControlReceiver) {
    let (tx, rx) = bounded(CONTROL_CAPACITY);
    (ControlHandle { tx }, ControlReceiver { rx })
}

/// Cloneable sender for [`Control`] commands (safe from any thread).
#[derive(Clone)]
pub struct ControlHandle {
    tx: Sender<Control>,
}

impl ControlHandle {
    /// Returns `false` if the command could not be queued.
    pub fn send(&self, control: Control) -> bool {
        self.tx.try_send(control).is_ok()
    }

    pub fn reset(&self) -> bool {
        self.send(Control::Reset)
    }

    pub fn clear_history(&self) -> bool {
        self.send(Control::ClearHistory)
    }
}

/// Receiving side of the control queue, owned by the analyzer.
pub struct ControlReceiver {
    rx: Receiver<Control>,
}

impl ControlReceiver {
    #[inline]
    pub fn try_recv(&self) -> Option<Control> {
        self.rx.try_recv().ok()
    }
}
