//! Fixed-capacity sample history.

/// Circular store of the most recent mono samples.
///
/// The backing storage is allocated and zero-filled once at construction.
/// `push` only writes a slot and advances the cursor, so the audio thread
/// never allocates. Reads over history that was never written see silence.
#[derive(Clone)]
pub struct SampleRing {
    slots: Vec<f32>,
    cursor: usize,
}

impl SampleRing {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity > 0,
            "SampleRing capacity must be greater than zero"
        );

        Self {
            slots: vec![0.0; capacity],
            cursor: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the next slot to be written.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.slots[self.cursor] = sample;
        self.cursor += 1;
        if self.cursor == self.slots.len() {
            self.cursor = 0;
        }
    }

    /// Push a block, oldest sample first.
    #[inline]
    pub fn push_block(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.push(sample);
        }
    }

    /// Walk the most recent `window` samples, newest first.
    ///
    /// `window` must not exceed the capacity; the analyzer guarantees this
    /// when it validates its configuration.
    #[inline]
    pub fn recent(&self, window: usize) -> Recent<'_> {
        debug_assert!(
            window <= self.capacity(),
            "window of {window} samples exceeds ring capacity {}",
            self.capacity()
        );

        Recent {
            slots: &self.slots,
            index: self.cursor,
            remaining: window.min(self.slots.len()),
        }
    }

    /// Zero the history and rewind the cursor.
    pub fn clear(&mut self) {
        self.slots.fill(0.0);
        self.cursor = 0;
    }
}

impl core::fmt::Debug for SampleRing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SampleRing")
            .field("capacity", &self.capacity())
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// Backward iterator over recent history, see [`SampleRing::recent`].
pub struct Recent<'a> {
    slots: &'a [f32],
    index: usize,
    remaining: usize,
}

impl Iterator for Recent<'_> {
    type Item = f32;

    #[inline]
    fn next(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }

        self.index = if self.index == 0 {
            self.slots.len() - 1
        } else {
            self.index - 1
        };
        self.remaining -= 1;
        Some(self.slots[self.index])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Recent<'_> {}
