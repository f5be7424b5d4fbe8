//! Capture buffers
//!
//! - [`CaptureBuffer`]: one large linear buffer for a whole push-to-talk
//!   utterance, truncated wherever capture stopped
//! - [`ChunkBuffer`]: small fixed-size chunk, cycled every time it fills
//!
//! Both are allocated once at startup and overwritten, never reallocated.
//! Writes past capacity are refused, not wrapped.

use crate::error::LinkError;
use crate::sample::Sample;

fn allocate(capacity: usize) -> Result<Box<[u8]>, LinkError> {
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(capacity)
        .map_err(|_| LinkError::Allocation { requested: capacity })?;
    storage.resize(capacity, 0);
    Ok(storage.into_boxed_slice())
}

/// Linear buffer for one recording session.
pub struct CaptureBuffer {
    storage: Box<[u8]>,
    filled: usize,
}

impl CaptureBuffer {
    /// Reserve `capacity` bytes up front.
    ///
    /// Fails with [`LinkError::Allocation`] instead of halting when the heap
    /// cannot hold the recording window.
    pub fn with_capacity(capacity: usize) -> Result<Self, LinkError> {
        Ok(Self {
            storage: allocate(capacity)?,
            filled: 0,
        })
    }

    /// Store the next sample.
    ///
    /// Returns `false` (and stores nothing) if the buffer is already full.
    #[inline]
    pub fn push(&mut self, sample: Sample) -> bool {
        match self.storage.get_mut(self.filled) {
            Some(slot) => {
                *slot = sample;
                self.filled += 1;
                true
            }
            None => false,
        }
    }

    /// Captured range `[0, filled)`.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.filled]
    }

    /// Forget captured samples. Contents are overwritten by the next session.
    #[inline]
    pub fn clear(&mut self) {
        self.filled = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.filled
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.filled == self.storage.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }
}

/// Fixed-size chunk for the streaming mode.
pub struct ChunkBuffer {
    storage: Box<[u8]>,
    cursor: usize,
}

impl ChunkBuffer {
    pub fn with_size(size: usize) -> Result<Self, LinkError> {
        Ok(Self {
            storage: allocate(size)?,
            cursor: 0,
        })
    }

    /// Store a sample at the cursor.
    ///
    /// Returns `true` when this sample completed the chunk. A full chunk
    /// refuses further samples until [`ChunkBuffer::reset`].
    #[inline]
    pub fn push(&mut self, sample: Sample) -> bool {
        if let Some(slot) = self.storage.get_mut(self.cursor) {
            *slot = sample;
            self.cursor += 1;
        }
        self.is_full()
    }

    /// The full chunk, or `None` while it is still filling.
    #[inline]
    pub fn full_chunk(&self) -> Option<&[u8]> {
        if self.is_full() {
            Some(&self.storage)
        } else {
            None
        }
    }

    /// Samples stored so far in the current chunk.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.cursor]
    }

    #[inline]
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.cursor == self.storage.len()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.storage.len()
    }
}
