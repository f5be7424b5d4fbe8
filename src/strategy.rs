//! Capture strategies: how samples are buffered and delivered.
//!
//! The two operating modes share the sampler and differ only here:
//!
//! | Strategy           | Buffer          | Delivery                  | Cycle        |
//! |--------------------|-----------------|---------------------------|--------------|
//! | [`BlockStrategy`]  | whole utterance | one block at end of cycle | push-to-talk |
//! | [`StreamStrategy`] | small chunk     | one datagram per chunk    | continuous   |

use tracing::warn;

use crate::buffer::{CaptureBuffer, ChunkBuffer};
use crate::error::TransportError;
use crate::sample::Sample;
use crate::transport::{BlockTransport, DatagramTransport};

/// Result of storing one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleFlow {
    /// Room for more samples.
    Continue,
    /// Buffer exhausted, the cycle must end.
    Full,
}

/// What happened to the captured audio at the end of a cycle.
#[derive(Debug)]
pub enum SendOutcome {
    /// Payload handed to the network.
    Delivered { bytes: usize },
    /// Transport failed, payload dropped.
    Failed(TransportError),
    /// Nothing captured, no connection attempted.
    SkippedEmpty,
    /// Partial chunk thrown away.
    Discarded { samples: usize },
}

/// Buffering and delivery policy behind the sample loop.
pub trait CaptureStrategy {
    /// Prepare an empty buffer for a new cycle.
    fn begin_cycle(&mut self);

    /// Store one sample in acquisition order.
    fn on_sample(&mut self, sample: Sample) -> SampleFlow;

    /// Deliver (or drop) what the cycle captured and reset the buffer.
    fn end_cycle(&mut self) -> SendOutcome;

    /// Samples held right now.
    fn filled(&self) -> usize;

    /// Samples the buffer can hold.
    fn capacity(&self) -> usize;
}

/// Push-to-talk: record into one buffer, send it as one block.
pub struct BlockStrategy<T> {
    buffer: CaptureBuffer,
    transport: T,
}

impl<T: BlockTransport> BlockStrategy<T> {
    pub fn new(buffer: CaptureBuffer, transport: T) -> Self {
        Self { buffer, transport }
    }

    pub fn buffer(&self) -> &CaptureBuffer {
        &self.buffer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T: BlockTransport> CaptureStrategy for BlockStrategy<T> {
    fn begin_cycle(&mut self) {
        self.buffer.clear();
    }

    #[inline]
    fn on_sample(&mut self, sample: Sample) -> SampleFlow {
        self.buffer.push(sample);
        if self.buffer.is_full() {
            SampleFlow::Full
        } else {
            SampleFlow::Continue
        }
    }

    fn end_cycle(&mut self) -> SendOutcome {
        let outcome = if self.buffer.is_empty() {
            SendOutcome::SkippedEmpty
        } else {
            let block = self.buffer.as_slice();
            match self.transport.send_block(block) {
                Ok(()) => SendOutcome::Delivered { bytes: block.len() },
                Err(e) => SendOutcome::Failed(e),
            }
        };
        self.buffer.clear();
        outcome
    }

    fn filled(&self) -> usize {
        self.buffer.len()
    }

    fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

/// Streaming: send every chunk the moment it fills.
pub struct StreamStrategy<T> {
    chunk: ChunkBuffer,
    transport: T,
    chunks_sent: u64,
}

impl<T: DatagramTransport> StreamStrategy<T> {
    pub fn new(chunk: ChunkBuffer, transport: T) -> Self {
        Self {
            chunk,
            transport,
            chunks_sent: 0,
        }
    }

    /// Chunks handed to the transport since boot.
    pub fn chunks_sent(&self) -> u64 {
        self.chunks_sent
    }

    /// Position where the next sample will land.
    pub fn cursor(&self) -> usize {
        self.chunk.cursor()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T: DatagramTransport> CaptureStrategy for StreamStrategy<T> {
    fn begin_cycle(&mut self) {
        self.chunk.reset();
    }

    #[inline]
    fn on_sample(&mut self, sample: Sample) -> SampleFlow {
        if self.chunk.push(sample) {
            if let Some(full) = self.chunk.full_chunk() {
                self.transport.send_chunk(full);
            }
            self.chunks_sent += 1;
            self.chunk.reset();
        }
        SampleFlow::Continue
    }

    fn end_cycle(&mut self) -> SendOutcome {
        let samples = self.chunk.cursor();
        if samples > 0 {
            warn!("discarding partial chunk of {} samples", samples);
        }
        self.chunk.reset();
        SendOutcome::Discarded { samples }
    }

    fn filled(&self) -> usize {
        self.chunk.cursor()
    }

    fn capacity(&self) -> usize {
        self.chunk.size()
    }
}
