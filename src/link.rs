//! Mode selection: builds the capture loop the configuration asks for.

use tracing::info;

use crate::buffer::{CaptureBuffer, ChunkBuffer};
use crate::config::{LinkConfig, Mode};
use crate::error::LinkError;
use crate::hal::{AnalogInput, Clock, DigitalInput};
use crate::session::{PttSession, StreamLoop};
use crate::strategy::{BlockStrategy, StreamStrategy};
use crate::transport::{TcpBlockSender, UdpChunkSender};

/// Push-to-talk loop over TCP.
pub type PttLink<'c, A, B, C> = PttSession<'c, A, B, C, BlockStrategy<TcpBlockSender>>;

/// Streaming loop over UDP.
pub type StreamLink<A, C> = StreamLoop<A, C, StreamStrategy<UdpChunkSender>>;

/// The loop selected by [`LinkConfig::mode`].
pub enum Link<'c, A, B, C> {
    PushToTalk(PttLink<'c, A, B, C>),
    Stream(StreamLink<A, C>),
}

impl<'c, A, B, C> Link<'c, A, B, C>
where
    A: AnalogInput,
    B: DigitalInput,
    C: Clock,
{
    /// Validate `config`, allocate buffers and open transports.
    ///
    /// Every failure here is fatal: the caller should report it and stop.
    pub fn build(config: &'c LinkConfig, analog: A, button: B, clock: C) -> Result<Self, LinkError> {
        config.validate()?;
        match config.mode {
            Mode::PushToTalk => {
                let buffer = CaptureBuffer::with_capacity(config.record_capacity()?)?;
                let transport = TcpBlockSender::from_config(config)?;
                info!(
                    "push-to-talk: {} byte buffer ({} s at {} Hz), sending to {}",
                    buffer.capacity(),
                    config.audio.max_record_seconds,
                    config.audio.sample_rate,
                    transport.remote()
                );
                let strategy = BlockStrategy::new(buffer, transport);
                Ok(Link::PushToTalk(PttSession::new(config, analog, button, clock, strategy)))
            }
            Mode::Stream => {
                let chunk = ChunkBuffer::with_size(config.audio.chunk_size)?;
                let transport = UdpChunkSender::from_config(config)?;
                info!(
                    "stream: {} byte chunks at {} Hz, sending to {}",
                    chunk.size(),
                    config.audio.sample_rate,
                    transport.remote()
                );
                let strategy = StreamStrategy::new(chunk, transport);
                Ok(Link::Stream(StreamLoop::new(config, analog, clock, strategy)))
            }
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::PushToTalk(_) => Mode::PushToTalk,
            Self::Stream(_) => Mode::Stream,
        }
    }

    /// Run the selected loop until the process is halted.
    pub fn run_forever(self) -> ! {
        match self {
            Self::PushToTalk(mut session) => session.run_forever(),
            Self::Stream(mut stream) => stream.run_forever(),
        }
    }
}
