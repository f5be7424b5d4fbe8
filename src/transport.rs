//! Network delivery of captured audio.
//!
//! Both transports are at-most-once: a payload goes out zero or one time,
//! nothing is queued for retry.
//!
//! - [`TcpBlockSender`]: push-to-talk mode. Connect, write the whole
//!   utterance, flush, wait, close. One connection per utterance.
//! - [`UdpChunkSender`]: stream mode. One datagram per chunk, errors are
//!   invisible to the caller.

use std::io::{self, Write};
use std::net::{Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpStream, UdpSocket};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::config::LinkConfig;
use crate::error::{LinkError, TransportError};

/// Connection-oriented sender for a whole recording.
pub trait BlockTransport {
    /// Deliver `block` or report why it was dropped.
    fn send_block(&mut self, block: &[u8]) -> Result<(), TransportError>;
}

/// Connectionless sender for one chunk. Fire-and-forget.
pub trait DatagramTransport {
    fn send_chunk(&mut self, chunk: &[u8]);
}

impl<T: BlockTransport + ?Sized> BlockTransport for &mut T {
    #[inline]
    fn send_block(&mut self, block: &[u8]) -> Result<(), TransportError> {
        (**self).send_block(block)
    }
}

impl<T: DatagramTransport + ?Sized> DatagramTransport for &mut T {
    #[inline]
    fn send_chunk(&mut self, chunk: &[u8]) {
        (**self).send_chunk(chunk)
    }
}

/// TCP block sender.
#[derive(Debug, Clone)]
pub struct TcpBlockSender {
    remote: SocketAddr,
    connect_timeout: Duration,
    flush_wait: Duration,
}

impl TcpBlockSender {
    pub fn new(remote: SocketAddr, connect_timeout: Duration, flush_wait: Duration) -> Self {
        Self {
            remote,
            // connect_timeout rejects a zero duration
            connect_timeout: connect_timeout.max(Duration::from_millis(1)),
            flush_wait,
        }
    }

    pub fn from_config(config: &LinkConfig) -> Result<Self, LinkError> {
        Ok(Self::new(
            config.remote_addr()?,
            Duration::from_millis(config.network.connect_timeout_ms as u64),
            Duration::from_millis(config.timing.flush_wait_ms as u64),
        ))
    }

    pub fn remote(&self) -> SocketAddr {
        self.remote
    }
}

impl BlockTransport for TcpBlockSender {
    fn send_block(&mut self, block: &[u8]) -> Result<(), TransportError> {
        // Dropping the stream closes it on every exit path
        let mut stream = TcpStream::connect_timeout(&self.remote, self.connect_timeout)
            .map_err(TransportError::Connect)?;
        debug!("connected to {} for {} byte block", self.remote, block.len());

        stream.write_all(block).map_err(TransportError::Write)?;
        stream.flush().map_err(TransportError::Flush)?;

        // No application-level ack: give the stack time to drain before close
        if !self.flush_wait.is_zero() {
            thread::sleep(self.flush_wait);
        }
        let _ = stream.shutdown(Shutdown::Write);
        Ok(())
    }
}

/// UDP chunk sender bound once at startup.
#[derive(Debug)]
pub struct UdpChunkSender {
    socket: UdpSocket,
    remote: SocketAddr,
}

impl UdpChunkSender {
    /// Bind `local_port` on all interfaces (0 = ephemeral).
    pub fn open(local_port: u16, remote: SocketAddr) -> io::Result<Self> {
        let local: SocketAddr = match remote {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, local_port).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, local_port).into(),
        };
        let socket = UdpSocket::bind(local)?;
        debug!("datagram socket bound on {}", socket.local_addr()?);
        Ok(Self { socket, remote })
    }

    pub fn from_config(config: &LinkConfig) -> Result<Self, LinkError> {
        Self::open(config.network.local_port, config.remote_addr()?).map_err(LinkError::Socket)
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn remote(&self) -> SocketAddr {
        self.remote
    }
}

impl DatagramTransport for UdpChunkSender {
    #[inline]
    fn send_chunk(&mut self, chunk: &[u8]) {
        let _ = self.socket.send_to(chunk, self.remote);
    }
}
