//! Error types for RustVoiceLink.
//!
//! Startup errors are fatal and stop the firmware with a diagnostic.
//! Transport errors are recoverable: the session is dropped and the
//! state machine goes back to idle.

use std::io;

use crate::config::ConfigError;

/// Fatal startup error.
#[derive(Debug)]
pub enum LinkError {
    /// Capture buffer could not be reserved.
    Allocation {
        /// Bytes requested.
        requested: usize,
    },
    /// Configuration rejected by validation.
    Config(ConfigError),
    /// Datagram socket could not be bound.
    Socket(io::Error),
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Allocation { requested } => {
                write!(f, "failed to allocate {} bytes for the audio buffer", requested)
            }
            Self::Config(e) => write!(f, "invalid configuration: {}", e),
            Self::Socket(e) => write!(f, "failed to open datagram socket: {}", e),
        }
    }
}

impl std::error::Error for LinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Allocation { .. } => None,
            Self::Config(e) => Some(e),
            Self::Socket(e) => Some(e),
        }
    }
}

impl From<ConfigError> for LinkError {
    fn from(e: ConfigError) -> Self {
        LinkError::Config(e)
    }
}

/// Block transport failure. The payload is dropped, never retried.
#[derive(Debug)]
pub enum TransportError {
    /// Remote endpoint refused or did not answer.
    Connect(io::Error),
    /// Connection broke while writing the block.
    Write(io::Error),
    /// Flush to the network stack failed.
    Flush(io::Error),
}

impl TransportError {
    /// Underlying I/O error.
    pub fn io(&self) -> &io::Error {
        match self {
            Self::Connect(e) | Self::Write(e) | Self::Flush(e) => e,
        }
    }
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Connect(e) => write!(f, "connect failed: {}", e),
            Self::Write(e) => write!(f, "write failed: {}", e),
            Self::Flush(e) => write!(f, "flush failed: {}", e),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.io())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_message_names_size() {
        let e = LinkError::Allocation { requested: 80_000 };
        assert!(e.to_string().contains("80000"));
    }

    #[test]
    fn test_transport_error_exposes_io_kind() {
        let e = TransportError::Connect(io::Error::from(io::ErrorKind::ConnectionRefused));
        assert_eq!(e.io().kind(), io::ErrorKind::ConnectionRefused);
        assert!(e.to_string().starts_with("connect failed"));
    }
}
