//! # RustVoiceLink
//!
//! Push-to-talk microphone capture for ESP32, sent to a listener over Wi-Fi.
//!
//! ## Architecture
//!
//! ```text
//! AnalogInput ─▶ Sampler ─▶ CaptureStrategy ─▶ Transport ─▶ network
//!                   ▲            (buffer)
//!          Pacer / fixed delay
//!                   ▲
//!      PttSession (IDLE/RECORDING/SENDING) or StreamLoop
//! ```
//!
//! - Push-to-talk mode: record while the button is held, one TCP block on release
//! - Stream mode: 128 byte UDP datagrams, continuously, no button
//!
//! Hardware is reached only through the [`hal`] traits, so every loop runs
//! on host against simulated inputs.

pub mod buffer;
pub mod config;
pub mod error;
pub mod fault;
pub mod hal;
pub mod link;
pub mod pacer;
pub mod sample;
pub mod session;
pub mod strategy;
pub mod transport;

#[cfg(target_os = "espidf")]
pub mod net;

pub use config::{LinkConfig, Mode};
pub use error::{LinkError, TransportError};
pub use fault::{FaultCode, FaultState};
pub use link::Link;
pub use pacer::Pacer;
pub use sample::{rescale, Sample, Sampler};
pub use session::{CaptureEnd, PttSession, SessionState, StreamLoop};
pub use strategy::{BlockStrategy, CaptureStrategy, SendOutcome, StreamStrategy};
