//! Deterministic stand-ins for the hardware and the network.

#![allow(dead_code)]

use std::io;

use rust_voice_link::config::{LinkConfig, TimingConfig};
use rust_voice_link::error::TransportError;
use rust_voice_link::hal::{AnalogInput, Clock, DigitalInput, Level, ADC_MAX};
use rust_voice_link::transport::{BlockTransport, DatagramTransport};

/// Config with a small buffer and no settle/idle waits.
pub fn test_config(sample_rate: u32, max_record_seconds: u32) -> LinkConfig {
    let mut config = LinkConfig::default();
    config.audio.sample_rate = sample_rate;
    config.audio.max_record_seconds = max_record_seconds;
    config.network.remote_host = "127.0.0.1".to_string();
    config.timing = TimingConfig {
        flush_wait_ms: 0,
        settle_ms: 0,
        idle_poll_ms: 0,
    };
    config
}

/// Smallest raw reading that rescales to `value`.
pub fn raw_for(value: u8) -> u16 {
    ((value as u32 * ADC_MAX as u32 + 254) / 255) as u16
}

/// Clock that advances by `read_cost` µs on every read.
pub struct SimClock {
    pub now: u64,
    pub read_cost: u64,
    pub slept_us: u64,
}

impl SimClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: start,
            read_cost: 1,
            slept_us: 0,
        }
    }

    pub fn with_read_cost(mut self, read_cost: u64) -> Self {
        self.read_cost = read_cost;
        self
    }
}

impl Clock for SimClock {
    fn now_us(&mut self) -> u64 {
        self.now += self.read_cost;
        self.now
    }

    fn delay_us(&mut self, us: u32) {
        self.now += us as u64;
        self.slept_us += us as u64;
    }
}

/// Always the same reading.
pub struct FixedAdc(pub u16);

impl AnalogInput for FixedAdc {
    fn read_raw(&mut self) -> u16 {
        self.0
    }
}

/// Readings that rescale to 0, 1, 2, ... (wrapping at 256).
#[derive(Default)]
pub struct SequenceAdc {
    pub reads: usize,
}

impl AnalogInput for SequenceAdc {
    fn read_raw(&mut self) -> u16 {
        let raw = raw_for((self.reads % 256) as u8);
        self.reads += 1;
        raw
    }
}

/// Active-low button following a run-length script of polls.
///
/// Reads released once the script is exhausted.
pub struct ScriptedButton {
    segments: Vec<(usize, bool)>,
    pub polls: usize,
}

impl ScriptedButton {
    pub fn script(segments: &[(usize, bool)]) -> Self {
        Self {
            segments: segments.to_vec(),
            polls: 0,
        }
    }

    /// Pressed for the first `pressed_polls` reads.
    pub fn held_for(pressed_polls: usize) -> Self {
        Self::script(&[(pressed_polls, true)])
    }

    pub fn never() -> Self {
        Self::script(&[])
    }

    pub fn forever() -> Self {
        Self::held_for(usize::MAX)
    }

    fn pressed_at(&self, poll: usize) -> bool {
        let mut start = 0usize;
        for &(len, pressed) in &self.segments {
            if poll < start.saturating_add(len) {
                return pressed;
            }
            start = start.saturating_add(len);
        }
        false
    }
}

impl DigitalInput for ScriptedButton {
    fn level(&mut self) -> Level {
        let pressed = self.pressed_at(self.polls);
        self.polls += 1;
        if pressed {
            Level::Low
        } else {
            Level::High
        }
    }
}

/// Block transport that keeps what it was given.
#[derive(Default)]
pub struct RecordingTransport {
    pub blocks: Vec<Vec<u8>>,
    pub attempts: usize,
    pub refuse: bool,
}

impl RecordingTransport {
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Default::default()
        }
    }
}

impl BlockTransport for RecordingTransport {
    fn send_block(&mut self, block: &[u8]) -> Result<(), TransportError> {
        self.attempts += 1;
        if self.refuse {
            return Err(TransportError::Connect(io::Error::from(
                io::ErrorKind::ConnectionRefused,
            )));
        }
        self.blocks.push(block.to_vec());
        Ok(())
    }
}

/// Datagram transport that keeps every chunk.
#[derive(Default)]
pub struct ChunkRecorder {
    pub chunks: Vec<Vec<u8>>,
}

impl DatagramTransport for ChunkRecorder {
    fn send_chunk(&mut self, chunk: &[u8]) {
        self.chunks.push(chunk.to_vec());
    }
}
