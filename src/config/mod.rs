//! Module: config
//!
//! Purpose: Configuration for RustVoiceLink.
//!
//! Architecture:
//! - `LinkConfig` is built once at startup and never mutated afterwards
//! - Components receive `&LinkConfig` (no process-wide globals)
//! - Defaults match the reference hardware (8 kHz, ADC on GPIO35, PTT on GPIO23)
//! - Compile-time overrides via `VOICE_LINK_*` environment variables
//! - Runtime overrides from NVS on ESP-IDF (see [`nvs`])

use std::net::{SocketAddr, ToSocketAddrs};

use crate::hal::gpio::ButtonConfig;

// NVS persistence for link overrides
pub mod nvs;

/// Default sample rate (Hz).
pub const DEFAULT_SAMPLE_RATE: u32 = 8000;

/// Default maximum push-to-talk recording length (seconds).
pub const DEFAULT_MAX_RECORD_SECONDS: u32 = 10;

/// Default stream chunk size (bytes = samples).
pub const DEFAULT_CHUNK_SIZE: usize = 128;

/// Default remote port, shared by TCP and UDP.
pub const DEFAULT_REMOTE_PORT: u16 = 12345;

/// Largest chunk that fits one UDP datagram on a 1500 byte MTU.
pub const MAX_DATAGRAM_PAYLOAD: usize = 1472;

/// Highest accepted sample rate (period must stay >= 1 µs).
pub const MAX_SAMPLE_RATE: u32 = 1_000_000;

/// Largest push-to-talk buffer, in bytes. Fits a 32-bit `usize`.
pub const MAX_RECORD_BYTES: u64 = u32::MAX as u64;

/// GPIOs routed to ADC1 on the ESP32 (channels 4-7 then 0-3).
pub const ADC1_PINS: core::ops::RangeInclusive<i32> = 32..=39;

/// Operating mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Record while the button is held, send one TCP block on release.
    #[default]
    PushToTalk,
    /// Sample continuously, send one UDP datagram per filled chunk.
    Stream,
}

impl Mode {
    /// Parse a mode name (`ptt`, `push-to-talk`, `block`, `stream`, `udp`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ptt" | "push-to-talk" | "block" | "tcp" => Some(Self::PushToTalk),
            "stream" | "udp" => Some(Self::Stream),
            _ => None,
        }
    }

    /// Short name, inverse of [`Mode::parse`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PushToTalk => "ptt",
            Self::Stream => "stream",
        }
    }

    /// Convert from the NVS byte encoding.
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Stream,
            _ => Self::PushToTalk,
        }
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network endpoint and credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub ssid: String,
    pub password: String,
    /// Listener address (IP or host name).
    pub remote_host: String,
    pub remote_port: u16,
    /// Local UDP port bound in stream mode.
    pub local_port: u16,
    /// Upper bound for the TCP connect in push-to-talk mode.
    pub connect_timeout_ms: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            remote_host: "192.168.1.100".to_string(),
            remote_port: DEFAULT_REMOTE_PORT,
            local_port: DEFAULT_REMOTE_PORT,
            connect_timeout_ms: 3000,
        }
    }
}

/// Sampling parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioConfig {
    pub sample_rate: u32,
    /// GPIO of the ADC1 channel fed by the microphone front-end, one of
    /// [`ADC1_PINS`].
    pub adc_pin: i32,
    pub max_record_seconds: u32,
    pub chunk_size: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            adc_pin: 35,
            max_record_seconds: DEFAULT_MAX_RECORD_SECONDS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Fixed waits around a block send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    /// Wait after flush before closing the connection.
    pub flush_wait_ms: u32,
    /// Pause after SENDING before polling the button again.
    pub settle_ms: u32,
    /// Sleep between button polls while IDLE.
    pub idle_poll_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            flush_wait_ms: 200,
            settle_ms: 500,
            idle_poll_ms: 10,
        }
    }
}

/// Complete link configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkConfig {
    pub mode: Mode,
    pub network: NetworkConfig,
    pub audio: AudioConfig,
    pub button: ButtonConfig,
    pub timing: TimingConfig,
}

impl LinkConfig {
    /// Defaults with compile-time `VOICE_LINK_*` overrides applied.
    pub fn from_build_env() -> Self {
        Self::default().with_env_overrides(|key| {
            let value = match key {
                "VOICE_LINK_SSID" => option_env!("VOICE_LINK_SSID"),
                "VOICE_LINK_PASSWORD" => option_env!("VOICE_LINK_PASSWORD"),
                "VOICE_LINK_HOST" => option_env!("VOICE_LINK_HOST"),
                "VOICE_LINK_PORT" => option_env!("VOICE_LINK_PORT"),
                "VOICE_LINK_MODE" => option_env!("VOICE_LINK_MODE"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    /// Apply `VOICE_LINK_*` values found by `lookup`.
    ///
    /// Unparseable ports and modes are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ssid) = lookup("VOICE_LINK_SSID") {
            self.network.ssid = ssid;
        }
        if let Some(password) = lookup("VOICE_LINK_PASSWORD") {
            self.network.password = password;
        }
        if let Some(host) = lookup("VOICE_LINK_HOST") {
            self.network.remote_host = host;
        }
        if let Some(port) = lookup("VOICE_LINK_PORT").and_then(|p| p.trim().parse().ok()) {
            self.network.remote_port = port;
        }
        if let Some(mode) = lookup("VOICE_LINK_MODE").as_deref().and_then(Mode::parse) {
            self.mode = mode;
        }
        self
    }

    /// Time between two samples in microseconds (125 µs at 8 kHz).
    #[inline]
    pub fn sample_period_us(&self) -> u64 {
        1_000_000 / self.audio.sample_rate as u64
    }

    /// Push-to-talk buffer size: one byte per sample for the whole window.
    ///
    /// Computed in `u64` so a long window cannot wrap on a 32-bit target.
    pub fn record_capacity(&self) -> Result<usize, ConfigError> {
        let bytes = self.audio.sample_rate as u64 * self.audio.max_record_seconds as u64;
        if bytes > MAX_RECORD_BYTES {
            return Err(ConfigError::WindowTooLarge);
        }
        usize::try_from(bytes).map_err(|_| ConfigError::WindowTooLarge)
    }

    /// Resolve the listener endpoint.
    pub fn remote_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.network.remote_host.trim();
        if host.is_empty() {
            return Err(ConfigError::MissingRemote);
        }
        (host, self.network.remote_port)
            .to_socket_addrs()
            .map_err(|_| ConfigError::InvalidRemote)?
            .next()
            .ok_or(ConfigError::InvalidRemote)
    }

    /// Check every constraint the capture pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audio.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.audio.sample_rate > MAX_SAMPLE_RATE {
            return Err(ConfigError::SampleRateTooHigh);
        }
        match self.mode {
            Mode::PushToTalk => {
                if self.audio.max_record_seconds == 0 {
                    return Err(ConfigError::ZeroDuration);
                }
                self.record_capacity()?;
            }
            Mode::Stream => {
                if self.audio.chunk_size == 0 {
                    return Err(ConfigError::ZeroChunk);
                }
                if self.audio.chunk_size > MAX_DATAGRAM_PAYLOAD {
                    return Err(ConfigError::ChunkTooLarge);
                }
            }
        }
        if !ADC1_PINS.contains(&self.audio.adc_pin) {
            return Err(ConfigError::InvalidAdcPin);
        }
        if self.network.remote_host.trim().is_empty() {
            return Err(ConfigError::MissingRemote);
        }
        if self.network.remote_port == 0 {
            return Err(ConfigError::InvalidRemote);
        }
        Ok(())
    }
}

/// Configuration validation error with code and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// C01: Sample rate is zero
    ZeroSampleRate,
    /// C02: Sample period would be shorter than 1 µs
    SampleRateTooHigh,
    /// C03: Push-to-talk window is zero seconds
    ZeroDuration,
    /// C04: Stream chunk is empty
    ZeroChunk,
    /// C05: Stream chunk does not fit one datagram
    ChunkTooLarge,
    /// C06: No remote host configured
    MissingRemote,
    /// C07: Remote host/port cannot be used
    InvalidRemote,
    /// C08: Push-to-talk buffer would exceed 4 GiB
    WindowTooLarge,
    /// C09: Microphone pin is not an ADC1 input
    InvalidAdcPin,
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZeroSampleRate => "C01",
            Self::SampleRateTooHigh => "C02",
            Self::ZeroDuration => "C03",
            Self::ZeroChunk => "C04",
            Self::ChunkTooLarge => "C05",
            Self::MissingRemote => "C06",
            Self::InvalidRemote => "C07",
            Self::WindowTooLarge => "C08",
            Self::InvalidAdcPin => "C09",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::ZeroSampleRate => "sample rate must be non-zero",
            Self::SampleRateTooHigh => "sample rate above 1 MHz",
            Self::ZeroDuration => "recording window must be at least 1 s",
            Self::ZeroChunk => "chunk size must be non-zero",
            Self::ChunkTooLarge => "chunk larger than one datagram",
            Self::MissingRemote => "remote host not set",
            Self::InvalidRemote => "remote endpoint invalid",
            Self::WindowTooLarge => "recording window too large",
            Self::InvalidAdcPin => "ADC pin must be GPIO32-39",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_hardware_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.mode, Mode::PushToTalk);
        assert_eq!(config.sample_period_us(), 125);
        assert_eq!(config.record_capacity(), Ok(80_000));
        assert_eq!(config.audio.chunk_size, 128);
        assert_eq!(config.button.pin, 23);
        assert!(config.button.active_low);
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in [Mode::PushToTalk, Mode::Stream] {
            assert_eq!(Mode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(Mode::parse(" UDP "), Some(Mode::Stream));
        assert_eq!(Mode::parse("carrier-pigeon"), None);
    }

    #[test]
    fn test_capacity_checked_before_usize_conversion() {
        let mut config = LinkConfig::default();
        config.audio.sample_rate = MAX_SAMPLE_RATE;
        // 4 295 000 000 bytes: one past what a 32-bit usize can index
        config.audio.max_record_seconds = 4_295;
        assert_eq!(config.record_capacity(), Err(ConfigError::WindowTooLarge));
        assert_eq!(config.validate(), Err(ConfigError::WindowTooLarge));

        config.audio.max_record_seconds = 4_294;
        assert_eq!(config.record_capacity(), Ok(4_294_000_000));
    }

    #[test]
    fn test_error_display_has_code() {
        assert_eq!(
            ConfigError::ChunkTooLarge.to_string(),
            "C05: chunk larger than one datagram"
        );
    }
}
