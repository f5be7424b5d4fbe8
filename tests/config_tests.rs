//! Configuration and link construction tests

mod common;

use std::collections::HashMap;

use common::{test_config, FixedAdc, ScriptedButton, SimClock};
use rust_voice_link::config::{ConfigError, LinkConfig, Mode, ADC1_PINS, MAX_DATAGRAM_PAYLOAD};
use rust_voice_link::error::LinkError;
use rust_voice_link::link::Link;

fn build(config: &LinkConfig) -> Result<Link<'_, FixedAdc, ScriptedButton, SimClock>, LinkError> {
    Link::build(config, FixedAdc(2048), ScriptedButton::never(), SimClock::new(0))
}

#[test]
fn test_defaults_are_valid() {
    let config = LinkConfig::default();
    assert_eq!(config.validate(), Ok(()));
    assert_eq!(config.network.remote_port, 12345);
    assert_eq!(config.audio.sample_rate, 8000);
}

#[test]
fn test_validation_errors() {
    let mut config = test_config(0, 10);
    assert_eq!(config.validate(), Err(ConfigError::ZeroSampleRate));

    config.audio.sample_rate = 2_000_000;
    assert_eq!(config.validate(), Err(ConfigError::SampleRateTooHigh));

    config.audio.sample_rate = 8000;
    config.audio.max_record_seconds = 0;
    assert_eq!(config.validate(), Err(ConfigError::ZeroDuration));

    config.audio.max_record_seconds = 1;
    config.network.remote_host = "  ".to_string();
    assert_eq!(config.validate(), Err(ConfigError::MissingRemote));

    config.network.remote_host = "127.0.0.1".to_string();
    config.network.remote_port = 0;
    assert_eq!(config.validate(), Err(ConfigError::InvalidRemote));
}

#[test]
fn test_stream_chunk_limits() {
    let mut config = test_config(8000, 0);
    config.mode = Mode::Stream;
    // Recording window is irrelevant when streaming
    assert_eq!(config.validate(), Ok(()));

    config.audio.chunk_size = 0;
    assert_eq!(config.validate(), Err(ConfigError::ZeroChunk));

    config.audio.chunk_size = MAX_DATAGRAM_PAYLOAD;
    assert_eq!(config.validate(), Ok(()));

    config.audio.chunk_size = MAX_DATAGRAM_PAYLOAD + 1;
    assert_eq!(config.validate(), Err(ConfigError::ChunkTooLarge));
}

#[test]
fn test_env_overrides() {
    let env: HashMap<&str, &str> = [
        ("VOICE_LINK_SSID", "shack"),
        ("VOICE_LINK_HOST", "10.0.0.7"),
        ("VOICE_LINK_PORT", "4000"),
        ("VOICE_LINK_MODE", "udp"),
    ]
    .into_iter()
    .collect();

    let config = LinkConfig::default().with_env_overrides(|key| env.get(key).map(|v| v.to_string()));
    assert_eq!(config.network.ssid, "shack");
    assert_eq!(config.network.remote_host, "10.0.0.7");
    assert_eq!(config.network.remote_port, 4000);
    assert_eq!(config.mode, Mode::Stream);
}

#[test]
fn test_bad_env_values_ignored() {
    let config = LinkConfig::default().with_env_overrides(|key| match key {
        "VOICE_LINK_PORT" => Some("not-a-port".to_string()),
        "VOICE_LINK_MODE" => Some("semaphore".to_string()),
        _ => None,
    });
    assert_eq!(config, LinkConfig::default());
}

#[test]
fn test_remote_addr_resolves_literal() {
    let mut config = test_config(8000, 1);
    config.network.remote_port = 9000;
    let addr = config.remote_addr().unwrap();
    assert_eq!(addr.to_string(), "127.0.0.1:9000");
}

#[test]
fn test_build_selects_stream_loop() {
    let mut config = test_config(8000, 1);
    config.mode = Mode::Stream;
    config.network.local_port = 0;

    match build(&config) {
        Ok(link) => assert_eq!(link.mode(), Mode::Stream),
        Err(e) => panic!("build failed: {}", e),
    }
}

#[test]
fn test_build_selects_push_to_talk() {
    let config = test_config(8000, 2);
    match build(&config) {
        Ok(Link::PushToTalk(session)) => {
            assert_eq!(session.strategy().buffer().capacity(), 16_000);
        }
        Ok(_) => panic!("wrong mode"),
        Err(e) => panic!("build failed: {}", e),
    }
}

#[test]
fn test_build_rejects_invalid_config() {
    let config = test_config(0, 1);
    assert!(matches!(
        build(&config),
        Err(LinkError::Config(ConfigError::ZeroSampleRate))
    ));
}

#[test]
fn test_build_rejects_window_past_32_bit_range() {
    // 1 MHz for 4295 s wraps to 32 704 bytes in a 32-bit usize
    let config = test_config(1_000_000, 4_295);
    assert!(matches!(
        build(&config),
        Err(LinkError::Config(ConfigError::WindowTooLarge))
    ));

    let config = test_config(1_000_000, u32::MAX);
    assert!(matches!(
        build(&config),
        Err(LinkError::Config(ConfigError::WindowTooLarge))
    ));
}

#[test]
fn test_window_limit_ignored_when_streaming() {
    let mut config = test_config(1_000_000, u32::MAX);
    config.mode = Mode::Stream;
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_adc_pin_must_be_adc1_input() {
    let mut config = test_config(8000, 1);
    for pin in ADC1_PINS {
        config.audio.adc_pin = pin;
        assert_eq!(config.validate(), Ok(()));
    }
    for pin in [0, 23, 31, 40] {
        config.audio.adc_pin = pin;
        assert_eq!(config.validate(), Err(ConfigError::InvalidAdcPin));
    }
}
