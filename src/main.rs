//! RustVoiceLink - Main entry point
//!
//! On ESP-IDF:
//! 1. Load configuration (build-time values, NVS overrides)
//! 2. Join Wi-Fi
//! 3. Bring up ADC, PTT button and clock
//! 4. Run the selected capture loop forever
//!
//! On a workstation the same loops run against a synthetic tone and a
//! button that presses itself, sending to a local listener.

use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    // No RTC on the board: wall-clock timestamps would all read 1970
    #[cfg(target_os = "espidf")]
    builder.without_time().init();
    #[cfg(not(target_os = "espidf"))]
    builder.init();
}

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use rust_voice_link::config::nvs;
    use rust_voice_link::hal::esp::{open_adc, EspButton, EspClock};
    use rust_voice_link::{net::wifi, Link, LinkConfig};
    use tracing::{error, info, warn};

    esp_idf_svc::sys::link_patches();
    init_tracing();
    info!("{}", env!("VERSION_STRING"));

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    let mut config = LinkConfig::from_build_env();
    match nvs::load_overrides(nvs_partition.clone(), &mut config) {
        Ok(result) => info!("NVS overrides: {:?}", result),
        Err(e) => warn!("NVS overrides not loaded ({}), using build configuration", e),
    }
    if let Err(e) = config.validate() {
        error!("startup failed: {}", e);
        return Err(e.into());
    }

    let _wifi = wifi::join(peripherals.modem, sysloop, Some(nvs_partition), &config.network)?;

    // Consumes the pin set, the PTT pin below is claimed by number
    let analog = open_adc(peripherals.adc1, peripherals.pins, config.audio.adc_pin)?;
    // SAFETY: the PTT pin is not claimed by any other driver
    let button = unsafe { EspButton::from_pin_number(config.button.pin)? };

    let link = match Link::build(&config, analog, button, EspClock) {
        Ok(link) => link,
        Err(e) => {
            error!("startup failed: {}", e);
            return Err(e.into());
        }
    };
    info!("mode: {}", link.mode());
    link.run_forever()
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use std::time::Duration;

    use anyhow::Context;
    use rust_voice_link::hal::host::{StdClock, TimedButton, ToneSource};
    use rust_voice_link::{Link, LinkConfig};
    use tracing::info;

    init_tracing();
    info!("{} (host simulation)", env!("VERSION_STRING"));

    let mut config = LinkConfig::from_build_env().with_env_overrides(|key| std::env::var(key).ok());
    if std::env::var("VOICE_LINK_HOST").is_err() && option_env!("VOICE_LINK_HOST").is_none() {
        config.network.remote_host = "127.0.0.1".to_string();
    }

    let analog = ToneSource::new(440.0, config.audio.sample_rate, 0.8);
    let button = TimedButton::new(Duration::from_secs(4), Duration::from_millis(1500));

    let link = Link::build(&config, analog, button, StdClock::new()).context("startup failed")?;
    info!("mode: {}", link.mode());
    link.run_forever()
}
