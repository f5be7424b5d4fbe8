//! Wi-Fi station join.
//!
//! Blocks until the network is up, retrying forever with progress logs.
//! The capture loops assume this has succeeded before they start.

use anyhow::{anyhow, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use tracing::{info, warn};

use crate::config::NetworkConfig;

/// Delay between join attempts.
const RETRY_DELAY_MS: u32 = 500;

/// Join the configured access point and wait for an IP address.
///
/// The returned driver must be kept alive for the link to stay up.
pub fn join(
    modem: Modem,
    sysloop: EspSystemEventLoop,
    nvs: Option<EspDefaultNvsPartition>,
    network: &NetworkConfig,
) -> Result<BlockingWifi<EspWifi<'static>>> {
    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), nvs)?, sysloop)?;

    let auth_method = if network.password.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: network
            .ssid
            .as_str()
            .try_into()
            .map_err(|_| anyhow!("SSID longer than 32 bytes"))?,
        password: network
            .password
            .as_str()
            .try_into()
            .map_err(|_| anyhow!("password longer than 64 bytes"))?,
        auth_method,
        ..Default::default()
    }))?;

    wifi.start()?;
    info!("connecting to Wi-Fi \"{}\"", network.ssid);

    let mut attempts = 0u32;
    while let Err(e) = wifi.connect() {
        attempts += 1;
        warn!("Wi-Fi join attempt {} failed: {}", attempts, e);
        FreeRtos::delay_ms(RETRY_DELAY_MS);
    }
    wifi.wait_netif_up()?;

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    info!("Wi-Fi connected, IP address {}", ip_info.ip);
    Ok(wifi)
}
