//! ESP-IDF implementations of the HAL traits.
//!
//! ADC1 oneshot on GPIO32-39, PTT on any GPIO with pull-up,
//! `esp_timer` as the monotonic clock.

use esp_idf_svc::hal::adc::attenuation::DB_12;
use esp_idf_svc::hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_svc::hal::adc::{ADCPin, ADC1};
use esp_idf_svc::hal::delay::{Ets, FreeRtos};
use esp_idf_svc::hal::gpio::{AnyIOPin, Input, PinDriver, Pins, Pull};
use esp_idf_svc::sys::{EspError, ESP_ERR_INVALID_ARG};

use super::{AnalogInput, Clock, DigitalInput, Level, ADC_MAX};

/// Microphone ADC channel.
pub struct EspAdc<'d, P: ADCPin<Adc = ADC1>> {
    channel: AdcChannelDriver<'d, P, AdcDriver<'d, ADC1>>,
    last: u16,
}

impl<'d, P: ADCPin<Adc = ADC1>> EspAdc<'d, P> {
    /// Configure the channel with 12 dB attenuation (full 0-3.3 V range).
    pub fn new(adc: ADC1, pin: P) -> Result<Self, EspError> {
        let driver = AdcDriver::new(adc)?;
        let config = AdcChannelConfig {
            attenuation: DB_12,
            ..Default::default()
        };
        let channel = AdcChannelDriver::new(driver, pin, &config)?;
        Ok(Self { channel, last: 0 })
    }
}

impl<P: ADCPin<Adc = ADC1>> AnalogInput for EspAdc<'_, P> {
    #[inline]
    fn read_raw(&mut self) -> u16 {
        // A failed conversion repeats the previous sample to keep cadence
        if let Ok(raw) = self.channel.read() {
            self.last = raw.min(ADC_MAX);
        }
        self.last
    }
}

/// Open the ADC1 channel wired to GPIO `pin` (32-39).
pub fn open_adc(adc: ADC1, pins: Pins, pin: i32) -> Result<Box<dyn AnalogInput>, EspError> {
    Ok(match pin {
        32 => Box::new(EspAdc::new(adc, pins.gpio32)?),
        33 => Box::new(EspAdc::new(adc, pins.gpio33)?),
        34 => Box::new(EspAdc::new(adc, pins.gpio34)?),
        35 => Box::new(EspAdc::new(adc, pins.gpio35)?),
        36 => Box::new(EspAdc::new(adc, pins.gpio36)?),
        37 => Box::new(EspAdc::new(adc, pins.gpio37)?),
        38 => Box::new(EspAdc::new(adc, pins.gpio38)?),
        39 => Box::new(EspAdc::new(adc, pins.gpio39)?),
        _ => return Err(EspError::from_infallible::<ESP_ERR_INVALID_ARG>()),
    })
}

/// Push-to-talk GPIO with internal pull-up.
pub struct EspButton<'d> {
    pin: PinDriver<'d, AnyIOPin, Input>,
}

impl EspButton<'_> {
    /// Take a GPIO by number.
    ///
    /// # Safety
    ///
    /// The caller must not use `pin` through any other driver.
    pub unsafe fn from_pin_number(pin: i32) -> Result<Self, EspError> {
        let mut pin = PinDriver::input(AnyIOPin::new(pin))?;
        pin.set_pull(Pull::Up)?;
        Ok(Self { pin })
    }
}

impl DigitalInput for EspButton<'_> {
    #[inline]
    fn level(&mut self) -> Level {
        if self.pin.is_low() {
            Level::Low
        } else {
            Level::High
        }
    }
}

/// `esp_timer` clock. `delay_us` spins in ROM, `delay_ms` yields to FreeRTOS.
#[derive(Default)]
pub struct EspClock;

impl Clock for EspClock {
    #[inline]
    fn now_us(&mut self) -> u64 {
        // SAFETY: esp_timer_get_time is always safe to call after boot
        unsafe { esp_idf_svc::sys::esp_timer_get_time() as u64 }
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        Ets::delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}
