//! Host implementations of the HAL traits.
//!
//! Used by the workstation build of the `voicelink` binary: a synthetic
//! tone stands in for the microphone and the button presses itself on a
//! fixed schedule.

use std::thread;
use std::time::{Duration, Instant};

use super::{AnalogInput, Clock, DigitalInput, Level, ADC_MAX};

/// `Instant` based clock.
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    fn elapsed_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    #[inline]
    fn now_us(&mut self) -> u64 {
        self.elapsed_us()
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(us as u64));
    }
}

/// Sine tone around mid-scale, as a biased microphone amplifier would output.
pub struct ToneSource {
    phase: f32,
    step: f32,
    amplitude: f32,
}

impl ToneSource {
    /// `amplitude` is a fraction of half scale (clamped to 0..=1).
    pub fn new(freq_hz: f32, sample_rate: u32, amplitude: f32) -> Self {
        Self {
            phase: 0.0,
            step: core::f32::consts::TAU * freq_hz / sample_rate.max(1) as f32,
            amplitude: amplitude.clamp(0.0, 1.0),
        }
    }
}

impl AnalogInput for ToneSource {
    fn read_raw(&mut self) -> u16 {
        let mid = ADC_MAX as f32 / 2.0;
        let value = mid + mid * self.amplitude * self.phase.sin();
        self.phase = (self.phase + self.step) % core::f32::consts::TAU;
        (value.round() as u16).min(ADC_MAX)
    }
}

/// Button held for `hold` out of every `period`, reading LOW while held.
pub struct TimedButton {
    origin: Instant,
    period: Duration,
    hold: Duration,
}

impl TimedButton {
    pub fn new(period: Duration, hold: Duration) -> Self {
        Self {
            origin: Instant::now(),
            period: period.max(Duration::from_millis(1)),
            hold,
        }
    }
}

impl DigitalInput for TimedButton {
    fn level(&mut self) -> Level {
        let period = self.period.as_micros();
        let offset = self.origin.elapsed().as_micros() % period;
        if offset < self.hold.as_micros() {
            Level::Low
        } else {
            Level::High
        }
    }
}
