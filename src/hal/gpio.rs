//! GPIO HAL for the push-to-talk button.

/// Logic level read from an input pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Raw digital input.
pub trait DigitalInput {
    fn level(&mut self) -> Level;
}

impl<T: DigitalInput + ?Sized> DigitalInput for &mut T {
    #[inline]
    fn level(&mut self) -> Level {
        (**self).level()
    }
}

/// Push-to-talk pin configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonConfig {
    pub pin: i32,
    /// Pressed reads LOW (button to ground, internal pull-up).
    pub active_low: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            pin: 23,
            active_low: true,
        }
    }
}

/// Debounce-free button state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Push-to-talk input with polarity applied.
///
/// Every call samples the pin once. There is no debouncing: a bouncing
/// contact during RECORDING ends the capture at the first released read.
pub struct PttInput<P> {
    pin: P,
    active_low: bool,
}

impl<P: DigitalInput> PttInput<P> {
    pub fn new(pin: P, config: &ButtonConfig) -> Self {
        Self {
            pin,
            active_low: config.active_low,
        }
    }

    /// Poll the pin once.
    #[inline]
    pub fn read(&mut self) -> ButtonState {
        let low = self.pin.level() == Level::Low;
        if low == self.active_low {
            ButtonState::Pressed
        } else {
            ButtonState::Released
        }
    }

    #[inline]
    pub fn is_pressed(&mut self) -> bool {
        self.read() == ButtonState::Pressed
    }
}
