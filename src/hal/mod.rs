//! Hardware Abstraction Layer for RustVoiceLink.
//!
//! Thin traits over the three primitives the capture pipeline needs:
//! an analog reading, a digital input and a monotonic clock.
//! Business logic stays in core modules, HAL is just I/O.

pub mod adc;
pub mod clock;
pub mod gpio;

#[cfg(target_os = "espidf")]
pub mod esp;

#[cfg(not(target_os = "espidf"))]
pub mod host;

pub use adc::{AnalogInput, ADC_MAX};
pub use clock::Clock;
pub use gpio::{ButtonConfig, ButtonState, DigitalInput, Level, PttInput};
