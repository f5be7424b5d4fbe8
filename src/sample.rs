//! Module: sample
//!
//! Purpose: 8-bit audio samples and the sampler that produces them.
//!
//! Architecture:
//! - One raw 12-bit reading per tick, rescaled linearly onto 0..=255
//! - Truncating integer mapping, same as the Arduino `map()` the
//!   listener was tuned against
//!
//! Safety: Safe. No unsafe blocks.

use crate::hal::{AnalogInput, ADC_MAX};

/// One quantized amplitude, unsigned 8 bit (mid-scale 128 = silence).
pub type Sample = u8;

/// Map a raw reading onto 0..=255.
///
/// `out = raw * 255 / 4095`, truncated. Inputs above 4095 saturate.
#[inline]
pub const fn rescale(raw: u16) -> Sample {
    let raw = if raw > ADC_MAX { ADC_MAX } else { raw };
    ((raw as u32 * Sample::MAX as u32) / ADC_MAX as u32) as Sample
}

/// Reads and rescales one sample per call.
pub struct Sampler<A> {
    source: A,
}

impl<A: AnalogInput> Sampler<A> {
    pub fn new(source: A) -> Self {
        Self { source }
    }

    /// Take one sample now.
    #[inline]
    pub fn sample(&mut self) -> Sample {
        rescale(self.source.read_raw())
    }

    pub fn source(&self) -> &A {
        &self.source
    }
}
