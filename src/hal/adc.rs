//! Analog input for the microphone front-end.

/// Full-scale value of a 12-bit conversion.
pub const ADC_MAX: u16 = 4095;

/// One-shot analog reading.
///
/// Implementations return promptly and never fail from the caller's point
/// of view; a driver error is the implementation's problem.
pub trait AnalogInput {
    /// Raw conversion result in `0..=ADC_MAX`.
    fn read_raw(&mut self) -> u16;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    #[inline]
    fn read_raw(&mut self) -> u16 {
        (**self).read_raw()
    }
}

impl<T: AnalogInput + ?Sized> AnalogInput for Box<T> {
    #[inline]
    fn read_raw(&mut self) -> u16 {
        (**self).read_raw()
    }
}
