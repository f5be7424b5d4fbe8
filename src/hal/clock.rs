//! Monotonic microsecond clock and delays.

/// Time source for the sample loop.
pub trait Clock {
    /// Monotonic time in microseconds since an arbitrary origin.
    fn now_us(&mut self) -> u64;

    /// Relative delay. May yield the processor.
    fn delay_us(&mut self, us: u32);

    /// Millisecond delay, used outside the sample loop.
    fn delay_ms(&mut self, ms: u32) {
        self.delay_us(ms.saturating_mul(1000));
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    #[inline]
    fn now_us(&mut self) -> u64 {
        (**self).now_us()
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }

    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}
