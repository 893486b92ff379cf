//! Monotonic millisecond clock

/// Source of monotonic time in milliseconds
///
/// The counter is free-running and wraps at `u32::MAX` (about 49 days).
/// Consumers compare timestamps with `wrapping_sub`.
pub trait Clock {
    /// Current time in milliseconds
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
