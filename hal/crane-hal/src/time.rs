//! Monotonic time and blocking delays
//!
//! Every wait in the crane firmware is either a blocking delay or a deadline
//! compared against [`Clock::now_ms`]. Timeouts are always expressed as
//! deadlines so a state machine can be polled by an external scheduler.

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed epoch (usually boot)
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since `since_ms`, saturating at zero
    fn elapsed_ms(&self, since_ms: u64) -> u64 {
        self.now_ms().saturating_sub(since_ms)
    }
}

/// Blocking delay provider
pub trait Delay {
    /// Busy-wait for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Busy-wait for `us` microseconds
    fn delay_us(&mut self, us: u32);
}

/// A clock that can also block
pub trait Timer: Clock + Delay {}

// Blanket implementation
impl<T: Clock + Delay> Timer for T {}
