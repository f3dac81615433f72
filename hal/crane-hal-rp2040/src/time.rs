//! Clock and delays on embassy-time

use embassy_time::{block_for, Duration, Instant};

/// Monotonic clock and busy-wait delays
///
/// Delays spin on the time driver; they block the executor, which is what
/// the node loop wants while it is stepping motors.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTimer;

impl crane_hal::Clock for EmbassyTimer {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

impl crane_hal::Delay for EmbassyTimer {
    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(ms as u64));
    }

    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(us as u64));
    }
}
