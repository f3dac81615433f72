//! Pulse-width output abstraction

/// Output that produces a repeating pulse of configurable width
///
/// Hobby servos expect a ~50 Hz frame with a 0.5-2.5 ms high pulse.
pub trait PwmPin {
    /// Set the high time of each frame, in microseconds
    fn set_pulse_width_us(&mut self, width_us: u16);
}
