//! Status LED policy
//!
//! Conditions are checked in priority order; the first match wins.

use super::status::StatusSnapshot;
use crate::traits::Colour;

/// Number of frames in the connection animation
pub const CONNECT_FRAMES: u8 = 4;

/// Colour of the display node's status LED
///
/// 1. supply below `low_voltage` → amber
/// 2. bluetooth not connected → blue, blinking with the connection
///    animation (lit on frames 0 and 2)
/// 3. status text "Standby" or "Cooling" → white
/// 4. not verified → green
/// 5. otherwise off
pub fn indicator_colour(snapshot: &StatusSnapshot, frame: u8, low_voltage: f32) -> Colour {
    if snapshot.voltage < low_voltage {
        Colour::AMBER
    } else if !snapshot.link_connected {
        if frame % 2 == 0 {
            Colour::BLUE
        } else {
            Colour::OFF
        }
    } else if matches!(snapshot.text.as_str(), "Standby" | "Cooling") {
        Colour::WHITE
    } else if !snapshot.verified {
        Colour::GREEN
    } else {
        Colour::OFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Status;

    const LOW: f32 = 10.75;

    fn connected() -> Status {
        let mut status = Status::new();
        status.set_voltage(12.0);
        status.set_link_connected(true);
        status
    }

    #[test]
    fn test_low_voltage_wins() {
        let mut status = connected();
        status.set_voltage(10.5);
        status.set_text("Standby");
        assert_eq!(indicator_colour(status.snapshot(), 1, LOW), Colour::AMBER);
    }

    #[test]
    fn test_disconnected_blinks_blue() {
        let mut status = Status::new();
        status.set_voltage(12.0);
        assert_eq!(indicator_colour(status.snapshot(), 0, LOW), Colour::BLUE);
        assert_eq!(indicator_colour(status.snapshot(), 1, LOW), Colour::OFF);
        assert_eq!(indicator_colour(status.snapshot(), 2, LOW), Colour::BLUE);
        assert_eq!(indicator_colour(status.snapshot(), 3, LOW), Colour::OFF);
    }

    #[test]
    fn test_standby_is_white() {
        let mut status = connected();
        status.set_text("Cooling");
        assert_eq!(indicator_colour(status.snapshot(), 0, LOW), Colour::WHITE);
    }

    #[test]
    fn test_unverified_is_green_then_off() {
        let mut status = connected();
        assert_eq!(indicator_colour(status.snapshot(), 0, LOW), Colour::GREEN);
        status.set_verified(true);
        assert!(indicator_colour(status.snapshot(), 0, LOW).is_off());
    }
}
