//! Node status
//!
//! The status snapshot shared between bus handling, the role logic and the
//! display collaborator, and the status LED policy derived from it.

pub mod indicator;
pub mod status;

pub use indicator::{indicator_colour, CONNECT_FRAMES};
pub use status::{ControlLaw, MotionIndicator, Status, StatusSnapshot, MAX_STATUS_TEXT_LEN};
