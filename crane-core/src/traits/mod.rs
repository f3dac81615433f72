//! Hardware abstraction traits
//!
//! These traits define the interface between the node logic and the
//! board-specific drivers in `crane-drivers`.

pub mod display;
pub mod gripper;
pub mod indicator;
pub mod link;
pub mod stepper;

pub use display::{DisplayError, StatusDisplay};
pub use gripper::GripperActuator;
pub use indicator::{Colour, StatusIndicator};
pub use link::{LinkError, SerialLink};
pub use stepper::{Direction, StepperOutputs};
