//! Gripper actuator trait

/// Servo-driven gripper on the coordinator node
pub trait GripperActuator {
    /// Move to `degrees` (0..=180, larger values are clamped)
    fn set_angle(&mut self, degrees: u8);
}
