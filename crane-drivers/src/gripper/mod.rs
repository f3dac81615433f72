//! Gripper drivers

pub mod servo;

pub use servo::ServoGripper;
