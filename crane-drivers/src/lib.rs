//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in crane-core for the crane's hardware:
//!
//! - Stepper drivers (GPIO step/dir/enable bank)
//! - Bluetooth serial module (HC-06)
//! - Character display (HD44780 16x2)
//! - Tri-colour status LED
//! - Servo gripper

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod gripper;
pub mod indicator;
pub mod link;
pub mod stepper;
