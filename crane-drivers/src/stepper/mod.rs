//! Stepper driver implementations

pub mod gpio;

pub use gpio::{GpioStepperBank, StepperPins, STEP_PULSE_US};
