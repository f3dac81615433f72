//! Stepper motion
//!
//! Per-channel step timing, the synchronised three-channel scheduler and
//! the motor self-test used during verification.

pub mod channel;
pub mod self_test;
pub mod sync;

pub use channel::{StepDelay, StepperChannel, DISABLED_DELAY_MS};
pub use self_test::{SelfTestRun, SELF_TEST_RUNS};
pub use sync::{cycle_length, CycleReport, SyncScheduler};
