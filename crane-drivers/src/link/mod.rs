//! Serial link drivers

pub mod hc06;

pub use hc06::Hc06;
