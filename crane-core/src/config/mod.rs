//! Node configuration
//!
//! Configuration types with commissioned defaults, and a heapless parser
//! for the TOML subset used by `crane.toml`.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
