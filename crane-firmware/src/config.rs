//! Configuration loading
//!
//! `crane.toml` is compiled into the image and parsed at boot. A file the
//! parser rejects falls back to the built-in defaults.

use defmt::*;

use crane_core::config::{parse_config, CraneConfig};

/// Embedded configuration (compiled into firmware)
/// Edit crane.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../crane.toml");

pub fn load() -> CraneConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config loaded: ack window {} ms, self-test {}",
                config.handshake.ack_window_ms, config.motion.self_test
            );
            config
        }
        Err(e) => {
            warn!("crane.toml rejected ({}), using defaults", e);
            CraneConfig::default()
        }
    }
}
