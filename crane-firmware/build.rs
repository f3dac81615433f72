//! Build script for crane-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Checks that exactly one node role feature is enabled
//! - Validates crane.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sections and keys accepted by the firmware's config parser
const SCHEMA: &[(&str, &[&str])] = &[
    (
        "scheduler",
        &["pulse_constant", "epsilon", "disabled_stand_in_ms", "search_factors"],
    ),
    (
        "handshake",
        &["ack_window_ms", "report_hold_ms", "complete_early", "poll_interval_ms"],
    ),
    ("link", &["request", "signature", "baudrate", "response_timeout_ms"]),
    ("gripper", &["sweep", "step_ms"]),
    ("motion", &["self_test", "run_ms", "pause_ms", "settle_ms"]),
    (
        "display",
        &[
            "starting_ms",
            "progress_ticks",
            "tick_ms",
            "ack_tick",
            "settle_ms",
            "verdict_hold_ms",
            "led_step_ms",
            "low_voltage",
        ],
    ),
];

fn main() {
    setup_linker();
    check_role();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Exactly one of the role features selects what this image runs
fn check_role() {
    let roles: Vec<&str> = ["coordinator", "motion", "display"]
        .into_iter()
        .filter(|role| env::var(format!("CARGO_FEATURE_{}", role.to_uppercase())).is_ok())
        .collect();

    if roles.len() != 1 {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: select exactly one node role                             ║\n\
            ║                                                                  ║\n\
            ║  cargo build -p crane-firmware --features coordinator            ║\n\
            ║  cargo build -p crane-firmware --features motion                 ║\n\
            ║  cargo build -p crane-firmware --features display                ║\n\
            ║                                                                  ║\n\
            ║  Enabled: {:<54} ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            if roles.is_empty() {
                "none".to_string()
            } else {
                roles.join(", ")
            }
        );
    }
}

/// Validate crane.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=crane.toml");

    let config_path = Path::new("crane.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: crane.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds crane.toml from the crane-firmware          ║\n\
            ║  directory. An empty file selects the built-in defaults.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read crane.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in crane.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let errors = validate_schema(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid settings in crane.toml                           ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=crane.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check sections, keys and value types against [`SCHEMA`]
fn validate_schema(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(root) = config.as_table() else {
        return errors;
    };

    for (section, body) in root {
        let Some((_, keys)) = SCHEMA.iter().find(|(name, _)| name == section) else {
            errors.push(format!("unknown section [{}]", section));
            continue;
        };
        let Some(table) = body.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };

        for (key, value) in table {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", section, key));
                continue;
            }
            if let Some(e) = check_value(section, key, value) {
                errors.push(e);
            }
        }
    }

    errors
}

/// Type and range checks mirroring the firmware parser
fn check_value(section: &str, key: &str, value: &toml::Value) -> Option<String> {
    use toml::Value;

    let ok = match (key, value) {
        ("request" | "signature", Value::String(s)) => s.len() <= 24,
        ("complete_early" | "self_test", Value::Boolean(_)) => true,
        ("pulse_constant", Value::Float(f)) => *f > 0.0,
        ("pulse_constant", Value::Integer(i)) => *i > 0,
        ("epsilon" | "low_voltage", Value::Float(f)) => *f >= 0.0,
        ("epsilon" | "low_voltage", Value::Integer(i)) => *i >= 0,
        ("sweep", Value::Array(angles)) => {
            angles.len() == 3
                && angles
                    .iter()
                    .all(|a| matches!(a.as_integer(), Some(0..=180)))
        }
        ("disabled_stand_in_ms" | "search_factors" | "baudrate" | "poll_interval_ms"
        | "progress_ticks", Value::Integer(i)) => *i > 0,
        (_, Value::Integer(i)) => *i >= 0,
        _ => false,
    };

    if ok {
        None
    } else {
        Some(format!("[{}] invalid value for '{}'", section, key))
    }
}
