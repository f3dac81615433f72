//! Simple TOML parser for node configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `crane.toml`. It does NOT support the full TOML grammar and needs no
//! allocator.
//!
//! Supported features:
//! - [section] headers
//! - Key = value pairs (string, integer, float, boolean)
//! - Flat integer arrays: sweep = [10, 160, 0]
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Inline tables
//! - Dotted keys or nested sections

use heapless::String;

use super::types::{CraneConfig, MAX_LINK_TEXT_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Malformed section header
    InvalidSection,
    /// Section name is not known
    UnknownSection,
    /// Key is not known in its section
    UnknownKey,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Invalid value type or out-of-range value
    InvalidValue,
    /// String value longer than the field allows
    TooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Scheduler,
    Handshake,
    Link,
    Gripper,
    Motion,
    Display,
}

/// Parse TOML text into a [`CraneConfig`]
///
/// Values not present in the text keep their defaults.
pub fn parse_config(input: &str) -> Result<CraneConfig, ParseError> {
    let mut config = CraneConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(&mut config, section, key, value)?;
    }

    Ok(config)
}

/// Parse a header line like "[handshake]"
fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let line = strip_comment(line);
    let name = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?
        .trim();

    match name {
        "scheduler" => Ok(Section::Scheduler),
        "handshake" => Ok(Section::Handshake),
        "link" => Ok(Section::Link),
        "gripper" => Ok(Section::Gripper),
        "motion" => Ok(Section::Motion),
        "display" => Ok(Section::Display),
        "" => Err(ParseError::InvalidSection),
        _ => Err(ParseError::UnknownSection),
    }
}

fn apply_value(
    config: &mut CraneConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match section {
        Section::Root => return Err(ParseError::UnknownKey),
        Section::Scheduler => {
            let c = &mut config.scheduler;
            match key {
                "pulse_constant" => c.pulse_constant = parse_positive_float(value)?,
                "epsilon" => c.epsilon = parse_float(value)?,
                "disabled_stand_in_ms" => c.disabled_stand_in_ms = parse_nonzero(value)?,
                "search_factors" => c.search_factors = parse_nonzero(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Handshake => {
            let c = &mut config.handshake;
            match key {
                "ack_window_ms" => c.ack_window_ms = parse_int(value)?,
                "report_hold_ms" => c.report_hold_ms = parse_int(value)?,
                "complete_early" => c.complete_early = parse_bool(value)?,
                "poll_interval_ms" => c.poll_interval_ms = parse_nonzero(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Link => {
            let c = &mut config.link;
            match key {
                "request" => c.request = parse_text(value)?,
                "signature" => c.signature = parse_text(value)?,
                "baudrate" => c.baudrate = parse_nonzero(value)?,
                "response_timeout_ms" => c.response_timeout_ms = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Gripper => {
            let c = &mut config.gripper;
            match key {
                "sweep" => c.sweep = parse_sweep(value)?,
                "step_ms" => c.step_ms = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Motion => {
            let c = &mut config.motion;
            match key {
                "self_test" => c.self_test = parse_bool(value)?,
                "run_ms" => c.run_ms = parse_int(value)?,
                "pause_ms" => c.pause_ms = parse_int(value)?,
                "settle_ms" => c.settle_ms = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Display => {
            let c = &mut config.display;
            match key {
                "starting_ms" => c.starting_ms = parse_int(value)?,
                "progress_ticks" => c.progress_ticks = parse_nonzero(value)?,
                "tick_ms" => c.tick_ms = parse_int(value)?,
                "ack_tick" => c.ack_tick = parse_int(value)?,
                "settle_ms" => c.settle_ms = parse_int(value)?,
                "verdict_hold_ms" => c.verdict_hold_ms = parse_int(value)?,
                "led_step_ms" => c.led_step_ms = parse_int(value)?,
                "low_voltage" => c.low_voltage = parse_float(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
    }
    Ok(())
}

/// Split `key = value`, dropping any trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Remove a `#` comment that is not inside a string
fn strip_comment(value: &str) -> &str {
    let mut in_string = false;
    for (i, c) in value.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return value[..i].trim(),
            _ => {}
        }
    }
    value.trim()
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

fn parse_text(value: &str) -> Result<String<MAX_LINK_TEXT_LEN>, ParseError> {
    let value = parse_string(value)?;
    let mut out = String::new();
    out.push_str(value).map_err(|_| ParseError::TooLong)?;
    Ok(out)
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse an integer value that must not be zero
fn parse_nonzero<T>(value: &str) -> Result<T, ParseError>
where
    T: core::str::FromStr + PartialEq + Default,
{
    let parsed: T = parse_int(value)?;
    if parsed == T::default() {
        return Err(ParseError::InvalidValue);
    }
    Ok(parsed)
}

/// Parse a finite, non-negative float (integers are accepted too)
fn parse_float(value: &str) -> Result<f32, ParseError> {
    let parsed: f32 = value.parse().map_err(|_| ParseError::InvalidValue)?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(ParseError::InvalidValue);
    }
    Ok(parsed)
}

fn parse_positive_float(value: &str) -> Result<f32, ParseError> {
    let parsed = parse_float(value)?;
    if parsed == 0.0 {
        return Err(ParseError::InvalidValue);
    }
    Ok(parsed)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a three-element angle array like "[10, 160, 0]"
fn parse_sweep(value: &str) -> Result<[u8; 3], ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut angles = [0u8; 3];
    let mut count = 0;
    for item in inner.split(',') {
        let item = item.trim();
        if item.is_empty() {
            // Trailing comma
            continue;
        }
        let slot = angles.get_mut(count).ok_or(ParseError::InvalidValue)?;
        let angle: u8 = parse_int(item)?;
        if angle > 180 {
            return Err(ParseError::InvalidValue);
        }
        *slot = angle;
        count += 1;
    }

    if count != angles.len() {
        return Err(ParseError::InvalidValue);
    }
    Ok(angles)
}
