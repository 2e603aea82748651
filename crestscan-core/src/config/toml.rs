//! Minimal TOML parser for `scanner.toml`
//!
//! Handles only the subset the scanner configuration uses, without
//! allocating:
//!
//! - `[section]` headers
//! - `key = value` with integer, float, boolean and quoted string values
//! - Comments (`# ...`), whole-line or trailing
//!
//! Unknown sections and keys are rejected so typos do not silently fall
//! back to defaults. Missing keys keep their default value.

use super::hardware::{LimitHwConfig, SensorHwConfig, StepperHwConfig};
use super::types::{ScanConfig, ScannerConfig, SimulationConfig};
use crate::sim::SampleMode;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Malformed section header
    InvalidSection,
    /// Section name not recognized
    UnknownSection,
    /// Key not recognized in its section
    UnknownKey,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Value has the wrong type or does not parse
    InvalidValue,
    /// Value parses but is not usable
    OutOfRange,
    /// `version` is not the supported config version
    UnsupportedVersion,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Scan,
    Stepper,
    Limits,
    Sensor,
    Simulation,
}

/// Parse TOML configuration into [`ScannerConfig`]
///
/// The result is validated before it is returned.
pub fn parse_config(input: &str) -> Result<ScannerConfig, ParseError> {
    let mut config = ScannerConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "" => Err(ParseError::InvalidSection),
        "scan" => Ok(Section::Scan),
        "stepper" => Ok(Section::Stepper),
        "limits" => Ok(Section::Limits),
        "sensor" => Ok(Section::Sensor),
        "simulation" => Ok(Section::Simulation),
        _ => Err(ParseError::UnknownSection),
    }
}

/// Drop a trailing comment, ignoring `#` inside a quoted string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Split "key = value"
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a float; integers are accepted too
fn parse_float(value: &str) -> Result<f32, ParseError> {
    let parsed: f32 = value.parse().map_err(|_| ParseError::InvalidValue)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

fn parse_sample_mode(value: &str) -> Result<SampleMode, ParseError> {
    match parse_string(value)? {
        "rms" => Ok(SampleMode::Rms),
        "instantaneous" => Ok(SampleMode::Instantaneous),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut ScannerConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => match key {
            "version" => config.version = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Scan => apply_scan(&mut config.scan, key, value)?,
        Section::Stepper => apply_stepper(&mut config.stepper, key, value)?,
        Section::Limits => apply_limits(&mut config.limits, key, value)?,
        Section::Sensor => apply_sensor(&mut config.sensor, key, value)?,
        Section::Simulation => apply_simulation(&mut config.simulation, key, value)?,
    }
    Ok(())
}

fn apply_scan(scan: &mut ScanConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "default_range_deg" => scan.default_range_deg = parse_float(value)?,
        "retreat_deg" => scan.retreat_deg = parse_float(value)?,
        "degrees_per_mm" => scan.degrees_per_mm = parse_float(value)?,
        "report_min_voltage" => scan.report_min_voltage = parse_float(value)?,
        "report_min_delta" => scan.report_min_delta = parse_float(value)?,
        "bracket_ratio" => scan.bracket_ratio = parse_float(value)?,
        "probe_initial_jump_deg" => scan.probe_initial_jump_deg = parse_float(value)?,
        "probe_gain_epsilon" => scan.probe_gain_epsilon = parse_float(value)?,
        "probe_no_gain_limit" => scan.probe_no_gain_limit = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_stepper(stepper: &mut StepperHwConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "dir_setup_us" => stepper.dir_setup_us = parse_int(value)?,
        "pulse_high_us" => stepper.pulse_high_us = parse_int(value)?,
        "pulse_low_us" => stepper.pulse_low_us = parse_int(value)?,
        "enable_active_low" => stepper.enable_active_low = parse_bool(value)?,
        "invert_direction" => stepper.invert_direction = parse_bool(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_limits(limits: &mut LimitHwConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "active_low" => limits.active_low = parse_bool(value)?,
        "pull_up" => limits.pull_up = parse_bool(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_sensor(sensor: &mut SensorHwConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "vref_mv" => sensor.vref_mv = parse_int(value)?,
        "full_scale" => sensor.full_scale = parse_int(value)?,
        "divider_milli" => sensor.divider_milli = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_simulation(
    simulation: &mut SimulationConfig,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match key {
        "enabled" => simulation.enabled = parse_bool(value)?,
        "seed" => simulation.seed = parse_int(value)?,
        "sample_mode" => simulation.sample_mode = parse_sample_mode(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}
