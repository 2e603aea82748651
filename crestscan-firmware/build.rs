//! Build script for crestscan-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates scanner.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Expected value type of a key
#[derive(Clone, Copy)]
enum Kind {
    Float,
    Int { min: i64, max: i64 },
    Bool,
    Str(&'static [&'static str]),
}

/// Known sections and their keys
const SCHEMA: &[(&str, &[(&str, Kind)])] = &[
    (
        "scan",
        &[
            ("default_range_deg", Kind::Float),
            ("retreat_deg", Kind::Float),
            ("degrees_per_mm", Kind::Float),
            ("report_min_voltage", Kind::Float),
            ("report_min_delta", Kind::Float),
            ("bracket_ratio", Kind::Float),
            ("probe_initial_jump_deg", Kind::Float),
            ("probe_gain_epsilon", Kind::Float),
            ("probe_no_gain_limit", Kind::Int { min: 1, max: 255 }),
        ],
    ),
    (
        "stepper",
        &[
            ("dir_setup_us", Kind::Int { min: 0, max: 1_000_000 }),
            ("pulse_high_us", Kind::Int { min: 1, max: 1_000_000 }),
            ("pulse_low_us", Kind::Int { min: 1, max: 1_000_000 }),
            ("enable_active_low", Kind::Bool),
            ("invert_direction", Kind::Bool),
        ],
    ),
    (
        "limits",
        &[("active_low", Kind::Bool), ("pull_up", Kind::Bool)],
    ),
    (
        "sensor",
        &[
            ("vref_mv", Kind::Int { min: 1, max: 65535 }),
            ("full_scale", Kind::Int { min: 1, max: 65535 }),
            ("divider_milli", Kind::Int { min: 1, max: 65535 }),
        ],
    ),
    (
        "simulation",
        &[
            ("enabled", Kind::Bool),
            ("seed", Kind::Int { min: 0, max: i64::MAX }),
            ("sample_mode", Kind::Str(&["rms", "instantaneous"])),
        ],
    ),
];

/// Validate scanner.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=scanner.toml");

    let config_path = Path::new("scanner.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: scanner.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds scanner.toml at build time.                 ║\n\
            ║  Please create one in the crestscan-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read scanner.toml                              ║\n\
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
                ║  ERROR: Invalid TOML syntax in scanner.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_schema(&config, &mut errors);
    validate_scan_ranges(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid scanner configuration                            ║\n\
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

    println!("cargo:warning=scanner.toml validated successfully");
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

/// Reject unknown sections and keys, and values of the wrong type
///
/// The firmware's own parser is stricter than TOML: no arrays, no inline
/// tables, no nested sections.
fn validate_schema(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return;
    };

    for (name, value) in root {
        if name == "version" {
            if value.as_integer() != Some(1) {
                errors.push("version must be 1".to_string());
            }
            continue;
        }

        let Some((_, keys)) = SCHEMA.iter().find(|(section, _)| section == name) else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };
        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };

        for (key, value) in table {
            match keys.iter().find(|(k, _)| k == key) {
                Some((_, kind)) => check_value(name, key, value, *kind, errors),
                None => errors.push(format!("[{}] unknown key '{}'", name, key)),
            }
        }
    }
}

fn check_value(section: &str, key: &str, value: &toml::Value, kind: Kind, errors: &mut Vec<String>) {
    match (kind, value) {
        (Kind::Float, toml::Value::Float(f)) if f.is_finite() => {}
        (Kind::Float, toml::Value::Integer(_)) => {}
        (Kind::Float, _) => errors.push(format!("[{}] {} must be a number", section, key)),
        (Kind::Int { min, max }, toml::Value::Integer(i)) => {
            if *i < min || *i > max {
                errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            }
        }
        (Kind::Int { .. }, _) => errors.push(format!("[{}] {} must be an integer", section, key)),
        (Kind::Bool, toml::Value::Boolean(_)) => {}
        (Kind::Bool, _) => errors.push(format!("[{}] {} must be true or false", section, key)),
        (Kind::Str(allowed), toml::Value::String(s)) => {
            if !allowed.contains(&s.as_str()) {
                errors.push(format!(
                    "[{}] {} must be one of: {}",
                    section,
                    key,
                    allowed.join(", ")
                ));
            }
        }
        (Kind::Str(_), _) => errors.push(format!("[{}] {} must be a string", section, key)),
    }
}

/// Longest sweep or retreat the firmware accepts (degrees)
const MAX_TRAVEL_DEG: f64 = 1_000_000.0;

/// Range checks the scan search depends on
fn validate_scan_ranges(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(scan) = config.get("scan").and_then(|s| s.as_table()) else {
        return;
    };

    let number = |key: &str| {
        scan.get(key).and_then(|v| match v {
            toml::Value::Float(f) => Some(*f),
            toml::Value::Integer(i) => Some(*i as f64),
            _ => None,
        })
    };

    for key in [
        "default_range_deg",
        "retreat_deg",
        "degrees_per_mm",
        "probe_initial_jump_deg",
    ] {
        if let Some(v) = number(key) {
            if v <= 0.0 {
                errors.push(format!("[scan] {} must be positive", key));
            }
        }
    }

    for key in ["default_range_deg", "retreat_deg"] {
        if let Some(v) = number(key) {
            if v > MAX_TRAVEL_DEG {
                errors.push(format!("[scan] {} must not exceed {}", key, MAX_TRAVEL_DEG));
            }
        }
    }

    for key in ["report_min_voltage", "report_min_delta", "probe_gain_epsilon"] {
        if let Some(v) = number(key) {
            if v < 0.0 {
                errors.push(format!("[scan] {} must not be negative", key));
            }
        }
    }

    if let Some(ratio) = number("bracket_ratio") {
        if ratio <= 0.0 || ratio >= 1.0 {
            errors.push("[scan] bracket_ratio must be between 0 and 1".to_string());
        }
    }
}
