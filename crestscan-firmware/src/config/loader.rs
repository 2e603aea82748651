//! Embedded configuration loader
//!
//! Nothing is stored in flash: every boot parses the embedded file and
//! falls back to built-in defaults if it does not parse.

use defmt::*;

use crestscan_core::config::{parse_config, ScannerConfig};

/// Embedded configuration (compiled into firmware)
/// Edit scanner.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../scanner.toml");

/// Parse the embedded configuration
pub fn load_config() -> ScannerConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration");
            log_config_summary(&config);
            config
        }
        Err(e) => {
            // build.rs validates the file, so this only happens when the
            // build-time schema and the parser disagree
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using built-in defaults");
            ScannerConfig::new()
        }
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &ScannerConfig) {
    debug!(
        "  scan: default {}°, retreat {}°, {}°/mm",
        config.scan.default_range_deg, config.scan.retreat_deg, config.scan.degrees_per_mm
    );
    debug!(
        "  probe: jump {}°, no-gain limit {}",
        config.scan.probe_initial_jump_deg, config.scan.probe_no_gain_limit
    );
    debug!(
        "  stepper: pulse {}/{} us, enable active-low={}",
        config.stepper.pulse_high_us, config.stepper.pulse_low_us, config.stepper.enable_active_low
    );
    debug!(
        "  limits: active-low={}, pull-up={}",
        config.limits.active_low, config.limits.pull_up
    );
    if config.simulation.enabled {
        info!(
            "  simulation enabled (seed {}, {:?})",
            config.simulation.seed, config.simulation.sample_mode
        );
    }
}
