//! Configuration type definitions
//!
//! Defaults reproduce the instrument's fixed constants, so an empty
//! `scanner.toml` yields the stock behavior.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::hardware::{LimitHwConfig, SensorHwConfig, StepperHwConfig};
use super::toml::ParseError;
use crate::motion::MAX_TRAVEL_DEG;
use crate::sim::SampleMode;

/// Range used by `scan` without an argument, or with 0
pub const DEFAULT_SCAN_DEG: f32 = 2000.0;

/// Default linear calibration (8 mm lead screw)
pub const DEFAULT_DEGREES_PER_MM: f32 = 45.0;

/// Crest search tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanConfig {
    /// Sweep range when none is given (degrees)
    pub default_range_deg: f32,
    /// Overshoot moved away from a tripped limit (degrees)
    pub retreat_deg: f32,
    /// Shaft rotation per millimetre of probe travel
    pub degrees_per_mm: f32,
    /// Sweep samples at or below this voltage are not reported
    pub report_min_voltage: f32,
    /// Sweep samples closer than this to the last report are not reported
    pub report_min_delta: f32,
    /// Bracket edge as a fraction of the crest voltage
    pub bracket_ratio: f32,
    /// First probe offset (degrees)
    pub probe_initial_jump_deg: f32,
    /// Minimum improvement for a probe to count as a gain (volts)
    pub probe_gain_epsilon: f32,
    /// Consecutive rounds without gain that end the probe
    pub probe_no_gain_limit: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            default_range_deg: DEFAULT_SCAN_DEG,
            retreat_deg: DEFAULT_SCAN_DEG,
            degrees_per_mm: DEFAULT_DEGREES_PER_MM,
            report_min_voltage: 0.5,
            report_min_delta: 0.001,
            bracket_ratio: 0.5,
            probe_initial_jump_deg: 10.0,
            probe_gain_epsilon: 0.001,
            probe_no_gain_limit: 3,
        }
    }
}

impl ScanConfig {
    /// Reject values the search cannot run with
    pub fn validate(&self) -> Result<(), ParseError> {
        let positive = [
            self.default_range_deg,
            self.retreat_deg,
            self.degrees_per_mm,
            self.probe_initial_jump_deg,
        ];
        if positive.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ParseError::OutOfRange);
        }
        if self.default_range_deg > MAX_TRAVEL_DEG || self.retreat_deg > MAX_TRAVEL_DEG {
            return Err(ParseError::OutOfRange);
        }

        let non_negative = [
            self.report_min_voltage,
            self.report_min_delta,
            self.probe_gain_epsilon,
        ];
        if non_negative.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ParseError::OutOfRange);
        }

        if !(self.bracket_ratio > 0.0 && self.bracket_ratio < 1.0) {
            return Err(ParseError::OutOfRange);
        }
        if self.probe_no_gain_limit == 0 {
            return Err(ParseError::OutOfRange);
        }
        Ok(())
    }
}

/// Simulated probe settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Read the synthetic waveform instead of the ADC
    pub enabled: bool,
    /// Seed of the first generated waveform
    pub seed: u64,
    /// Sampling mode
    pub sample_mode: SampleMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            seed: 1,
            sample_mode: SampleMode::Rms,
        }
    }
}

/// Complete scanner configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScannerConfig {
    /// Config version for compatibility
    pub version: u8,
    /// Crest search tuning
    pub scan: ScanConfig,
    /// Stepper pulse timing and polarity
    pub stepper: StepperHwConfig,
    /// Limit switch polarity
    pub limits: LimitHwConfig,
    /// ADC scaling
    pub sensor: SensorHwConfig,
    /// Simulated probe
    pub simulation: SimulationConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ScannerConfig {
    /// Current config version
    pub const VERSION: u8 = 1;

    /// Create a default configuration
    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            scan: ScanConfig::default(),
            stepper: StepperHwConfig::default(),
            limits: LimitHwConfig::default(),
            sensor: SensorHwConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.version != Self::VERSION {
            return Err(ParseError::UnsupportedVersion);
        }
        self.scan.validate()?;
        self.sensor.validate()
    }
}
