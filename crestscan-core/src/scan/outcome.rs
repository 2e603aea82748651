//! Scan results and errors

use crestscan_protocol::Side;
#[allow(unused_imports)]
use micromath::F32Ext;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::motion::MotionError;
use crate::state::Phase;

/// A candidate or best peak
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CrestEstimate {
    /// Signed angle in degrees
    pub degree: f32,
    /// Voltage sampled there
    pub voltage: f32,
}

/// Result of a completed fine search
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CrestReport {
    /// Best voltage found
    pub voltage: f32,
    /// Signed angle of the best voltage in degrees
    pub degree: f32,
    /// `degree` converted to probe travel
    pub displacement_mm: f32,
    /// Number of probe rounds run before termination
    pub probe_rounds: u8,
}

/// Result of a scan cut short by a limit trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AbortReport {
    /// Tripped side
    pub side: Side,
    /// Atomic units moved during the retreat
    pub retreat_units: u32,
    /// Phase active when the trip was observed
    pub interrupted: Phase,
}

/// How a scan ended
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanOutcome {
    /// Crest recorded and added to the home offset
    Crest(CrestReport),
    /// Limit trip, retreat performed, nothing recorded
    Aborted(AbortReport),
}

impl ScanOutcome {
    /// Get the crest, if the scan completed
    pub fn crest(&self) -> Option<&CrestReport> {
        match self {
            ScanOutcome::Crest(crest) => Some(crest),
            ScanOutcome::Aborted(_) => None,
        }
    }

    /// Get the abort details, if the scan was cut short
    pub fn aborted(&self) -> Option<&AbortReport> {
        match self {
            ScanOutcome::Crest(_) => None,
            ScanOutcome::Aborted(abort) => Some(abort),
        }
    }
}

/// Scan errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanError {
    /// Range is NaN or infinite; the scan was not started
    InvalidRange,
    /// Motion refused outside a scan
    Motion(MotionError),
}

impl From<MotionError> for ScanError {
    fn from(err: MotionError) -> Self {
        ScanError::Motion(err)
    }
}

/// Decides which coarse sweep samples are reported
///
/// A sample is reported when it is above the noise floor and differs
/// from the last reported sample by more than the minimum delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepFilter {
    min_voltage: f32,
    min_delta: f32,
    last: f32,
}

impl SweepFilter {
    /// Create a filter with nothing reported yet
    pub fn new(min_voltage: f32, min_delta: f32) -> Self {
        Self {
            min_voltage,
            min_delta,
            last: 0.0,
        }
    }

    /// Check a sample, remembering it if it is reported
    pub fn accept(&mut self, voltage: f32) -> bool {
        if voltage > self.min_voltage && (voltage - self.last).abs() > self.min_delta {
            self.last = voltage;
            true
        } else {
            false
        }
    }
}
