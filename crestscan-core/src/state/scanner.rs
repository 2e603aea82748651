//! Shared scanner state
//!
//! Position, home offset, the safety flag, the driver-enable flag and the
//! scan phase live in one structure owned by the scan engine and lent to
//! each component by reference. Nothing here is global.

use crate::safety::SafetyState;
use crate::traits::Direction;

use super::machine::Phase;

/// All mutable scanner state
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerState {
    /// Absolute position in atomic units
    position: i32,
    /// Sum of recorded crest degrees since the last home reset
    home_offset_deg: f32,
    /// Limit trip state
    safety: SafetyState,
    /// Driver energized
    driver_enabled: bool,
    /// Current scan phase
    phase: Phase,
}

impl Default for ScannerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScannerState {
    /// Fresh state at power-on, driver de-energized until the first step
    pub fn new() -> Self {
        Self {
            position: 0,
            home_offset_deg: 0.0,
            safety: SafetyState::Clear,
            driver_enabled: false,
            phase: Phase::Idle,
        }
    }

    /// Absolute position in atomic units
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Cumulative crest offset in degrees
    pub fn home_offset_deg(&self) -> f32 {
        self.home_offset_deg
    }

    /// Limit trip state
    pub fn safety(&self) -> SafetyState {
        self.safety
    }

    /// Check if the driver is energized
    pub fn driver_enabled(&self) -> bool {
        self.driver_enabled
    }

    /// Current scan phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn apply_step(&mut self, direction: Direction) {
        self.position += direction.sign();
    }

    pub(crate) fn reset_position(&mut self) {
        self.position = 0;
    }

    pub(crate) fn accumulate_crest(&mut self, degree: f32) {
        self.home_offset_deg += degree;
    }

    pub(crate) fn clear_home_offset(&mut self) {
        self.home_offset_deg = 0.0;
    }

    pub(crate) fn set_safety(&mut self, safety: SafetyState) {
        self.safety = safety;
    }

    pub(crate) fn set_driver_enabled(&mut self, enabled: bool) {
        self.driver_enabled = enabled;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}
