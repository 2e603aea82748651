//! Stepper actuation trait
//!
//! This trait abstracts over the physical step generator. One call to
//! [`StepActuator::step`] is one atomic unit of motion; pulse widths,
//! direction setup time and any busy-waiting are the implementation's
//! concern and invisible to the search logic above it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crestscan_protocol::Side;

/// Direction of travel along the scan axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Toward decreasing degrees (left limit)
    Negative,
    /// Toward increasing degrees (right limit)
    Positive,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Negative => Direction::Positive,
            Direction::Positive => Direction::Negative,
        }
    }

    /// Position delta of one step in this direction
    pub fn sign(self) -> i32 {
        match self {
            Direction::Negative => -1,
            Direction::Positive => 1,
        }
    }

    /// Direction of travel for a signed quantity (zero counts as positive)
    pub fn of(value: f32) -> Self {
        if value < 0.0 {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }

    /// Direction that moves from `from` toward `to`
    pub fn toward(from: i32, to: i32) -> Self {
        if to < from {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }

    /// Direction that approaches the given end of travel
    pub fn toward_side(side: Side) -> Self {
        match side {
            Side::Left => Direction::Negative,
            Side::Right => Direction::Positive,
        }
    }

    /// Direction that moves away from the given end of travel
    pub fn away_from(side: Side) -> Self {
        Self::toward_side(side).opposite()
    }
}

/// Trait for step generators
///
/// Implementations drive a STEP/DIR/ENABLE stepper driver (or count
/// pulses in simulation).
pub trait StepActuator {
    /// Perform one complete actuation cycle in `direction`
    ///
    /// Returns once the step has been issued and the pulse timing
    /// requirements of the driver are met.
    fn step(&mut self, direction: Direction);

    /// Energize or de-energize the driver
    ///
    /// When disabled, the motor does not hold position.
    fn set_enabled(&mut self, enabled: bool);
}
