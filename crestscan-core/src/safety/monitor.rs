//! Safety monitor implementation
//!
//! Polls the limit switches after every atomic step. A contact latches
//! the monitor into `Tripped(side)`; from then on no step toward that side
//! is allowed and the switches are not sampled again until the retreat
//! has moved the axis well clear and released the latch.

use crestscan_protocol::Side;

use crate::motion::{degrees_to_index, MotionActuator};
use crate::state::ScannerState;
use crate::traits::{Direction, LimitSwitches, StepActuator};

/// Default retreat overshoot in degrees
pub const DEFAULT_RETREAT_DEG: f32 = 2000.0;

/// Limit trip state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyState {
    /// No limit in contact
    Clear,
    /// A limit tripped and has not been retreated from yet
    Tripped(Side),
}

impl SafetyState {
    /// Check if no trip is latched
    pub fn is_clear(&self) -> bool {
        matches!(self, SafetyState::Clear)
    }

    /// Side that forbids a step in `direction`, if any
    pub fn blocking(&self, direction: Direction) -> Option<Side> {
        match *self {
            SafetyState::Tripped(side) if Direction::toward_side(side) == direction => Some(side),
            _ => None,
        }
    }
}

/// A newly observed limit contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LimitEvent {
    /// Side whose switch closed
    pub side: Side,
}

/// Error raised when a motion is cut short by a limit trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SafetyTrip(pub Side);

impl SafetyTrip {
    /// Side that tripped
    pub fn side(&self) -> Side {
        self.0
    }
}

/// A completed safety retreat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Retreat {
    /// Side that was retreated from
    pub side: Side,
    /// Atomic units travelled
    pub units: u32,
}

/// Safety monitor for limit-switch trips
pub struct SafetyMonitor<L> {
    /// Limit switch input
    switches: L,
    /// Retreat distance in atomic units
    retreat_units: u32,
    /// Trips observed or injected since power-on
    trip_count: u32,
}

impl<L: LimitSwitches> SafetyMonitor<L> {
    /// Create a new safety monitor
    ///
    /// # Arguments
    /// - `switches`: Limit switch input
    /// - `retreat_deg`: Overshoot moved away from a tripped limit
    pub fn new(switches: L, retreat_deg: f32) -> Self {
        Self {
            switches,
            retreat_units: degrees_to_index(retreat_deg).unsigned_abs(),
            trip_count: 0,
        }
    }

    /// Get the limit switch input
    pub fn switches(&self) -> &L {
        &self.switches
    }

    /// Get the limit switch input mutably
    pub fn switches_mut(&mut self) -> &mut L {
        &mut self.switches
    }

    /// Retreat distance in atomic units
    pub fn retreat_units(&self) -> u32 {
        self.retreat_units
    }

    /// Number of trips since power-on
    pub fn trip_count(&self) -> u32 {
        self.trip_count
    }

    /// Sample the switches
    ///
    /// Returns the event for a new contact. While a trip is latched the
    /// switches are not sampled and nothing is returned.
    pub fn poll(&mut self, state: &mut ScannerState) -> Option<LimitEvent> {
        if !state.safety().is_clear() {
            return None;
        }

        let side = self.switches.triggered()?;
        Some(self.latch(state, side))
    }

    /// Latch a trip without a switch contact (bench testing)
    pub fn inject(&mut self, state: &mut ScannerState, side: Side) -> LimitEvent {
        self.latch(state, side)
    }

    /// Move the fixed overshoot away from the tripped limit and clear the latch
    ///
    /// A left trip retreats toward positive degrees, a right trip toward
    /// negative degrees. Returns `None` if no trip is latched.
    pub fn retreat<A: StepActuator>(
        &mut self,
        actuator: &mut MotionActuator<A>,
        state: &mut ScannerState,
    ) -> Option<Retreat> {
        let SafetyState::Tripped(side) = state.safety() else {
            return None;
        };

        let start = state.position();
        let direction = Direction::away_from(side);
        let distance = i32::try_from(self.retreat_units).unwrap_or(i32::MAX);
        let target = start.saturating_add(direction.sign() * distance);

        // Switches are not sampled while latched, so nothing can cut the
        // retreat short.
        let _ = actuator.move_to(state, self, target);

        state.set_safety(SafetyState::Clear);
        Some(Retreat {
            side,
            units: state.position().abs_diff(start),
        })
    }

    fn latch(&mut self, state: &mut ScannerState, side: Side) -> LimitEvent {
        state.set_safety(SafetyState::Tripped(side));
        self.trip_count = self.trip_count.saturating_add(1);
        LimitEvent { side }
    }
}
