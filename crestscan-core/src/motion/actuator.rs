//! Motion actuator
//!
//! The actuator is the only code that changes the tracked position. It
//! wraps a [`StepActuator`] and applies every step to the shared
//! [`ScannerState`], keeping position equal to the net of all actuations.

use crestscan_protocol::Side;

use crate::safety::{SafetyMonitor, SafetyTrip};
use crate::state::ScannerState;
use crate::traits::{Direction, LimitSwitches, StepActuator};

/// Motion errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Step refused: it would move further into a tripped limit
    Blocked(Side),
}

impl From<MotionError> for SafetyTrip {
    fn from(err: MotionError) -> Self {
        match err {
            MotionError::Blocked(side) => SafetyTrip(side),
        }
    }
}

/// Position-tracking actuator
pub struct MotionActuator<A> {
    driver: A,
}

impl<A: StepActuator> MotionActuator<A> {
    /// Create an actuator around a step generator
    pub fn new(driver: A) -> Self {
        Self { driver }
    }

    /// Get the underlying step generator
    pub fn driver(&self) -> &A {
        &self.driver
    }

    /// Get the underlying step generator mutably
    pub fn driver_mut(&mut self) -> &mut A {
        &mut self.driver
    }

    /// Advance the position by exactly one atomic unit
    ///
    /// Re-enables the driver first if it was disabled. Refuses to step
    /// toward a side whose limit is currently tripped.
    pub fn step(&mut self, state: &mut ScannerState, direction: Direction) -> Result<(), MotionError> {
        if let Some(side) = state.safety().blocking(direction) {
            return Err(MotionError::Blocked(side));
        }

        if !state.driver_enabled() {
            self.driver.set_enabled(true);
            state.set_driver_enabled(true);
        }

        self.driver.step(direction);
        state.apply_step(direction);
        Ok(())
    }

    /// De-energize the driver
    ///
    /// Idempotent; the next [`step`](Self::step) re-enables it.
    pub fn disable(&mut self, state: &mut ScannerState) {
        if state.driver_enabled() {
            self.driver.set_enabled(false);
            state.set_driver_enabled(false);
        }
    }

    /// Approach an absolute atomic index one unit at a time
    ///
    /// The safety monitor is polled after every unit. On a trip the move
    /// stops where it is, leaving the position partially advanced.
    pub fn move_to<L: LimitSwitches>(
        &mut self,
        state: &mut ScannerState,
        safety: &mut SafetyMonitor<L>,
        target: i32,
    ) -> Result<(), SafetyTrip> {
        while state.position() != target {
            let direction = Direction::toward(state.position(), target);
            self.step(state, direction)?;

            if let Some(event) = safety.poll(state) {
                return Err(SafetyTrip(event.side));
            }
        }
        Ok(())
    }

    /// Step a fixed number of units without polling the safety monitor
    ///
    /// Only used for the home return, whose travel is assumed to stay
    /// inside the limits.
    pub fn travel_unchecked(
        &mut self,
        state: &mut ScannerState,
        direction: Direction,
        units: u32,
    ) -> Result<(), MotionError> {
        for _ in 0..units {
            self.step(state, direction)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::SafetyState;
    use crate::sim::{SimLimits, SimStepper};

    fn setup() -> (MotionActuator<SimStepper>, SafetyMonitor<SimLimits>, ScannerState) {
        (
            MotionActuator::new(SimStepper::new()),
            SafetyMonitor::new(SimLimits::new(), 2000.0),
            ScannerState::new(),
        )
    }

    #[test]
    fn test_step_tracks_position() {
        let (mut actuator, _, mut state) = setup();
        actuator.step(&mut state, Direction::Positive).unwrap();
        actuator.step(&mut state, Direction::Positive).unwrap();
        actuator.step(&mut state, Direction::Negative).unwrap();
        assert_eq!(state.position(), 1);
        assert_eq!(actuator.driver().net_steps(), 1);
    }

    #[test]
    fn test_lazy_enable() {
        let (mut actuator, _, mut state) = setup();
        actuator.disable(&mut state);
        assert!(!state.driver_enabled());
        assert!(!actuator.driver().is_enabled());

        actuator.step(&mut state, Direction::Positive).unwrap();
        assert!(state.driver_enabled());
        assert!(actuator.driver().is_enabled());
    }

    #[test]
    fn test_disable_is_idempotent() {
        let (mut actuator, _, mut state) = setup();
        actuator.step(&mut state, Direction::Positive).unwrap();
        let toggles = actuator.driver().enable_toggles();

        actuator.disable(&mut state);
        actuator.disable(&mut state);
        assert_eq!(actuator.driver().enable_toggles(), toggles + 1);
        assert!(!state.driver_enabled());
    }

    #[test]
    fn test_step_blocked_toward_tripped_side() {
        let (mut actuator, mut safety, mut state) = setup();
        safety.inject(&mut state, Side::Left);

        assert_eq!(
            actuator.step(&mut state, Direction::Negative),
            Err(MotionError::Blocked(Side::Left))
        );
        assert_eq!(state.position(), 0);

        // Moving away from the tripped side is allowed
        assert!(actuator.step(&mut state, Direction::Positive).is_ok());
        assert_eq!(state.position(), 1);
    }

    #[test]
    fn test_move_to_reaches_target() {
        let (mut actuator, mut safety, mut state) = setup();
        actuator.move_to(&mut state, &mut safety, 25).unwrap();
        assert_eq!(state.position(), 25);
        actuator.move_to(&mut state, &mut safety, -5).unwrap();
        assert_eq!(state.position(), -5);
        assert_eq!(actuator.driver().total_steps(), 55);
    }

    #[test]
    fn test_move_to_stops_on_trip() {
        let (mut actuator, mut safety, mut state) = setup();
        safety.switches_mut().trip_after(10, Side::Right);

        let result = actuator.move_to(&mut state, &mut safety, 100);
        assert_eq!(result, Err(SafetyTrip(Side::Right)));
        assert_eq!(state.position(), 10);
        assert_eq!(state.safety(), SafetyState::Tripped(Side::Right));
    }

    #[test]
    fn test_travel_unchecked_ignores_switches() {
        let (mut actuator, mut safety, mut state) = setup();
        safety.switches_mut().trip_after(1, Side::Right);

        actuator
            .travel_unchecked(&mut state, Direction::Positive, 20)
            .unwrap();
        assert_eq!(state.position(), 20);
        assert_eq!(state.safety(), SafetyState::Clear);
    }
}
