//! Scan engine
//!
//! Owns the actuator, safety monitor, sensor and [`ScannerState`], and
//! runs one command at a time to completion. A scan is:
//!
//! 1. Coarse sweep from zero across the signed range, tracking the peak
//! 2. Return to the peak
//! 3. Half-max bracket to the left, recenter, half-max bracket to the right
//! 4. Adaptive probe around the coarse crest
//!
//! A limit trip at any point ends the scan with the safety retreat and
//! nothing is recorded.

use crestscan_protocol::{Command, Report, Side};
#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::ScanConfig;
use crate::motion::{
    degrees_to_index, index_magnitude_degrees, index_to_degrees, MotionActuator, ATOMIC_UNIT_DEG,
    MAX_TRAVEL_DEG,
};
use crate::safety::{SafetyMonitor, SafetyTrip};
use crate::state::{PhaseEvent, ScannerState};
use crate::traits::{Direction, LimitSwitches, StepActuator, VoltageSensor};

use super::observer::ScanObserver;
use super::outcome::{AbortReport, CrestEstimate, CrestReport, ScanError, ScanOutcome, SweepFilter};
use super::probe::ProbeSchedule;

/// Crest scan orchestrator
pub struct ScanEngine<A, L, S> {
    config: ScanConfig,
    actuator: MotionActuator<A>,
    safety: SafetyMonitor<L>,
    sensor: S,
    state: ScannerState,
    /// Magnitude of the active scan's range in degrees
    span_deg: f32,
}

impl<A, L, S> ScanEngine<A, L, S>
where
    A: StepActuator,
    L: LimitSwitches,
    S: VoltageSensor,
{
    /// Create an engine at position zero with the driver de-energized
    pub fn new(config: ScanConfig, driver: A, switches: L, sensor: S) -> Self {
        let safety = SafetyMonitor::new(switches, config.retreat_deg);
        Self {
            config,
            actuator: MotionActuator::new(driver),
            safety,
            sensor,
            state: ScannerState::new(),
            span_deg: 0.0,
        }
    }

    /// Get the scanner state
    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    /// Get the scan configuration
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Get the motion actuator
    pub fn actuator(&self) -> &MotionActuator<A> {
        &self.actuator
    }

    /// Get the safety monitor
    pub fn safety(&self) -> &SafetyMonitor<L> {
        &self.safety
    }

    /// Get the safety monitor mutably (to script simulated switches)
    pub fn safety_mut(&mut self) -> &mut SafetyMonitor<L> {
        &mut self.safety
    }

    /// Get the voltage sensor
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Get the voltage sensor mutably
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Execute one operator command, sending every report to `observer`
    pub fn execute<O: ScanObserver>(
        &mut self,
        command: Command,
        observer: &mut O,
    ) -> Result<(), ScanError> {
        match command {
            Command::DefaultScan => {
                self.scan(self.config.default_range_deg, observer)?;
            }
            Command::Scan(range_deg) => {
                self.scan(range_deg, observer)?;
            }
            Command::ResetHome => {
                let report = self.reset_home()?;
                observer.report(report);
            }
            Command::DisableDriver => {
                self.disable_driver();
                observer.report(Report::DriverDisabled);
            }
            Command::InjectTrip(side) => {
                let abort = self.inject_trip(side);
                observer.report(abort_report(&abort));
            }
        }
        Ok(())
    }

    /// Run a full scan over a signed range in degrees
    ///
    /// Zero selects the configured default range. Ranges beyond
    /// [`MAX_TRAVEL_DEG`] are rejected. Position is reset to
    /// zero and the sensor is told the new span before the sweep starts.
    pub fn scan<O: ScanObserver>(
        &mut self,
        range_deg: f32,
        observer: &mut O,
    ) -> Result<ScanOutcome, ScanError> {
        if !range_deg.is_finite() || range_deg.abs() > MAX_TRAVEL_DEG {
            return Err(ScanError::InvalidRange);
        }
        let range_deg = if range_deg == 0.0 {
            self.config.default_range_deg
        } else {
            range_deg
        };

        self.span_deg = range_deg.abs();
        self.state.reset_position();
        self.sensor.begin_scan(self.span_deg);
        self.advance(PhaseEvent::ScanRequested);

        let result = self
            .coarse_sweep(range_deg, observer)
            .and_then(|peak| self.fine_search(peak, observer));

        let outcome = match result {
            Ok(crest) => {
                self.state.accumulate_crest(crest.degree);
                observer.report(Report::Crest {
                    voltage: crest.voltage,
                    degree: crest.degree,
                    displacement_mm: crest.displacement_mm,
                });
                ScanOutcome::Crest(crest)
            }
            Err(SafetyTrip(side)) => {
                let abort = self.abort(side);
                observer.report(abort_report(&abort));
                ScanOutcome::Aborted(abort)
            }
        };

        Ok(outcome)
    }

    /// Return to the logical zero
    ///
    /// Moves back by the accumulated home offset and zeroes both the offset
    /// and the position. The limit switches are not polled on the way.
    pub fn reset_home(&mut self) -> Result<Report, ScanError> {
        let offset = self.state.home_offset_deg();
        if offset == 0.0 {
            return Ok(Report::HomeIdle);
        }

        let units = degrees_to_index(offset).unsigned_abs();
        let direction = Direction::of(offset).opposite();
        self.actuator
            .travel_unchecked(&mut self.state, direction, units)?;

        self.state.clear_home_offset();
        self.state.reset_position();

        let travelled = units as f32 * ATOMIC_UNIT_DEG * direction.sign() as f32;
        Ok(Report::HomeReset {
            travelled_deg: travelled,
        })
    }

    /// De-energize the driver until the next step
    pub fn disable_driver(&mut self) {
        self.actuator.disable(&mut self.state);
    }

    /// Latch a simulated limit contact and perform the retreat
    ///
    /// Outside a scan there is nothing to interrupt, so the retreat runs
    /// straight away.
    pub fn inject_trip(&mut self, side: Side) -> AbortReport {
        self.safety.inject(&mut self.state, side);
        self.abort(side)
    }

    fn advance(&mut self, event: PhaseEvent) {
        let next = self.state.phase().transition(event);
        self.state.set_phase(next);
    }

    fn abort(&mut self, side: Side) -> AbortReport {
        let interrupted = self.state.phase();
        self.advance(PhaseEvent::LimitTripped(side));

        let retreat_units = self
            .safety
            .retreat(&mut self.actuator, &mut self.state)
            .map(|retreat| retreat.units)
            .unwrap_or(0);

        self.advance(PhaseEvent::RetreatComplete);
        AbortReport {
            side,
            retreat_units,
            interrupted,
        }
    }

    fn move_to(&mut self, target: i32) -> Result<(), SafetyTrip> {
        self.actuator
            .move_to(&mut self.state, &mut self.safety, target)
    }

    fn sample(&mut self) -> CrestEstimate {
        let position = self.state.position();
        CrestEstimate {
            degree: index_to_degrees(position),
            voltage: self.sensor.read_voltage(position),
        }
    }

    fn in_range(&self, degree: f32) -> bool {
        degree.abs() <= self.span_deg
    }

    /// Sweep from zero and return to the strongest sample
    fn coarse_sweep<O: ScanObserver>(
        &mut self,
        range_deg: f32,
        observer: &mut O,
    ) -> Result<CrestEstimate, SafetyTrip> {
        let direction = Direction::of(range_deg);
        let units = degrees_to_index(range_deg).unsigned_abs();
        let mut filter =
            SweepFilter::new(self.config.report_min_voltage, self.config.report_min_delta);

        let mut peak = CrestEstimate {
            degree: 0.0,
            voltage: 0.0,
        };
        let mut peak_index = 0;

        for _ in 0..units {
            let target = self.state.position() + direction.sign();
            self.move_to(target)?;

            let sample = self.sample();
            if sample.voltage > peak.voltage {
                peak = sample;
                peak_index = self.state.position();
            }
            if filter.accept(sample.voltage) {
                observer.report(Report::Sweep {
                    degree: sample.degree,
                    voltage: sample.voltage,
                });
            }
        }

        self.move_to(peak_index)?;
        self.advance(PhaseEvent::SweepComplete);
        Ok(peak)
    }

    /// Bracket, recenter and probe around the coarse crest
    fn fine_search<O: ScanObserver>(
        &mut self,
        crest: CrestEstimate,
        observer: &mut O,
    ) -> Result<CrestReport, SafetyTrip> {
        let crest_index = degrees_to_index(crest.degree);
        let mut best = self.sample();
        let threshold = self.config.bracket_ratio * best.voltage;

        self.bracket(Side::Left, threshold, observer)?;
        self.advance(PhaseEvent::ThresholdCrossed);

        self.move_to(crest_index)?;
        let center = self.sample();
        observer.report(Report::Recenter {
            degree: center.degree,
            voltage: center.voltage,
        });
        self.advance(PhaseEvent::Recentered);

        self.bracket(Side::Right, threshold, observer)?;
        self.advance(PhaseEvent::ThresholdCrossed);

        let mut schedule =
            ProbeSchedule::new(self.config.probe_initial_jump_deg, self.config.probe_no_gain_limit);

        while let Some(jump) = schedule.next_jump() {
            let mut gained = false;

            for offset in [crest.degree - jump, crest.degree + jump] {
                if !self.in_range(offset) {
                    continue;
                }

                self.move_to(degrees_to_index(offset))?;
                let sample = self.sample();
                observer.report(Report::Probe {
                    jump,
                    degree: sample.degree,
                    voltage: sample.voltage,
                });

                if sample.voltage > best.voltage + self.config.probe_gain_epsilon {
                    best = sample;
                    gained = true;
                }
            }

            schedule.finish_round(gained);
        }
        self.advance(PhaseEvent::ProbeConverged);

        Ok(CrestReport {
            voltage: best.voltage,
            degree: best.degree,
            displacement_mm: best.degree / self.config.degrees_per_mm,
            probe_rounds: schedule.rounds(),
        })
    }

    /// Walk one unit at a time until the voltage falls to `threshold`
    /// or the walk leaves the scan range
    fn bracket<O: ScanObserver>(
        &mut self,
        side: Side,
        threshold: f32,
        observer: &mut O,
    ) -> Result<(), SafetyTrip> {
        let direction = Direction::toward_side(side);

        loop {
            let target = self.state.position() + direction.sign();
            self.move_to(target)?;

            let sample = self.sample();
            observer.report(Report::Bracket {
                side,
                degree: sample.degree,
                voltage: sample.voltage,
            });

            let outside = index_magnitude_degrees(self.state.position()) > self.span_deg;
            if sample.voltage <= threshold || outside {
                return Ok(());
            }
        }
    }
}

fn abort_report(abort: &AbortReport) -> Report {
    Report::Aborted {
        side: abort.side,
        retreat_deg: abort.retreat_units as f32 * ATOMIC_UNIT_DEG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::SafetyState;
    use crate::scan::NullObserver;
    use crate::state::Phase;
    use crate::sim::{SimLimits, SimSensor, SimStepper};
    use crate::waveform::{WaveformModel, WaveformSegment};

    type SimEngine = ScanEngine<SimStepper, SimLimits, SimSensor>;

    fn engine_with(segments: &[WaveformSegment], span: f32) -> SimEngine {
        let model = WaveformModel::from_segments(span, segments).unwrap();
        ScanEngine::new(
            ScanConfig::default(),
            SimStepper::new(),
            SimLimits::new(),
            SimSensor::fixed(model),
        )
    }

    fn single_segment() -> SimEngine {
        engine_with(&[WaveformSegment::new(0.0, 90.0, 3.0)], 90.0)
    }

    #[test]
    fn test_scan_rejects_non_finite_range() {
        let mut engine = single_segment();
        assert_eq!(
            engine.scan(f32::NAN, &mut NullObserver),
            Err(ScanError::InvalidRange)
        );
        assert_eq!(
            engine.scan(f32::INFINITY, &mut NullObserver),
            Err(ScanError::InvalidRange)
        );
        assert_eq!(engine.state().phase(), Phase::Idle);
        assert_eq!(engine.actuator().driver().total_steps(), 0);
    }

    #[test]
    fn test_scan_rejects_range_beyond_travel_limit() {
        let mut engine = single_segment();
        assert_eq!(
            engine.scan(1e30, &mut NullObserver),
            Err(ScanError::InvalidRange)
        );
        assert_eq!(
            engine.scan(-(MAX_TRAVEL_DEG * 2.0), &mut NullObserver),
            Err(ScanError::InvalidRange)
        );
        assert_eq!(engine.state().phase(), Phase::Idle);
        assert_eq!(engine.actuator().driver().total_steps(), 0);
    }

    #[test]
    fn test_zero_range_uses_default() {
        let mut engine = engine_with(&[], 0.0);
        let outcome = engine.scan(0.0, &mut NullObserver).unwrap();
        assert!(outcome.crest().is_some());
        // A 2000° sweep is 35556 units before any search motion
        assert!(engine.actuator().driver().total_steps() >= 35556);
    }

    #[test]
    fn test_coarse_peak_is_first_unit_inside_segment() {
        let mut engine = single_segment();
        let mut first_sweep = None;
        let mut observer = |report: Report| {
            if let (None, Report::Sweep { degree, voltage }) = (first_sweep, report) {
                first_sweep = Some((degree, voltage));
            }
        };

        let outcome = engine.scan(90.0, &mut observer).unwrap();
        let (degree, voltage) = first_sweep.unwrap();
        assert!((degree - ATOMIC_UNIT_DEG).abs() < 1e-6);
        assert!((voltage - 2.121).abs() < 1e-3);

        // Flat segment: nothing beats the coarse crest
        let crest = outcome.crest().unwrap();
        assert!((crest.degree - ATOMIC_UNIT_DEG).abs() < 1e-6);
        assert!((crest.voltage - 2.121).abs() < 1e-3);
    }

    #[test]
    fn test_crest_accumulates_home_offset() {
        let mut engine = engine_with(
            &[
                WaveformSegment::new(0.0, 40.0, 1.0),
                WaveformSegment::new(40.0, 30.0, 4.0),
                WaveformSegment::new(70.0, 30.0, 1.5),
            ],
            100.0,
        );

        let outcome = engine.scan(100.0, &mut NullObserver).unwrap();
        let crest = outcome.crest().unwrap();
        assert!(crest.degree >= 40.0 && crest.degree < 70.0);
        assert!((crest.voltage - 4.0 * 0.707).abs() < 1e-3);
        assert!((crest.displacement_mm - crest.degree / 45.0).abs() < 1e-5);
        assert_eq!(engine.state().home_offset_deg(), crest.degree);
        assert_eq!(engine.state().phase(), Phase::Idle);
    }

    #[test]
    fn test_negative_range_sweeps_negative() {
        let mut engine = single_segment();
        let outcome = engine.scan(-90.0, &mut NullObserver).unwrap();
        let crest = outcome.crest().unwrap();
        assert!((crest.degree + ATOMIC_UNIT_DEG).abs() < 1e-6);
    }

    #[test]
    fn test_trip_during_sweep_aborts() {
        let mut engine = single_segment();
        engine.safety_mut().switches_mut().trip_after(200, Side::Right);

        let outcome = engine.scan(90.0, &mut NullObserver).unwrap();
        let abort = outcome.aborted().unwrap();
        assert_eq!(abort.side, Side::Right);
        assert_eq!(abort.retreat_units, 35556);
        assert_eq!(abort.interrupted, Phase::CoarseSweep);

        assert_eq!(engine.state().position(), 200 - 35556);
        assert_eq!(engine.state().safety(), SafetyState::Clear);
        assert_eq!(engine.state().home_offset_deg(), 0.0);
        assert_eq!(engine.state().phase(), Phase::Idle);
    }

    #[test]
    fn test_reset_home_idempotent() {
        let mut engine = engine_with(&[WaveformSegment::new(0.0, 30.0, 2.0)], 30.0);
        assert_eq!(engine.reset_home(), Ok(Report::HomeIdle));

        engine.scan(30.0, &mut NullObserver).unwrap();
        let offset = engine.state().home_offset_deg();
        assert!(offset > 0.0);

        let steps_before = engine.actuator().driver().total_steps();
        let report = engine.reset_home().unwrap();
        assert!(matches!(report, Report::HomeReset { travelled_deg } if travelled_deg < 0.0));
        assert_eq!(
            engine.actuator().driver().total_steps() - steps_before,
            degrees_to_index(offset) as u64
        );
        assert_eq!(engine.state().home_offset_deg(), 0.0);
        assert_eq!(engine.state().position(), 0);

        let steps = engine.actuator().driver().total_steps();
        assert_eq!(engine.reset_home(), Ok(Report::HomeIdle));
        assert_eq!(engine.actuator().driver().total_steps(), steps);
    }

    #[test]
    fn test_disable_then_scan_reenables() {
        let mut engine = single_segment();
        let mut reports = 0;
        engine
            .execute(Command::DisableDriver, &mut |_report: Report| reports += 1)
            .unwrap();
        assert_eq!(reports, 1);
        assert!(!engine.state().driver_enabled());

        engine.scan(10.0, &mut NullObserver).unwrap();
        assert!(engine.state().driver_enabled());
        assert!(engine.actuator().driver().is_enabled());
    }

    #[test]
    fn test_inject_trip_while_idle() {
        let mut engine = single_segment();
        let mut last = None;
        engine
            .execute(Command::InjectTrip(Side::Left), &mut |report: Report| {
                last = Some(report)
            })
            .unwrap();

        assert_eq!(
            last,
            Some(Report::Aborted {
                side: Side::Left,
                retreat_deg: 35556.0 * ATOMIC_UNIT_DEG,
            })
        );
        assert_eq!(engine.state().position(), 35556);
        assert_eq!(engine.state().safety(), SafetyState::Clear);
        assert_eq!(engine.state().phase(), Phase::Idle);
    }
}
