//! Simulated stepper, limit switches and waveform-backed sensor

use crestscan_protocol::Side;
#[allow(unused_imports)]
use micromath::F32Ext;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::motion::index_to_degrees;
use crate::traits::{Direction, LimitSwitches, StepActuator, VoltageSensor};
use crate::waveform::WaveformModel;

/// Step generator that only counts
#[derive(Debug, Clone, Default)]
pub struct SimStepper {
    net_steps: i64,
    total_steps: u64,
    enabled: bool,
    enable_toggles: u32,
}

impl SimStepper {
    /// Create a disabled stepper at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Signed sum of all steps
    pub fn net_steps(&self) -> i64 {
        self.net_steps
    }

    /// Number of steps in either direction
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Check if the driver is energized
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of enable state changes
    pub fn enable_toggles(&self) -> u32 {
        self.enable_toggles
    }
}

impl StepActuator for SimStepper {
    fn step(&mut self, direction: Direction) {
        self.net_steps += i64::from(direction.sign());
        self.total_steps += 1;
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.enable_toggles += 1;
        }
    }
}

/// Limit switches driven by a script
///
/// A contact can be scheduled for the n-th poll from now (momentary) or
/// held until released.
#[derive(Debug, Clone, Default)]
pub struct SimLimits {
    scheduled: Option<(u32, Side)>,
    held: Option<Side>,
    polls: u32,
}

impl SimLimits {
    /// Create switches that never trip
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a momentary contact on the `polls`-th poll from now
    ///
    /// `1` trips on the very next poll. Replaces any earlier schedule.
    pub fn trip_after(&mut self, polls: u32, side: Side) {
        self.scheduled = Some((polls.max(1), side));
    }

    /// Hold a switch closed until [`release`](Self::release)
    pub fn press(&mut self, side: Side) {
        self.held = Some(side);
    }

    /// Open every switch and drop any scheduled contact
    pub fn release(&mut self) {
        self.held = None;
        self.scheduled = None;
    }

    /// Number of times the switches were sampled
    pub fn polls(&self) -> u32 {
        self.polls
    }
}

impl LimitSwitches for SimLimits {
    fn triggered(&mut self) -> Option<Side> {
        self.polls += 1;

        if let Some((remaining, side)) = self.scheduled {
            if remaining <= 1 {
                self.scheduled = None;
                return Some(side);
            }
            self.scheduled = Some((remaining - 1, side));
        }

        self.held
    }
}

/// How the simulated probe reads the waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SampleMode {
    /// Segment RMS voltage
    #[default]
    Rms,
    /// Half-sine instantaneous voltage
    Instantaneous,
}

/// Probe backed by a [`WaveformModel`]
///
/// A seeded sensor generates a fresh waveform over the span of every scan,
/// advancing its seed each time. A fixed sensor keeps the model it was
/// given.
#[derive(Debug, Clone)]
pub struct SimSensor {
    model: WaveformModel,
    next_seed: Option<u64>,
    mode: SampleMode,
    reads: u32,
}

impl SimSensor {
    /// Sensor that regenerates its waveform per scan, starting at `seed`
    pub fn seeded(seed: u64) -> Self {
        Self {
            model: WaveformModel::empty(),
            next_seed: Some(seed),
            mode: SampleMode::Rms,
            reads: 0,
        }
    }

    /// Sensor over a fixed waveform
    pub fn fixed(model: WaveformModel) -> Self {
        Self {
            model,
            next_seed: None,
            mode: SampleMode::Rms,
            reads: 0,
        }
    }

    /// Build from the `[simulation]` configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::seeded(config.seed).with_mode(config.sample_mode)
    }

    /// Select the sampling mode
    pub fn with_mode(mut self, mode: SampleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Current waveform
    pub fn model(&self) -> &WaveformModel {
        &self.model
    }

    /// Number of voltage reads
    pub fn reads(&self) -> u32 {
        self.reads
    }
}

impl VoltageSensor for SimSensor {
    fn begin_scan(&mut self, span_deg: f32) {
        if let Some(seed) = self.next_seed {
            self.model = WaveformModel::generate(span_deg, seed);
            self.next_seed = Some(seed.wrapping_add(1));
        }
    }

    fn read_voltage(&mut self, position: i32) -> f32 {
        self.reads += 1;
        let magnitude = index_to_degrees(position).abs();
        match self.mode {
            SampleMode::Rms => self.model.sample(magnitude),
            SampleMode::Instantaneous => self.model.sample_instantaneous(magnitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::WaveformSegment;

    #[test]
    fn test_sim_limits_schedule() {
        let mut limits = SimLimits::new();
        limits.trip_after(3, Side::Left);

        assert_eq!(limits.triggered(), None);
        assert_eq!(limits.triggered(), None);
        assert_eq!(limits.triggered(), Some(Side::Left));
        // Momentary: cleared after reporting
        assert_eq!(limits.triggered(), None);
        assert_eq!(limits.polls(), 4);
    }

    #[test]
    fn test_sim_limits_held() {
        let mut limits = SimLimits::new();
        limits.press(Side::Right);
        assert_eq!(limits.triggered(), Some(Side::Right));
        assert_eq!(limits.triggered(), Some(Side::Right));
        limits.release();
        assert_eq!(limits.triggered(), None);
    }

    #[test]
    fn test_sim_stepper_counts() {
        let mut stepper = SimStepper::new();
        stepper.step(Direction::Positive);
        stepper.step(Direction::Negative);
        stepper.step(Direction::Negative);
        assert_eq!(stepper.net_steps(), -1);
        assert_eq!(stepper.total_steps(), 3);

        stepper.set_enabled(true);
        stepper.set_enabled(true);
        assert_eq!(stepper.enable_toggles(), 1);
    }

    #[test]
    fn test_fixed_sensor_samples_magnitude() {
        let model =
            WaveformModel::from_segments(90.0, &[WaveformSegment::new(0.0, 90.0, 3.0)]).unwrap();
        let mut sensor = SimSensor::fixed(model.clone());
        sensor.begin_scan(500.0);

        assert_eq!(sensor.model(), &model);
        // 100 units = 5.625°, on either side of zero
        assert!((sensor.read_voltage(100) - 2.121).abs() < 1e-4);
        assert!((sensor.read_voltage(-100) - 2.121).abs() < 1e-4);
        // 2000 units = 112.5°, past the segment
        assert_eq!(sensor.read_voltage(2000), 0.0);
        assert_eq!(sensor.reads(), 3);
    }

    #[test]
    fn test_seeded_sensor_regenerates_per_scan() {
        let mut sensor = SimSensor::seeded(9);
        assert!(sensor.model().segments().is_empty());

        sensor.begin_scan(360.0);
        assert_eq!(sensor.model(), &WaveformModel::generate(360.0, 9));

        sensor.begin_scan(360.0);
        assert_eq!(sensor.model(), &WaveformModel::generate(360.0, 10));
    }

    #[test]
    fn test_instantaneous_mode() {
        let model =
            WaveformModel::from_segments(90.0, &[WaveformSegment::new(0.0, 90.0, 2.0)]).unwrap();
        let mut sensor = SimSensor::fixed(model).with_mode(SampleMode::Instantaneous);
        // 800 units = 45°, the half-sine apex
        assert!((sensor.read_voltage(800) - 2.0).abs() < 0.01);
    }
}
