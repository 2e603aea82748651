//! Hardware configuration types
//!
//! Pin assignments are fixed per board in the firmware; these types carry
//! the timing, polarity and scaling that vary between builds.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::toml::ParseError;

/// Step/direction driver timing and polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepperHwConfig {
    /// Delay after changing DIR before the next STEP edge (µs)
    pub dir_setup_us: u32,
    /// STEP high time (µs)
    pub pulse_high_us: u32,
    /// STEP low time, which also sets the step rate (µs)
    pub pulse_low_us: u32,
    /// ENABLE is active-low (A4988, DRV8825, TMC2209 standalone)
    pub enable_active_low: bool,
    /// Swap which DIR level means positive degrees
    pub invert_direction: bool,
}

impl Default for StepperHwConfig {
    fn default() -> Self {
        Self {
            dir_setup_us: 5,
            pulse_high_us: 2,
            pulse_low_us: 500,
            enable_active_low: true,
            invert_direction: false,
        }
    }
}

/// Limit switch polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LimitHwConfig {
    /// Switch pulls the input low on contact (normally open to ground)
    pub active_low: bool,
    /// Enable the internal pull-up on both inputs
    pub pull_up: bool,
}

impl Default for LimitHwConfig {
    fn default() -> Self {
        Self {
            active_low: true,
            pull_up: true,
        }
    }
}

/// ADC scaling for the probe input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorHwConfig {
    /// ADC reference voltage (mV)
    pub vref_mv: u16,
    /// Count at the reference voltage
    pub full_scale: u16,
    /// Gain of the probe front-end divider, in thousandths
    pub divider_milli: u16,
}

impl Default for SensorHwConfig {
    fn default() -> Self {
        Self {
            vref_mv: 3300,
            full_scale: 4095,
            divider_milli: 1000,
        }
    }
}

impl SensorHwConfig {
    /// Convert a raw ADC count to volts at the probe
    pub fn counts_to_volts(&self, counts: u16) -> f32 {
        let at_pin = counts as f32 * self.vref_mv as f32 / (self.full_scale as f32 * 1000.0);
        at_pin * self.divider_milli as f32 / 1000.0
    }

    /// Reject scaling that would divide by zero
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.full_scale == 0 || self.vref_mv == 0 || self.divider_milli == 0 {
            return Err(ParseError::OutOfRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_to_volts() {
        let sensor = SensorHwConfig::default();
        assert_eq!(sensor.counts_to_volts(0), 0.0);
        assert!((sensor.counts_to_volts(4095) - 3.3).abs() < 1e-4);

        let divided = SensorHwConfig {
            divider_milli: 2000,
            ..Default::default()
        };
        assert!((divided.counts_to_volts(4095) - 6.6).abs() < 1e-4);
    }

    #[test]
    fn test_sensor_validate() {
        assert!(SensorHwConfig::default().validate().is_ok());
        let bad = SensorHwConfig {
            full_scale: 0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ParseError::OutOfRange));
    }
}
