//! ADC-backed probe voltage sensor
//!
//! The probe front-end delivers an RMS level that the ADC samples
//! directly; conversion to volts uses the reference voltage, full-scale
//! count and divider ratio from [`SensorHwConfig`].

use crestscan_core::config::SensorHwConfig;
use crestscan_core::traits::VoltageSensor;

/// ADC reading trait for platform abstraction
pub trait AdcRead {
    /// Read error
    type Error;

    /// Read one raw conversion
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

/// Voltage sensor on one ADC channel
pub struct AdcVoltageSensor<R> {
    adc: R,
    config: SensorHwConfig,
    /// Consecutive failed reads
    errors: u32,
}

impl<R: AdcRead> AdcVoltageSensor<R> {
    /// Create a new sensor
    pub fn new(adc: R, config: SensorHwConfig) -> Self {
        Self {
            adc,
            config,
            errors: 0,
        }
    }

    /// Consecutive failed reads (reset by a good read)
    pub fn error_count(&self) -> u32 {
        self.errors
    }
}

impl<R: AdcRead> VoltageSensor for AdcVoltageSensor<R> {
    fn read_voltage(&mut self, _position: i32) -> f32 {
        match self.adc.read_raw() {
            Ok(raw) => {
                self.errors = 0;
                self.config.counts_to_volts(raw.min(self.config.full_scale))
            }
            Err(_) => {
                // A failed conversion reads as no signal so it can never
                // become the crest
                self.errors = self.errors.saturating_add(1);
                0.0
            }
        }
    }
}
