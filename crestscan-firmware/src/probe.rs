//! Probe input
//!
//! Reads the RP2040 ADC in blocking mode, or the synthetic waveform when
//! `[simulation] enabled = true`.

use embassy_rp::adc::{self, Adc, Blocking, Channel};

use crestscan_core::sim::SimSensor;
use crestscan_core::traits::VoltageSensor;
use crestscan_drivers::sensor::{AdcRead, AdcVoltageSensor};

/// One RP2040 ADC channel
pub struct RpAdcChannel {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl RpAdcChannel {
    /// Wrap an ADC and the probe channel
    pub fn new(adc: Adc<'static, Blocking>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AdcRead for RpAdcChannel {
    type Error = adc::Error;

    fn read_raw(&mut self) -> Result<u16, adc::Error> {
        self.adc.blocking_read(&mut self.channel)
    }
}

/// Probe selected at boot
pub enum ProbeSensor {
    /// Probe front-end on the ADC
    Hardware(AdcVoltageSensor<RpAdcChannel>),
    /// Synthetic waveform
    Simulated(SimSensor),
}

impl VoltageSensor for ProbeSensor {
    fn begin_scan(&mut self, span_deg: f32) {
        match self {
            ProbeSensor::Hardware(sensor) => sensor.begin_scan(span_deg),
            ProbeSensor::Simulated(sensor) => sensor.begin_scan(span_deg),
        }
    }

    fn read_voltage(&mut self, position: i32) -> f32 {
        match self {
            ProbeSensor::Hardware(sensor) => sensor.read_voltage(position),
            ProbeSensor::Simulated(sensor) => sensor.read_voltage(position),
        }
    }
}
