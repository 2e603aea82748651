//! Probe voltage sensors

pub mod adc_voltage;

pub use adc_voltage::{AdcRead, AdcVoltageSensor};
