//! Simulated scanner rig
//!
//! Host-side stand-ins for the stepper, limit switches and probe. They let
//! the full scan run deterministically in tests and on a bench without
//! hardware attached.

pub mod rig;

pub use rig::{SampleMode, SimLimits, SimSensor, SimStepper};
