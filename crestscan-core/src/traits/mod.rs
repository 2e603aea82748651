//! Hardware abstraction traits
//!
//! These traits define the interface between the scan logic and
//! hardware-specific (or simulated) implementations.

pub mod limit;
pub mod sensor;
pub mod stepper;

pub use limit::LimitSwitches;
pub use sensor::VoltageSensor;
pub use stepper::{Direction, StepActuator};
