//! Axis motion
//!
//! Atomic-unit conversions and the actuator that owns every change of
//! the tracked position.

pub mod actuator;
pub mod position;

pub use actuator::{MotionActuator, MotionError};
pub use position::{
    degrees_to_index, index_magnitude_degrees, index_to_degrees, ATOMIC_UNIT_DEG,
    FULL_STEP_DEG, MAX_TRAVEL_DEG, MICROSTEPS,
};
