//! Atomic angular units
//!
//! The scanner is driven by a 0.9° motor at 1/16 microstepping, giving an
//! atomic unit of 0.05625°. This is the only unit of physical motion:
//! every target in degrees is rounded to an absolute index before it is
//! approached one unit at a time. Degree values elsewhere are only used
//! for thresholds and reporting.

#[allow(unused_imports)]
use micromath::F32Ext;

/// Full step angle of the motor in degrees
pub const FULL_STEP_DEG: f32 = 0.9;

/// Microsteps per full step
pub const MICROSTEPS: u16 = 16;

/// Smallest controllable angular increment in degrees
pub const ATOMIC_UNIT_DEG: f32 = 0.05625;

/// Largest sweep or retreat distance accepted, in degrees
///
/// Keeps every index reached by a scan, its brackets and a retreat well
/// inside `i32`.
pub const MAX_TRAVEL_DEG: f32 = 1_000_000.0;

/// Convert a signed angle to the nearest absolute atomic index
///
/// The magnitude is rounded, so the sign never affects which unit is
/// chosen: `degrees_to_index(-x) == -degrees_to_index(x)`.
pub fn degrees_to_index(degrees: f32) -> i32 {
    let units = (degrees.abs() / ATOMIC_UNIT_DEG).round() as i32;
    if degrees < 0.0 {
        -units
    } else {
        units
    }
}

/// Convert an absolute atomic index to signed degrees
pub fn index_to_degrees(index: i32) -> f32 {
    index as f32 * ATOMIC_UNIT_DEG
}

/// Angular distance of an index from zero, in degrees
pub fn index_magnitude_degrees(index: i32) -> f32 {
    index.unsigned_abs() as f32 * ATOMIC_UNIT_DEG
}
