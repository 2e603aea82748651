//! Safety monitoring
//!
//! Tracks travel-limit trips and performs the fixed recovery retreat.

pub mod monitor;

pub use monitor::{LimitEvent, Retreat, SafetyMonitor, SafetyState, SafetyTrip, DEFAULT_RETREAT_DEG};
