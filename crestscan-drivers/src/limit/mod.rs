//! Limit switch implementations

pub mod switch;

pub use switch::LimitSwitchPair;
