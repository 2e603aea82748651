//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in crestscan-core on top of `embedded-hal` 1.0:
//!
//! - STEP/DIR/ENABLE stepper drivers (A4988, DRV8825, TMC2209 standalone)
//! - A pair of travel-limit switches
//! - ADC-backed probe voltage sensor

#![no_std]
#![deny(unsafe_code)]

pub mod limit;
pub mod sensor;
pub mod stepper;
