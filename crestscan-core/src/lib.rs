//! Board-agnostic core logic for the Crestscan rotary scanner
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (step actuator, limit switches, voltage sensor)
//! - Atomic-unit motion with per-step safety polling
//! - Limit-switch safety monitor and fixed retreat
//! - Coarse sweep and adaptive fine crest search
//! - Scan phase state machine
//! - Synthetic waveform model and a simulated rig for deterministic runs
//! - Configuration type definitions and the `scanner.toml` parser

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod motion;
pub mod safety;
pub mod scan;
pub mod sim;
pub mod state;
pub mod traits;
pub mod waveform;

pub use crestscan_protocol::{Command, Report, Side};
