//! Crest search
//!
//! The scan engine sweeps the requested range, returns to the strongest
//! sample and refines it with a half-max bracket and an adaptive probe.
//! Progress goes to a [`ScanObserver`] as protocol [`Report`]s.
//!
//! [`Report`]: crestscan_protocol::Report

pub mod engine;
pub mod observer;
pub mod outcome;
pub mod probe;

pub use engine::ScanEngine;
pub use observer::{NullObserver, ScanObserver};
pub use outcome::{AbortReport, CrestEstimate, CrestReport, ScanError, ScanOutcome, SweepFilter};
pub use probe::ProbeSchedule;
