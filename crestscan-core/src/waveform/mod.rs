//! Synthetic ground-truth signal
//!
//! A piecewise-constant waveform over the scan span, used in place of a
//! real probe so the search can be run and tested deterministically.

pub mod model;

pub use model::{
    WaveformModel, WaveformSegment, MAX_AMPLITUDE_CV, MAX_SEGMENTS, MAX_SEGMENT_WIDTH_DEG,
    MIN_AMPLITUDE_CV, MIN_SEGMENT_WIDTH_DEG, RMS_FACTOR,
};
