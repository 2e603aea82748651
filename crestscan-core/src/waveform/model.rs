//! Waveform model
//!
//! The span `[0, span)` is tiled by segments of random width (whole
//! degrees in `[30, 90]`) and amplitude (hundredths of a volt in
//! `[1.00, 5.00]`). The last segment is clipped to end exactly at the span.
//!
//! Generation gives up after [`MAX_SEGMENTS`] segments. Spans wider than
//! the cap can cover are left partially uncovered and sample as 0 volts
//! there; this is not reported as an error, but can be detected with
//! [`WaveformModel::is_truncated`].

use core::f32::consts::PI;

use heapless::Vec;
#[allow(unused_imports)]
use micromath::F32Ext;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of segments in one waveform
pub const MAX_SEGMENTS: usize = 100;

/// Ratio of RMS to peak voltage reported by the simulated sensor
pub const RMS_FACTOR: f32 = 0.707;

/// Narrowest generated segment in degrees
pub const MIN_SEGMENT_WIDTH_DEG: u16 = 30;

/// Widest generated segment in degrees
pub const MAX_SEGMENT_WIDTH_DEG: u16 = 90;

/// Lowest generated amplitude in centivolts
pub const MIN_AMPLITUDE_CV: u16 = 100;

/// Highest generated amplitude in centivolts
pub const MAX_AMPLITUDE_CV: u16 = 500;

/// One constant-amplitude stretch of the waveform
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaveformSegment {
    /// Start angle in degrees (inclusive)
    pub start: f32,
    /// Width in degrees
    pub width: f32,
    /// Peak amplitude in volts
    pub amplitude: f32,
}

impl WaveformSegment {
    /// Create a segment
    pub const fn new(start: f32, width: f32, amplitude: f32) -> Self {
        Self {
            start,
            width,
            amplitude,
        }
    }

    /// End angle in degrees (exclusive)
    pub fn end(&self) -> f32 {
        self.start + self.width
    }

    /// Check if `position` lies in `[start, end)`
    pub fn contains(&self, position: f32) -> bool {
        position >= self.start && position < self.end()
    }
}

/// Piecewise-constant synthetic signal
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformModel {
    segments: Vec<WaveformSegment, MAX_SEGMENTS>,
    span: f32,
}

impl Default for WaveformModel {
    fn default() -> Self {
        Self::empty()
    }
}

impl WaveformModel {
    /// A model with no segments (samples 0 everywhere)
    pub const fn empty() -> Self {
        Self {
            segments: Vec::new(),
            span: 0.0,
        }
    }

    /// Generate a random tiling of `[0, span)`
    ///
    /// The same `span` and `seed` always produce the same segments.
    pub fn generate(span: f32, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut segments = Vec::new();
        let mut start = 0.0f32;

        while start < span && !segments.is_full() {
            let width = rng.gen_range(MIN_SEGMENT_WIDTH_DEG..=MAX_SEGMENT_WIDTH_DEG) as f32;
            let amplitude = rng.gen_range(MIN_AMPLITUDE_CV..=MAX_AMPLITUDE_CV) as f32 / 100.0;

            let end = (start + width).min(span);
            // Capacity checked by the loop condition
            let _ = segments.push(WaveformSegment::new(start, end - start, amplitude));
            start = end;
        }

        Self { segments, span }
    }

    /// Build a model from explicit segments
    ///
    /// Returns `None` if more than [`MAX_SEGMENTS`] segments are given.
    pub fn from_segments(span: f32, segments: &[WaveformSegment]) -> Option<Self> {
        let segments = Vec::from_slice(segments).ok()?;
        Some(Self { segments, span })
    }

    /// Segments in ascending order
    pub fn segments(&self) -> &[WaveformSegment] {
        &self.segments
    }

    /// Requested span in degrees
    pub fn span(&self) -> f32 {
        self.span
    }

    /// End of the last segment in degrees
    pub fn covered_span(&self) -> f32 {
        self.segments.last().map(WaveformSegment::end).unwrap_or(0.0)
    }

    /// Check if the segment cap stopped generation before the span was covered
    pub fn is_truncated(&self) -> bool {
        self.segments.is_full() && self.covered_span() < self.span
    }

    /// RMS voltage at `position` degrees from zero
    ///
    /// Returns 0 outside every segment.
    pub fn sample(&self, position: f32) -> f32 {
        self.segment_at(position)
            .map(|segment| segment.amplitude * RMS_FACTOR)
            .unwrap_or(0.0)
    }

    /// Instantaneous voltage at `position` degrees from zero
    ///
    /// Each segment carries one half-sine period of its amplitude. Not used
    /// by the crest search.
    pub fn sample_instantaneous(&self, position: f32) -> f32 {
        self.segment_at(position)
            .map(|segment| {
                let phase = PI * (position - segment.start) / segment.width;
                segment.amplitude * phase.sin()
            })
            .unwrap_or(0.0)
    }

    fn segment_at(&self, position: f32) -> Option<&WaveformSegment> {
        self.segments.iter().find(|segment| segment.contains(position))
    }
}
