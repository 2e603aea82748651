//! Events that trigger phase transitions

use crestscan_protocol::Side;

/// Events that can trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseEvent {
    /// Operator requested a scan
    ScanRequested,
    /// Sweep finished and the axis is back at the coarse peak
    SweepComplete,
    /// Bracketing sample fell to the half-max threshold or left the range
    ThresholdCrossed,
    /// Axis returned to the coarse crest after the left bracket
    Recentered,
    /// Probe refinement terminated normally
    ProbeConverged,
    /// A limit switch tripped (or a trip was injected)
    LimitTripped(Side),
    /// Safety retreat finished
    RetreatComplete,
}
