//! Scan phase state machine
//!
//! Every scan walks `Idle → CoarseSweep → FineBracketLeft → FineRecenter →
//! FineBracketRight → FineProbe → Idle`, or leaves any moving phase for
//! `Retreating` on a limit trip and then returns to `Idle`.

use super::events::PhaseEvent;

/// Scan phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No scan active, accepting commands
    Idle,
    /// Stepping across the full range tracking the running maximum
    CoarseSweep,
    /// Backing off the tripped limit
    Retreating,
    /// Walking left until the half-max threshold
    FineBracketLeft,
    /// Returning to the coarse crest
    FineRecenter,
    /// Walking right until the half-max threshold
    FineBracketRight,
    /// Adaptive probe refinement around the crest
    FineProbe,
}

impl Phase {
    /// Check if a scan is in progress
    pub fn is_scanning(&self) -> bool {
        !matches!(self, Phase::Idle | Phase::Retreating)
    }

    /// Process an event and return the next phase
    pub fn transition(self, event: PhaseEvent) -> Self {
        use Phase::*;
        use PhaseEvent::*;

        match (self, event) {
            // Idle transitions
            (Idle, ScanRequested) => CoarseSweep,
            (Idle, LimitTripped(_)) => Retreating,

            // Search progression
            (CoarseSweep, SweepComplete) => FineBracketLeft,
            (FineBracketLeft, ThresholdCrossed) => FineRecenter,
            (FineRecenter, Recentered) => FineBracketRight,
            (FineBracketRight, ThresholdCrossed) => FineProbe,
            (FineProbe, ProbeConverged) => Idle,

            // Any trip during a scan aborts into the retreat
            (CoarseSweep | FineBracketLeft | FineRecenter | FineBracketRight | FineProbe,
                LimitTripped(_)) => Retreating,

            (Retreating, RetreatComplete) => Idle,

            // Default: stay in current phase
            _ => self,
        }
    }
}
