//! Adaptive probe schedule
//!
//! The probe samples `crest - jump` and `crest + jump` each round, halving
//! `jump` after every round. It stops after a run of rounds without a gain
//! or once `jump` drops below half an atomic unit.

use crate::motion::ATOMIC_UNIT_DEG;

/// Jump sizes and termination for the probe refinement
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeSchedule {
    jump: f32,
    no_gain: u8,
    no_gain_limit: u8,
    rounds: u8,
}

impl ProbeSchedule {
    /// Jumps below this cannot reach a different atomic index
    pub const MIN_JUMP_DEG: f32 = ATOMIC_UNIT_DEG / 2.0;

    /// Create a schedule
    ///
    /// # Arguments
    /// - `initial_jump`: First offset from the crest in degrees
    /// - `no_gain_limit`: Consecutive rounds without gain that end the probe
    pub fn new(initial_jump: f32, no_gain_limit: u8) -> Self {
        Self {
            jump: initial_jump,
            no_gain: 0,
            no_gain_limit,
            rounds: 0,
        }
    }

    /// Offset for the next round, or `None` when the probe is finished
    pub fn next_jump(&self) -> Option<f32> {
        if self.no_gain >= self.no_gain_limit || self.jump < Self::MIN_JUMP_DEG {
            None
        } else {
            Some(self.jump)
        }
    }

    /// Close the current round
    pub fn finish_round(&mut self, gained: bool) {
        if gained {
            self.no_gain = 0;
        } else {
            self.no_gain = self.no_gain.saturating_add(1);
        }
        self.jump /= 2.0;
        self.rounds = self.rounds.saturating_add(1);
    }

    /// Rounds completed so far
    pub fn rounds(&self) -> u8 {
        self.rounds
    }

    /// Consecutive rounds without gain
    pub fn no_gain(&self) -> u8 {
        self.no_gain
    }
}
