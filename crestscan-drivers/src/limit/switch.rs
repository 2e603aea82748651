//! Travel-limit switch pair
//!
//! Two digital inputs, one at each end of travel. Most builds use
//! normally-open switches to ground with a pull-up, which read LOW on
//! contact.

use crestscan_core::config::LimitHwConfig;
use crestscan_core::traits::LimitSwitches;
use crestscan_core::Side;
use embedded_hal::digital::InputPin;

/// Left and right limit inputs
pub struct LimitSwitchPair<L, R> {
    left: L,
    right: R,
    active_low: bool,
}

impl<L: InputPin, R: InputPin> LimitSwitchPair<L, R> {
    /// Create a switch pair
    pub fn new(left: L, right: R, config: &LimitHwConfig) -> Self {
        Self {
            left,
            right,
            active_low: config.active_low,
        }
    }

    /// Release the input pins
    pub fn release(self) -> (L, R) {
        (self.left, self.right)
    }
}

/// Read one input, treating a read error as no contact
fn is_active<P: InputPin>(pin: &mut P, active_low: bool) -> bool {
    let level = if active_low { pin.is_low() } else { pin.is_high() };
    level.unwrap_or(false)
}

impl<L: InputPin, R: InputPin> LimitSwitches for LimitSwitchPair<L, R> {
    fn triggered(&mut self) -> Option<Side> {
        if is_active(&mut self.left, self.active_low) {
            Some(Side::Left)
        } else if is_active(&mut self.right, self.active_low) {
            Some(Side::Right)
        } else {
            None
        }
    }
}
