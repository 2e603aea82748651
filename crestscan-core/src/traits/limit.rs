//! Limit switch trait

use crestscan_protocol::Side;

/// Trait for the pair of travel-limit switches
///
/// The scan logic polls this after every atomic step rather than relying
/// on interrupts, so a contact is seen at most one step late.
pub trait LimitSwitches {
    /// Return the side whose switch is currently in contact, if any
    ///
    /// When both switches read active the left side is reported.
    fn triggered(&mut self) -> Option<Side>;
}
