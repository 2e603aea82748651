//! Travel sides of the scanner axis

/// One end of the scanner's travel
///
/// `Left` is the negative end of the axis, `Right` the positive end. The
/// same identifier names a limit switch, a half-max bracket and a trip
/// injection target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    /// Negative end of travel
    Left,
    /// Positive end of travel
    Right,
}

impl Side {
    /// Parse a side from its console keyword (case-insensitive)
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("left") {
            Some(Side::Left)
        } else if word.eq_ignore_ascii_case("right") {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Console keyword for this side
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}
