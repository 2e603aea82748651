//! Scanner reports
//!
//! Reports are everything the scanner writes back to the operator: the
//! progress stream produced while sweeping and searching, the terminal
//! summary of a scan, and acknowledgements of the other commands. Each
//! report renders as exactly one line without terminator.

use core::fmt::{self, Write};

use heapless::String;

use crate::command::CommandError;
use crate::side::Side;

/// Capacity of a rendered report line
pub const MAX_REPORT_LEN: usize = 96;

/// A rendered report line
pub type ReportLine = String<MAX_REPORT_LEN>;

/// Messages from the scanner to the operator
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// Filtered coarse sweep sample
    Sweep { degree: f32, voltage: f32 },
    /// Half-max bracketing sample
    Bracket {
        side: Side,
        degree: f32,
        voltage: f32,
    },
    /// Sample taken after returning to the coarse crest
    Recenter { degree: f32, voltage: f32 },
    /// Adaptive probe sample
    Probe {
        jump: f32,
        degree: f32,
        voltage: f32,
    },
    /// Scan finished with a crest
    Crest {
        voltage: f32,
        degree: f32,
        displacement_mm: f32,
    },
    /// Scan or idle axis aborted by a limit trip and retreat
    Aborted { side: Side, retreat_deg: f32 },
    /// Axis returned to the logical zero
    HomeReset { travelled_deg: f32 },
    /// Home reset requested with no offset to undo
    HomeIdle,
    /// Stepper driver de-energized
    DriverDisabled,
    /// Console line rejected
    Rejected(CommandError),
}

impl Report {
    /// Check if this report belongs to the progress stream
    pub fn is_progress(&self) -> bool {
        matches!(
            self,
            Report::Sweep { .. }
                | Report::Bracket { .. }
                | Report::Recenter { .. }
                | Report::Probe { .. }
        )
    }

    /// Check if this report ends a scan
    pub fn is_terminal(&self) -> bool {
        matches!(self, Report::Crest { .. } | Report::Aborted { .. })
    }

    /// Render this report into a fixed-capacity line
    pub fn to_line(&self) -> Result<ReportLine, fmt::Error> {
        let mut line = ReportLine::new();
        write!(line, "{}", self)?;
        Ok(line)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Report::Sweep { degree, voltage } => {
                write!(f, "sweep deg={:.3} v={:.3}", degree, voltage)
            }
            Report::Bracket {
                side,
                degree,
                voltage,
            } => write!(
                f,
                "bracket {} deg={:.3} v={:.3}",
                side.as_str(),
                degree,
                voltage
            ),
            Report::Recenter { degree, voltage } => {
                write!(f, "recenter deg={:.3} v={:.3}", degree, voltage)
            }
            Report::Probe {
                jump,
                degree,
                voltage,
            } => write!(
                f,
                "probe jump={:.4} deg={:.3} v={:.3}",
                jump, degree, voltage
            ),
            Report::Crest {
                voltage,
                degree,
                displacement_mm,
            } => write!(
                f,
                "crest v={:.3} deg={:.3} mm={:.3}",
                voltage, degree, displacement_mm
            ),
            Report::Aborted { side, retreat_deg } => {
                write!(f, "abort {} retreat={:.1}deg", side.as_str(), retreat_deg)
            }
            Report::HomeReset { travelled_deg } => write!(f, "home deg={:.3}", travelled_deg),
            Report::HomeIdle => f.write_str("home idle"),
            Report::DriverDisabled => f.write_str("driver disabled"),
            Report::Rejected(err) => write!(f, "error {}", err.as_str()),
        }
    }
}
