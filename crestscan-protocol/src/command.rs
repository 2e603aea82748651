//! Operator commands
//!
//! | line          | command                         |
//! |---------------|---------------------------------|
//! | `scan`        | [`Command::DefaultScan`]        |
//! | `scan <deg>`  | [`Command::Scan`]               |
//! | `home`        | [`Command::ResetHome`]          |
//! | `disable`     | [`Command::DisableDriver`]      |
//! | `trip <side>` | [`Command::InjectTrip`] (tests) |
//!
//! Keywords are case-insensitive and separated by ASCII whitespace.

use crate::line::LineError;
use crate::side::Side;

/// Commands accepted on the console
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Scan the configured default range
    DefaultScan,
    /// Scan a signed range in degrees (zero selects the default range)
    Scan(f32),
    /// Return to the logical zero and clear the home offset
    ResetHome,
    /// De-energize the stepper driver until the next step
    DisableDriver,
    /// Simulate a limit switch contact (test only)
    InjectTrip(Side),
}

/// Reasons a console line was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Line contained no keyword
    Empty,
    /// First keyword is not a command
    UnknownCommand,
    /// Required argument missing
    MissingArgument,
    /// Argument could not be parsed or is not finite
    InvalidArgument,
    /// More arguments than the command takes
    TrailingInput,
    /// Line exceeded the console line buffer
    LineTooLong,
    /// Line was not valid UTF-8 text
    InvalidText,
}

impl CommandError {
    /// Short operator-facing reason
    pub fn as_str(self) -> &'static str {
        match self {
            CommandError::Empty => "empty",
            CommandError::UnknownCommand => "unknown command",
            CommandError::MissingArgument => "missing argument",
            CommandError::InvalidArgument => "invalid argument",
            CommandError::TrailingInput => "unexpected argument",
            CommandError::LineTooLong => "line too long",
            CommandError::InvalidText => "invalid text",
        }
    }
}

impl From<LineError> for CommandError {
    fn from(e: LineError) -> Self {
        match e {
            LineError::TooLong => CommandError::LineTooLong,
            LineError::InvalidUtf8 => CommandError::InvalidText,
        }
    }
}

impl Command {
    /// Parse one console line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_ascii_whitespace();
        let keyword = words.next().ok_or(CommandError::Empty)?;

        let command = if keyword.eq_ignore_ascii_case("scan") {
            match words.next() {
                None => Command::DefaultScan,
                Some(arg) => Command::Scan(parse_degrees(arg)?),
            }
        } else if keyword.eq_ignore_ascii_case("home") {
            Command::ResetHome
        } else if keyword.eq_ignore_ascii_case("disable") {
            Command::DisableDriver
        } else if keyword.eq_ignore_ascii_case("trip") {
            let arg = words.next().ok_or(CommandError::MissingArgument)?;
            let side = Side::from_keyword(arg).ok_or(CommandError::InvalidArgument)?;
            Command::InjectTrip(side)
        } else {
            return Err(CommandError::UnknownCommand);
        };

        if words.next().is_some() {
            return Err(CommandError::TrailingInput);
        }

        Ok(command)
    }

    /// Check if this command is only meant for bench testing
    pub fn is_test_only(&self) -> bool {
        matches!(self, Command::InjectTrip(_))
    }
}

fn parse_degrees(arg: &str) -> Result<f32, CommandError> {
    let degrees: f32 = arg.parse().map_err(|_| CommandError::InvalidArgument)?;
    if !degrees.is_finite() {
        return Err(CommandError::InvalidArgument);
    }
    Ok(degrees)
}
