//! Line assembly for the serial console
//!
//! Bytes arrive one at a time from the UART. A line ends at `\n` or `\r`;
//! `\r\n` pairs therefore produce one line followed by an ignored empty
//! line. Lines longer than [`MAX_LINE_LEN`] are rejected and everything up
//! to the next terminator is dropped.

use heapless::{String, Vec};

/// Maximum accepted command line length in bytes (terminator excluded)
pub const MAX_LINE_LEN: usize = 64;

/// Errors that can occur while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_LINE_LEN`]; the remainder is discarded
    TooLong,
    /// Line was not valid UTF-8
    InvalidUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Collecting bytes of the current line
    Collecting,
    /// Dropping bytes until the next terminator
    Discarding,
}

/// State machine assembling console bytes into lines
#[derive(Debug, Clone)]
pub struct LineParser {
    state: ParseState,
    buffer: Vec<u8, MAX_LINE_LEN>,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self {
            state: ParseState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Reset the parser, dropping any partial line
    pub fn reset(&mut self) {
        self.state = ParseState::Collecting;
        self.buffer.clear();
    }

    /// Number of bytes buffered for the current line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(line))` when a non-empty line is complete,
    /// `Ok(None)` when more bytes are needed, or `Err` when the current
    /// line has to be thrown away.
    pub fn feed(&mut self, byte: u8) -> Result<Option<String<MAX_LINE_LEN>>, LineError> {
        let terminator = byte == b'\n' || byte == b'\r';

        match self.state {
            ParseState::Discarding => {
                if terminator {
                    self.state = ParseState::Collecting;
                }
                Ok(None)
            }
            ParseState::Collecting if terminator => {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let bytes = core::mem::take(&mut self.buffer);
                String::from_utf8(bytes)
                    .map(Some)
                    .map_err(|_| LineError::InvalidUtf8)
            }
            ParseState::Collecting => {
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.state = ParseState::Discarding;
                    return Err(LineError::TooLong);
                }
                Ok(None)
            }
        }
    }
}
