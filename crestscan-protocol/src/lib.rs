//! Crestscan operator protocol
//!
//! This crate defines the text protocol spoken over the scanner's serial
//! console. The protocol is line oriented in both directions:
//!
//! ```text
//! operator -> scanner    scan 90
//! scanner  -> operator   sweep deg=12.375 v=2.121
//! scanner  -> operator   bracket left deg=11.250 v=0.707
//! scanner  -> operator   crest v=2.121 deg=12.375 mm=0.275
//! ```
//!
//! Incoming bytes are assembled into lines by [`LineParser`] and decoded
//! into a [`Command`]. Everything the scanner says is a [`Report`], rendered
//! to a single line through its `Display` implementation.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod report;
pub mod side;

pub use command::{Command, CommandError};
pub use line::{LineError, LineParser, MAX_LINE_LEN};
pub use report::{Report, ReportLine};
pub use side::Side;
