//! Inter-task communication channels
//!
//! Console lines are decoded by the RX task and handed to the scanner
//! task, which is the only writer on the console.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crestscan_protocol::{Command, CommandError};

/// Channel capacity for decoded console lines
const CONSOLE_CHANNEL_SIZE: usize = 4;

/// Decoded console lines, including rejected ones so they can be answered
pub static CONSOLE_CHANNEL: Channel<
    CriticalSectionRawMutex,
    Result<Command, CommandError>,
    CONSOLE_CHANNEL_SIZE,
> = Channel::new();
