//! Embassy async tasks
//!
//! The console RX task decodes lines and the scanner task executes them.

pub mod console_rx;
pub mod scanner;

pub use console_rx::console_rx_task;
pub use scanner::scanner_task;
