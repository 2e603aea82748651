//! Scanner state
//!
//! The scan phase state machine and the single structure holding all
//! mutable scanner state. The state machine is explicit, finite, and
//! deterministic.

pub mod events;
pub mod machine;
pub mod scanner;

pub use events::PhaseEvent;
pub use machine::Phase;
pub use scanner::ScannerState;
