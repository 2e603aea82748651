//! Configuration types
//!
//! Board-agnostic configuration structures, loaded from `scanner.toml`
//! by the minimal parser in [`toml`].

pub mod hardware;
pub mod toml;
pub mod types;

pub use hardware::*;
pub use toml::{parse_config, ParseError};
pub use types::*;
