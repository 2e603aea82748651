//! Configuration loading
//!
//! The scanner configuration is `scanner.toml`, embedded at build time and
//! parsed at boot by the core crate's no_std parser.

pub mod loader;

pub use loader::load_config;
