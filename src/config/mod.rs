//! Configuration module
//!
//! Window geometry, input timing and logging settings, read from a TOML
//! file in the platform config directory.

#[allow(clippy::module_inception)]
pub mod config;

pub use config::Config;
