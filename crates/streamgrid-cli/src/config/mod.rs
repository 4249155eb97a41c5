//! Application configuration module.
//!
//! Manages the TOML config file holding the sources location, validation
//! policy, page settings and the earthquake feed settings.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
