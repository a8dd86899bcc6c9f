//! SLM Quote Settings Crate
//!
//! Handles the persisted quoting configuration: file formats, default
//! location, material presets and command-line overrides.

pub mod config;
pub mod error;

pub use config::{BatchSettings, Config, ConfigFormat, APP_DIR, CONFIG_FILE};
pub use error::{SettingsError, SettingsResult};
