//! Configuration module for esp-certkit
//!
//! Handles loading settings from TOML files.

pub mod settings;

pub use settings::{GenerateSettings, PathSettings, Settings, ToolSettings};

use crate::utils::ConfigError;
use std::path::Path;

/// Load settings from an explicit file, or from the default location if none was given
pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    match path {
        Some(path) => Settings::load_from_file(path),
        None => Settings::load_default(),
    }
}
