//! Process-wide settings for sunwall.
//!
//! The configuration file supplies defaults that individual schedules may
//! override. It is read from `$XDG_CONFIG_HOME/sunwall/sunwall.toml` unless
//! a path is given explicitly:
//!
//! ```toml
//! debug = false              # Enable debug logging
//!
//! [location]                 # Fallback location for solar schedules
//! latitude = 40.7128         # Geographic latitude (-90 to +90)
//! longitude = -74.0060       # Geographic longitude (-180 to +180)
//! timezone = "America/New_York"
//! name = "New York"
//! region = "USA"
//! ```
//!
//! A missing file is not an error: the defaults (no location, debug off)
//! apply and solar events fall back to fixed clock times.
//!
//! ## Location precedence
//!
//! A schedule's own `[location]` wins over the one configured here; without
//! either, solar events use the fallback table.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::geo::Location;

pub mod loading;
pub mod validation;

pub use loading::get_config_path;


/// Global settings loaded from `sunwall.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub debug: Option<bool>,
    pub location: Option<Location>,
}

impl Config {
    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        loading::load()
    }

    /// Load from an explicit path; the file must exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        loading::load_from_path(path)
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    /// Log the effective settings.
    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");
        log_indented!("Debug logging: {}", self.debug_enabled());
        match &self.location {
            Some(location) => {
                log_indented!("Location: {location}");
                log_indented!("Timezone: {}", location.timezone);
            }
            None => log_indented!("Location: none (solar events use fallback times)"),
        }
    }
}
