//! # Sunwall Library
//!
//! Resolves which wallpaper a schedule calls for at any instant. Schedules
//! mix fixed clock times with solar events (`sunrise`, `sunset+30`, ...)
//! resolved against a geographic location, and rotate through images either
//! by time block or by weekday.
//!
//! ## Architecture
//!
//! - **Time specs**: `time::spec` parses schedule boundaries; `time::source`
//!   provides the overridable "now"
//! - **Geographic**: `geo` holds the `Location` value and the caching
//!   `SolarCalculator` with its fallback table
//! - **Schedules**: `schedule` contains the data model, TOML loading, the
//!   resolution engine, coverage analysis and validation
//! - **Configuration**: `config` for the global fallback location and flags
//! - **Infrastructure**: `logger` macros, `args` parsing for the inspector binary
//!
//! Setting the wallpaper and invoking resolution periodically are left to the
//! caller; this crate only answers "what should be showing, and until when".

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod common;
pub mod config;
pub mod geo;
pub mod schedule;
pub mod time;

pub use geo::{Location, SolarCalculator};
pub use schedule::{Lookup, Schedule, ScheduleEngine, Wallpaper};
pub use time::{SolarEvent, TimeSpec};
