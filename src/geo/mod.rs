//! Geographic location and solar event calculations.
//!
//! ## Module Structure
//!
//! - [`location`]: Coordinates and timezone a schedule is resolved against
//! - [`solar`]: Solar event times with static fallback and per-instance caching
//!
//! Solar times are always expressed as wall-clock times in the location's
//! timezone. When no location is available every event maps to a fixed time
//! of day (see [`crate::time::SolarEvent::fallback_time`]).

pub mod location;
pub mod solar;

pub use location::Location;
pub use solar::SolarCalculator;
