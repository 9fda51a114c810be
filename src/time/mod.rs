//! Time handling: boundary specifications and the process clock.
//!
//! - [`spec`]: parsing of clock-time and solar-event boundaries
//! - [`source`]: the overridable "now" used by the binary

pub mod source;
pub mod spec;

pub use spec::{SolarEvent, TimeSpec, TimeSpecError};
