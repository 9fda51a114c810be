//! Application constants and default values for sunwall.
//!
//! Fallback solar times, schedule defaults, validation limits and exit codes
//! used throughout the crate.

// ═══ Solar Fallbacks ═══
// Clock times (hour, minute) used when no location is available or the
// astronomical calculation fails

pub const FALLBACK_MIDNIGHT: (u32, u32) = (0, 0);
pub const FALLBACK_DAWN: (u32, u32) = (5, 0);
pub const FALLBACK_SUNRISE: (u32, u32) = (6, 30);
pub const FALLBACK_NOON: (u32, u32) = (12, 0);
pub const FALLBACK_SUNSET: (u32, u32) = (18, 30);
pub const FALLBACK_DUSK: (u32, u32) = (19, 30);

// ═══ Schedule Defaults ═══

pub const DEFAULT_SCHEDULE_VERSION: &str = "1.0";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_LOCATION_NAME: &str = "location";
pub const DEFAULT_LOCATION_REGION: &str = "region";

// ═══ Coverage Analysis ═══

pub const COVERAGE_TOLERANCE_MINUTES: i64 = 1; // gaps at or below this are ignored
pub const MINUTES_PER_DAY: i64 = 24 * 60;

// ═══ Validation Limits ═══

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;
pub const MAXIMUM_SOLAR_OFFSET_MINUTES: i64 = i32::MAX as i64; // offsets are stored as i32 minutes

// ═══ Files ═══

pub const CONFIG_DIR_NAME: &str = "sunwall";
pub const CONFIG_FILE_NAME: &str = "sunwall.toml";

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1;
