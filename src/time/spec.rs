//! Time specifications for schedule boundaries.
//!
//! A schedule boundary is either a wall-clock time (`08:30`, `8:30 pm`) or a
//! solar event with an optional minute offset (`sunset+45m`, `SUNRISE-10`).
//! Parsing is strict: anything that does not match one of the three grammars
//! below is rejected with a [`TimeSpecError`].
//!
//! ```text
//! ABS_12H = H{1,2}:MM (am|pm)
//! ABS_24H = HH:MM[:SS]
//! SOLAR   = EVENT[(+|-)OFFSET[m]]
//! ```

use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::common::constants::{
    FALLBACK_DAWN, FALLBACK_DUSK, FALLBACK_MIDNIGHT, FALLBACK_NOON, FALLBACK_SUNRISE,
    FALLBACK_SUNSET, MAXIMUM_SOLAR_OFFSET_MINUTES,
};

static TWELVE_HOUR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<hour>\d{1,2})\s*:\s*(?P<minute>\d{2})\s*(?P<meridiem>am|pm)$")
        .expect("12-hour pattern is valid")
});

static TWENTY_FOUR_HOUR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<hour>\d{2}):(?P<minute>\d{2})(?::(?P<second>\d{2}))?$")
        .expect("24-hour pattern is valid")
});

static SOLAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<event>\w+)(?:(?P<op>[+-])(?P<offset>\d+))?m?$")
        .expect("solar pattern is valid")
});

/// Errors produced while parsing a time specification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeSpecError {
    #[error("Time specification is empty")]
    Empty,

    #[error("Invalid time format: '{0}'")]
    InvalidClockTime(String),

    #[error("Invalid time specification: '{0}'")]
    InvalidSolarSpec(String),

    #[error("Invalid solar event name: '{0}'")]
    UnknownSolarEvent(String),

    #[error("Solar offset in '{0}' is too large")]
    OffsetOutOfRange(String),
}

/// Daily solar events a schedule can anchor to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SolarEvent {
    Midnight,
    Dawn,
    Sunrise,
    Noon,
    Sunset,
    Dusk,
}

impl SolarEvent {
    pub const ALL: [SolarEvent; 6] = [
        SolarEvent::Midnight,
        SolarEvent::Dawn,
        SolarEvent::Sunrise,
        SolarEvent::Noon,
        SolarEvent::Sunset,
        SolarEvent::Dusk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SolarEvent::Midnight => "midnight",
            SolarEvent::Dawn => "dawn",
            SolarEvent::Sunrise => "sunrise",
            SolarEvent::Noon => "noon",
            SolarEvent::Sunset => "sunset",
            SolarEvent::Dusk => "dusk",
        }
    }

    /// Static clock time used when no location is known or the calculation fails.
    pub fn fallback_time(&self) -> NaiveTime {
        let (hour, minute) = match self {
            SolarEvent::Midnight => FALLBACK_MIDNIGHT,
            SolarEvent::Dawn => FALLBACK_DAWN,
            SolarEvent::Sunrise => FALLBACK_SUNRISE,
            SolarEvent::Noon => FALLBACK_NOON,
            SolarEvent::Sunset => FALLBACK_SUNSET,
            SolarEvent::Dusk => FALLBACK_DUSK,
        };
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for SolarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolarEvent {
    type Err = TimeSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        SolarEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == lowered)
            .ok_or(TimeSpecError::UnknownSolarEvent(lowered))
    }
}

/// A parsed schedule boundary.
///
/// Absolute specs carry no offset; [`TimeSpec::offset`] reports 0 for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeSpec {
    Absolute(NaiveTime),
    Solar { event: SolarEvent, offset: i32 },
}

impl TimeSpec {
    /// Parse a time specification string.
    ///
    /// Grammars are tried in order: 12-hour clock, 24-hour clock, solar event.
    /// Whitespace around the input is ignored.
    pub fn parse(text: &str) -> Result<Self, TimeSpecError> {
        let spec = text.trim();
        if spec.is_empty() {
            return Err(TimeSpecError::Empty);
        }

        let lowered = spec.to_lowercase();
        if lowered.contains("am") || lowered.contains("pm") {
            return parse_twelve_hour(spec);
        }

        if spec.contains(':') {
            return parse_twenty_four_hour(spec);
        }

        parse_solar(spec)
    }

    pub fn is_solar(&self) -> bool {
        matches!(self, TimeSpec::Solar { .. })
    }

    /// Offset in minutes; always 0 for absolute specs.
    pub fn offset(&self) -> i32 {
        match self {
            TimeSpec::Absolute(_) => 0,
            TimeSpec::Solar { offset, .. } => *offset,
        }
    }
}

impl FromStr for TimeSpec {
    type Err = TimeSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSpec::parse(s)
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSpec::Absolute(time) => write!(f, "{}", time.format("%H:%M")),
            TimeSpec::Solar { event, offset: 0 } => write!(f, "{event}"),
            TimeSpec::Solar { event, offset } => write!(f, "{event}{offset:+}"),
        }
    }
}

fn parse_twelve_hour(spec: &str) -> Result<TimeSpec, TimeSpecError> {
    let invalid = || TimeSpecError::InvalidClockTime(spec.to_string());
    let caps = TWELVE_HOUR.captures(spec).ok_or_else(invalid)?;

    let hour: u32 = caps["hour"].parse().map_err(|_| invalid())?;
    let minute: u32 = caps["minute"].parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&hour) {
        return Err(invalid());
    }

    let is_pm = caps["meridiem"].eq_ignore_ascii_case("pm");
    let hour = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
        .map(TimeSpec::Absolute)
        .ok_or_else(invalid)
}

fn parse_twenty_four_hour(spec: &str) -> Result<TimeSpec, TimeSpecError> {
    let invalid = || TimeSpecError::InvalidClockTime(spec.to_string());
    let compact: String = spec.chars().filter(|c| !c.is_whitespace()).collect();
    let caps = TWENTY_FOUR_HOUR.captures(&compact).ok_or_else(invalid)?;

    let hour: u32 = caps["hour"].parse().map_err(|_| invalid())?;
    let minute: u32 = caps["minute"].parse().map_err(|_| invalid())?;
    let second: u32 = match caps.name("second") {
        Some(s) => s.as_str().parse().map_err(|_| invalid())?,
        None => 0,
    };

    NaiveTime::from_hms_opt(hour, minute, second)
        .map(TimeSpec::Absolute)
        .ok_or_else(invalid)
}

fn parse_solar(spec: &str) -> Result<TimeSpec, TimeSpecError> {
    let caps = SOLAR
        .captures(spec)
        .ok_or_else(|| TimeSpecError::InvalidSolarSpec(spec.to_string()))?;

    let event: SolarEvent = caps["event"].parse()?;

    let magnitude: i64 = match caps.name("offset") {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| TimeSpecError::OffsetOutOfRange(spec.to_string()))?,
        None => 0,
    };
    if magnitude > MAXIMUM_SOLAR_OFFSET_MINUTES {
        return Err(TimeSpecError::OffsetOutOfRange(spec.to_string()));
    }

    let sign = match caps.name("op").map(|m| m.as_str()) {
        Some("-") => -1,
        _ => 1,
    };

    Ok(TimeSpec::Solar {
        event,
        offset: (sign * magnitude) as i32,
    })
}
