//! Wallpaper schedules: data model, loading, resolution and validation.
//!
//! A schedule is either a set of named time blocks (`type = "timeblocks"`),
//! each bounded by two [`TimeSpec`]s, or a set of weekday entries
//! (`type = "days"`). Each block or day carries an ordered list of image
//! references relative to the pack directory.
//!
//! ```toml
//! [meta]
//! type = "timeblocks"
//! name = "Coastal"
//! author = "someone"
//! version = "1.2"
//!
//! [timeblocks.morning]
//! start = "sunrise"
//! end = "noon"
//! images = ["morning_1.jpg", "morning_2.jpg"]
//!
//! [timeblocks.night]
//! start = "dusk+15"
//! end = "sunrise"
//! images = ["night.jpg"]
//! shuffle = true
//!
//! [location]
//! latitude = 40.7128
//! longitude = -74.0060
//! timezone = "America/New_York"
//! ```
//!
//! ## Module Structure
//!
//! - [`loading`]: TOML definition parsing with typed errors
//! - [`engine`]: current/next block and wallpaper resolution
//! - [`coverage`]: gap, overlap and 24-hour coverage analysis
//! - [`validation`]: merged error/warning report for a schedule and its pack
//!
//! Schedules are immutable once built; every consumer is a pure reader.

use chrono::Weekday;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::geo::Location;
use crate::time::TimeSpec;

pub mod coverage;
pub mod engine;
pub mod loading;
pub mod validation;

pub use coverage::{CoverageWarning, analyze_coverage};
pub use engine::{Interval, Lookup, ScheduleEngine, Wallpaper, WallpaperSource};
pub use loading::{ScheduleError, load_from_path};
pub use validation::{Level, ValidationMessage, ValidationResult, validate_schedule};

#[cfg(test)]
mod tests;

/// Weekdays in display order, paired with their schedule key.
pub const WEEKDAYS: [(Weekday, &str); 7] = [
    (Weekday::Mon, "monday"),
    (Weekday::Tue, "tuesday"),
    (Weekday::Wed, "wednesday"),
    (Weekday::Thu, "thursday"),
    (Weekday::Fri, "friday"),
    (Weekday::Sat, "saturday"),
    (Weekday::Sun, "sunday"),
];

/// Lowercase full English name used as a schedule key.
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAYS[day.num_days_from_monday() as usize].1
}

/// Parse a full English weekday name, ignoring case.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let lowered = name.trim().to_lowercase();
    WEEKDAYS
        .iter()
        .find(|(_, key)| *key == lowered)
        .map(|(day, _)| *day)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    Timeblocks,
    Days,
}

impl ScheduleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::Timeblocks => "timeblocks",
            ScheduleType::Days => "days",
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `[meta]` section of a schedule definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleMeta {
    pub kind: ScheduleType,
    pub name: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub version: String,
}

impl fmt::Display for ScheduleMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)?;
        if let Some(author) = &self.author {
            write!(f, " by {author}")?;
        }
        Ok(())
    }
}

/// A named time-of-day interval with its candidate images.
///
/// When `end` resolves at or before `start` on the same date the block
/// crosses midnight and ends on the following day.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBlock {
    pub name: String,
    pub start: TimeSpec,
    pub end: TimeSpec,
    pub images: Vec<PathBuf>,
    pub shuffle: bool,
}

impl TimeBlock {
    /// True when either boundary depends on a solar event.
    pub fn is_solar(&self) -> bool {
        self.start.is_solar() || self.end.is_solar()
    }
}

impl fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} to {} ({} images)",
            self.name,
            self.start,
            self.end,
            self.images.len()
        )
    }
}

/// Images shown on one weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub images: Vec<PathBuf>,
    pub shuffle: bool,
}

impl fmt::Display for DaySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} images", self.images.len())?;
        if self.shuffle {
            f.write_str(" (shuffled)")?;
        }
        Ok(())
    }
}

/// Schedule body. Exactly one kind of entry is ever populated, in
/// definition order.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleEntries {
    Timeblocks(Vec<TimeBlock>),
    Days(Vec<(Weekday, DaySchedule)>),
}

impl ScheduleEntries {
    pub fn kind(&self) -> ScheduleType {
        match self {
            ScheduleEntries::Timeblocks(_) => ScheduleType::Timeblocks,
            ScheduleEntries::Days(_) => ScheduleType::Days,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ScheduleEntries::Timeblocks(blocks) => blocks.len(),
            ScheduleEntries::Days(days) => days.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A parsed wallpaper schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub meta: ScheduleMeta,
    pub entries: ScheduleEntries,
    /// Per-schedule override of the global location
    pub location: Option<Location>,
}

impl Schedule {
    /// Time blocks in definition order; empty for day-based schedules.
    pub fn timeblocks(&self) -> &[TimeBlock] {
        match &self.entries {
            ScheduleEntries::Timeblocks(blocks) => blocks,
            ScheduleEntries::Days(_) => &[],
        }
    }

    /// Day entries in definition order; empty for block-based schedules.
    pub fn days(&self) -> &[(Weekday, DaySchedule)] {
        match &self.entries {
            ScheduleEntries::Days(days) => days,
            ScheduleEntries::Timeblocks(_) => &[],
        }
    }

    pub fn block(&self, name: &str) -> Option<&TimeBlock> {
        self.timeblocks().iter().find(|block| block.name == name)
    }

    pub fn day(&self, weekday: Weekday) -> Option<&DaySchedule> {
        self.days()
            .iter()
            .find(|(day, _)| *day == weekday)
            .map(|(_, entry)| entry)
    }

    /// Location used for resolution: the schedule's own, else `global`.
    pub fn location_or<'a>(&'a self, global: Option<&'a Location>) -> Option<&'a Location> {
        self.location.as_ref().or(global)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {}",
            self.meta.name,
            self.entries.len(),
            self.entries.kind()
        )
    }
}
