//! Schedule definition parsing.
//!
//! Definitions are TOML documents with a `[meta]` section and either a
//! `[timeblocks]` or a `[days]` table. Tables are read in document order so
//! that block and day order survives into the [`Schedule`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml::{Table, Value};

use super::{
    DaySchedule, Schedule, ScheduleEntries, ScheduleMeta, ScheduleType, TimeBlock, parse_weekday,
    weekday_name,
};
use crate::common::constants::DEFAULT_SCHEDULE_VERSION;
use crate::geo::Location;
use crate::time::{TimeSpec, TimeSpecError};

/// Errors that abort loading a single schedule definition.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Failed to parse schedule definition: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Missing required section [{0}]")]
    MissingSection(&'static str),

    #[error("Missing required field '{field}' in {section}")]
    MissingField {
        section: String,
        field: &'static str,
    },

    #[error("Unknown schedule type: '{0}' (expected 'timeblocks' or 'days')")]
    UnknownScheduleType(String),

    #[error("Invalid {field} time in timeblock '{block}': {source}")]
    InvalidTimeSpec {
        block: String,
        field: &'static str,
        #[source]
        source: TimeSpecError,
    },

    #[error("Invalid entry {section}: {reason}")]
    InvalidEntry { section: String, reason: String },

    #[error("Unknown weekday '{0}' (use full English names such as 'monday')")]
    UnknownWeekday(String),

    #[error("Weekday '{0}' is defined more than once")]
    DuplicateWeekday(String),

    #[error("Invalid [location] section: {0}")]
    InvalidLocation(String),
}

#[derive(Debug, Deserialize)]
struct RawMeta {
    #[serde(rename = "type")]
    kind: Option<String>,
    name: Option<String>,
    author: Option<String>,
    description: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTimeBlock {
    start: Option<String>,
    end: Option<String>,
    images: Option<Vec<String>>,
    #[serde(default)]
    shuffle: bool,
}

#[derive(Debug, Deserialize)]
struct RawDay {
    images: Option<Vec<String>>,
    #[serde(default)]
    shuffle: bool,
}

impl Schedule {
    /// Parse a schedule definition from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ScheduleError> {
        let mut document: Table = toml::from_str(content)?;

        let meta = parse_meta(document.remove("meta"))?;
        log_debug!("Parsed [meta]: {meta} ({})", meta.kind);

        let entries = match meta.kind {
            ScheduleType::Timeblocks => {
                let section = take_table(&mut document, "timeblocks")?;
                let blocks = parse_timeblocks(section)?;
                log_debug!("Parsed [timeblocks]: {} blocks", blocks.len());
                ScheduleEntries::Timeblocks(blocks)
            }
            ScheduleType::Days => {
                let section = take_table(&mut document, "days")?;
                let days = parse_days(section)?;
                log_debug!("Parsed [days]: {} entries", days.len());
                ScheduleEntries::Days(days)
            }
        };

        let location = match document.remove("location") {
            Some(value) => {
                let location: Location = value.try_into().map_err(|e: toml::de::Error| {
                    ScheduleError::InvalidLocation(e.message().to_string())
                })?;
                location
                    .validate()
                    .map_err(|e| ScheduleError::InvalidLocation(e.to_string()))?;
                log_debug!("Parsed [location]: {location}");
                Some(location)
            }
            None => None,
        };

        Ok(Schedule {
            meta,
            entries,
            location,
        })
    }
}

/// Read and parse a schedule definition file.
pub fn load_from_path(path: &Path) -> Result<Schedule> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule from {}", path.display()))?;

    Schedule::from_toml_str(&content)
        .with_context(|| format!("Failed to load schedule from {}", path.display()))
}

fn take_table(document: &mut Table, section: &'static str) -> Result<Table, ScheduleError> {
    match document.remove(section) {
        Some(Value::Table(table)) => Ok(table),
        Some(other) => Err(ScheduleError::InvalidEntry {
            section: format!("[{section}]"),
            reason: format!("expected a table, found {}", other.type_str()),
        }),
        None => Err(ScheduleError::MissingSection(section)),
    }
}

fn parse_meta(value: Option<Value>) -> Result<ScheduleMeta, ScheduleError> {
    let raw: RawMeta = value.ok_or(ScheduleError::MissingSection("meta"))?.try_into()?;

    let missing = |field| ScheduleError::MissingField {
        section: "[meta]".to_string(),
        field,
    };

    let kind = match raw.kind.ok_or_else(|| missing("type"))?.as_str() {
        "timeblocks" => ScheduleType::Timeblocks,
        "days" => ScheduleType::Days,
        other => return Err(ScheduleError::UnknownScheduleType(other.to_string())),
    };

    Ok(ScheduleMeta {
        kind,
        name: raw.name.ok_or_else(|| missing("name"))?,
        author: raw.author,
        description: raw.description,
        version: raw
            .version
            .unwrap_or_else(|| DEFAULT_SCHEDULE_VERSION.to_string()),
    })
}

fn parse_timeblocks(section: Table) -> Result<Vec<TimeBlock>, ScheduleError> {
    section
        .into_iter()
        .map(|(name, value)| -> Result<TimeBlock, ScheduleError> {
            let location = format!("[timeblocks.{name}]");
            if !value.is_table() {
                return Err(ScheduleError::InvalidEntry {
                    section: location,
                    reason: format!("expected a table, found {}", value.type_str()),
                });
            }

            let raw: RawTimeBlock = value.try_into()?;
            let missing = |field| ScheduleError::MissingField {
                section: location.clone(),
                field,
            };

            let start = raw.start.ok_or_else(|| missing("start"))?;
            let end = raw.end.ok_or_else(|| missing("end"))?;
            let images = raw.images.ok_or_else(|| missing("images"))?;

            let spec = |text: &str, field| {
                TimeSpec::parse(text).map_err(|source| ScheduleError::InvalidTimeSpec {
                    block: name.clone(),
                    field,
                    source,
                })
            };

            Ok(TimeBlock {
                start: spec(&start, "start")?,
                end: spec(&end, "end")?,
                images: images.into_iter().map(PathBuf::from).collect(),
                shuffle: raw.shuffle,
                name,
            })
        })
        .collect()
}

fn parse_days(section: Table) -> Result<Vec<(chrono::Weekday, DaySchedule)>, ScheduleError> {
    let mut days: Vec<(chrono::Weekday, DaySchedule)> = Vec::with_capacity(section.len());

    for (key, value) in section {
        let weekday = parse_weekday(&key).ok_or_else(|| ScheduleError::UnknownWeekday(key.clone()))?;
        if days.iter().any(|(day, _)| *day == weekday) {
            return Err(ScheduleError::DuplicateWeekday(
                weekday_name(weekday).to_string(),
            ));
        }

        let entry = match value {
            // Shorthand: a bare path is a single-image day
            Value::String(image) => DaySchedule {
                images: vec![PathBuf::from(image)],
                shuffle: false,
            },
            Value::Table(table) => {
                let raw: RawDay = Value::Table(table).try_into()?;
                let images = raw.images.ok_or_else(|| ScheduleError::MissingField {
                    section: format!("[days.{key}]"),
                    field: "images",
                })?;
                DaySchedule {
                    images: images.into_iter().map(PathBuf::from).collect(),
                    shuffle: raw.shuffle,
                }
            }
            other => {
                return Err(ScheduleError::InvalidEntry {
                    section: format!("[days.{key}]"),
                    reason: format!("expected an image path or a table, found {}", other.type_str()),
                });
            }
        };

        days.push((weekday, entry));
    }

    Ok(days)
}
