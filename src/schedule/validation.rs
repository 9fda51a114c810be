//! Merged validation report for a schedule and its pack directory.
//!
//! Errors block a pack from being used; warnings are advisory. Messages are
//! tagged with a check id so a caller can drop or regroup a whole check.

use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

use super::{Schedule, ScheduleEntries, ScheduleType, WEEKDAYS, analyze_coverage, weekday_name};
use crate::geo::{Location, SolarCalculator};

pub const CHECK_STRUCTURE: &str = "structure";
pub const CHECK_IMAGES: &str = "images";
pub const CHECK_LOCATION: &str = "location";
pub const CHECK_COVERAGE: &str = "coverage";
pub const CHECK_DAYS: &str = "days";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMessage {
    pub check: String,
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    messages: Vec<ValidationMessage>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, check: &str, level: Level, message: impl Into<String>) {
        self.messages.push(ValidationMessage {
            check: check.to_string(),
            level,
            message: message.into(),
        });
    }

    /// Drop every message produced by `check`.
    pub fn remove(&mut self, check: &str) {
        self.messages.retain(|m| m.check != check);
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.messages.extend(other.messages);
    }

    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    /// Error messages grouped by check, in first-seen order.
    pub fn errors(&self) -> Vec<(&str, Vec<&str>)> {
        self.grouped(Level::Error)
    }

    /// Warning messages grouped by check, in first-seen order.
    pub fn warnings(&self) -> Vec<(&str, Vec<&str>)> {
        self.grouped(Level::Warning)
    }

    pub fn passed(&self) -> bool {
        !self.messages.iter().any(|m| m.level == Level::Error)
    }

    pub fn failed(&self) -> bool {
        !self.passed()
    }

    fn grouped(&self, level: Level) -> Vec<(&str, Vec<&str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for message in self.messages.iter().filter(|m| m.level == level) {
            match groups.iter_mut().find(|(check, _)| *check == message.check) {
                Some((_, list)) => list.push(message.message.as_str()),
                None => groups.push((message.check.as_str(), vec![message.message.as_str()])),
            }
        }
        groups
    }
}

/// Validate `schedule` against the pack at `base_path`.
///
/// `location` is the effective location (schedule override or global);
/// coverage is evaluated on `date`.
pub fn validate_schedule(
    solar: &SolarCalculator,
    schedule: &Schedule,
    base_path: &Path,
    location: Option<&Location>,
    date: NaiveDate,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    if schedule.meta.kind != schedule.entries.kind() {
        result.add(
            CHECK_STRUCTURE,
            Level::Error,
            format!(
                "Schedule type '{}' does not match its {} entries",
                schedule.meta.kind,
                schedule.entries.kind()
            ),
        );
    }

    match &schedule.entries {
        ScheduleEntries::Timeblocks(blocks) => {
            if blocks.is_empty() {
                result.add(
                    CHECK_STRUCTURE,
                    Level::Error,
                    "Timeblock schedule must contain at least one timeblock",
                );
            }

            for block in blocks {
                if block.images.is_empty() {
                    result.add(
                        CHECK_IMAGES,
                        Level::Error,
                        format!("Timeblock '{}' has no images", block.name),
                    );
                }
                for image in &block.images {
                    if !base_path.join(image).exists() {
                        result.add(
                            CHECK_IMAGES,
                            Level::Error,
                            format!("Image {} not found in pack", image.display()),
                        );
                    }
                }
            }

            if location.is_none() && blocks.iter().any(|block| block.is_solar()) {
                result.add(
                    CHECK_LOCATION,
                    Level::Warning,
                    "Solar timeblocks without location data will use fallback times",
                );
            }

            if schedule.meta.kind == ScheduleType::Timeblocks {
                for warning in analyze_coverage(solar, schedule, location, date) {
                    result.add(CHECK_COVERAGE, Level::Warning, warning.to_string());
                }
            }
        }
        ScheduleEntries::Days(days) => {
            if days.is_empty() {
                result.add(
                    CHECK_STRUCTURE,
                    Level::Error,
                    "Day-based schedule must contain at least one day entry",
                );
                return result;
            }

            for (day, entry) in days {
                if entry.images.is_empty() {
                    result.add(
                        CHECK_IMAGES,
                        Level::Error,
                        format!("Day '{}' has no images", weekday_name(*day)),
                    );
                }
                for image in &entry.images {
                    if !base_path.join(image).exists() {
                        result.add(
                            CHECK_IMAGES,
                            Level::Error,
                            format!("Day image {} not found in pack", image.display()),
                        );
                    }
                }
            }

            let missing: Vec<&str> = WEEKDAYS
                .iter()
                .filter(|(weekday, _)| !days.iter().any(|(day, _)| day == weekday))
                .map(|(_, name)| *name)
                .collect();
            if !missing.is_empty() {
                result.add(
                    CHECK_DAYS,
                    Level::Warning,
                    format!("Schedule does not define: {}", missing.join(", ")),
                );
            }
        }
    }

    result
}
