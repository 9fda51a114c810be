//! Coverage analysis for time-block schedules.
//!
//! Blocks are anchored to a single date, sorted by start, and each adjacent
//! pair is compared, including the wrap from the last block back to the
//! first block of the following day. Findings are advisory only.

use chrono::{Duration, NaiveDate};
use std::fmt;

use super::Schedule;
use super::engine::anchor_block;
use crate::common::constants::{COVERAGE_TOLERANCE_MINUTES, MINUTES_PER_DAY};
use crate::geo::{Location, SolarCalculator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageWarning {
    /// `first` is still running when `second` starts
    Overlap {
        first: String,
        second: String,
        minutes: i64,
    },
    /// Nothing is scheduled between `after` ending and `before` starting
    Gap {
        after: String,
        before: String,
        minutes: i64,
        wraparound: bool,
    },
    /// Summed block durations differ from a full day
    IncompleteCoverage { covered_minutes: i64 },
}

impl fmt::Display for CoverageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageWarning::Overlap {
                first,
                second,
                minutes,
            } => write!(
                f,
                "Timeblocks '{first}' and '{second}' overlap by {minutes} minutes"
            ),
            CoverageWarning::Gap {
                after,
                before,
                minutes,
                wraparound: false,
            } => write!(
                f,
                "Gap detected between '{after}' and '{before}' ({minutes} minutes)"
            ),
            CoverageWarning::Gap {
                after,
                before,
                minutes,
                wraparound: true,
            } => write!(
                f,
                "Gap detected between end of last block '{after}' and start of first block '{before}' ({minutes} minutes)"
            ),
            CoverageWarning::IncompleteCoverage { covered_minutes } => write!(
                f,
                "Schedule covers {}h {:02}m of 24 hours",
                covered_minutes / 60,
                covered_minutes % 60
            ),
        }
    }
}

/// Check a time-block schedule for overlaps, gaps and incomplete coverage
/// on `date`. Day-based and empty schedules produce no warnings.
pub fn analyze_coverage(
    solar: &SolarCalculator,
    schedule: &Schedule,
    location: Option<&Location>,
    date: NaiveDate,
) -> Vec<CoverageWarning> {
    let mut anchored: Vec<_> = schedule
        .timeblocks()
        .iter()
        .map(|block| (block.name.as_str(), anchor_block(solar, block, date, location)))
        .collect();
    if anchored.is_empty() {
        return Vec::new();
    }

    // Stable sort keeps definition order for equal starts
    anchored.sort_by_key(|(_, interval)| interval.start);

    let tolerance = Duration::minutes(COVERAGE_TOLERANCE_MINUTES);
    let mut warnings = Vec::new();

    for (i, (name, interval)) in anchored.iter().enumerate() {
        let wraparound = i + 1 == anchored.len();
        let (next_name, next_start) = if wraparound {
            (anchored[0].0, anchored[0].1.start + Duration::days(1))
        } else {
            (anchored[i + 1].0, anchored[i + 1].1.start)
        };

        if interval.end > next_start {
            warnings.push(CoverageWarning::Overlap {
                first: name.to_string(),
                second: next_name.to_string(),
                minutes: (interval.end - next_start).num_minutes(),
            });
        } else if next_start - interval.end > tolerance {
            warnings.push(CoverageWarning::Gap {
                after: name.to_string(),
                before: next_name.to_string(),
                minutes: (next_start - interval.end).num_minutes(),
                wraparound,
            });
        }
    }

    let covered: i64 = anchored
        .iter()
        .map(|(_, interval)| interval.duration().num_minutes())
        .sum();
    if (covered - MINUTES_PER_DAY).abs() > COVERAGE_TOLERANCE_MINUTES {
        warnings.push(CoverageWarning::IncompleteCoverage {
            covered_minutes: covered,
        });
    }

    warnings
}
