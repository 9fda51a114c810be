//! Geographic location used to resolve solar events.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Local, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::constants::{
    DEFAULT_LOCATION_NAME, DEFAULT_LOCATION_REGION, DEFAULT_TIMEZONE, MAX_LATITUDE, MAX_LONGITUDE,
    MIN_LATITUDE, MIN_LONGITUDE,
};

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_name() -> String {
    DEFAULT_LOCATION_NAME.to_string()
}

fn default_region() -> String {
    DEFAULT_LOCATION_REGION.to_string()
}

/// Coordinates plus the IANA timezone solar times are expressed in.
///
/// Supplied either by a schedule's own `[location]` table or by the global
/// configuration as a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Geographic latitude in degrees (-90 to +90)
    pub latitude: f64,
    /// Geographic longitude in degrees (-180 to +180)
    pub longitude: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_region")]
    pub region: String,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, timezone: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            timezone: timezone.into(),
            name: default_name(),
            region: default_region(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>, region: impl Into<String>) -> Self {
        self.name = name.into();
        self.region = region.into();
        self
    }

    /// Parse the configured timezone name.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone '{}': {e}", self.timezone))
    }

    /// Reject coordinates and timezones that cannot drive solar calculations.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&self.latitude) {
            anyhow::bail!(
                "latitude must be between -90 and 90 degrees (got {})",
                self.latitude
            );
        }

        if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.longitude) {
            anyhow::bail!(
                "longitude must be between -180 and 180 degrees (got {})",
                self.longitude
            );
        }

        self.tz()
            .map_err(|e| anyhow!("timezone must be a valid IANA timezone name: {e}"))?;

        Ok(())
    }

    /// Wall-clock time at this location for the given instant.
    ///
    /// Solar times are expressed in the location's timezone, so resolution
    /// must compare against the same zone. An unparseable timezone degrades
    /// to host-local time, matching the solar fallback table.
    pub fn wall_clock(&self, now: DateTime<Local>) -> NaiveDateTime {
        match self.tz() {
            Ok(tz) => now.with_timezone(&tz).naive_local(),
            Err(_) => now.naive_local(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2}, {:.2})",
            self.name, self.latitude, self.longitude
        )
    }
}
