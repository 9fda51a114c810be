//! Solar event resolution with fallback and memoization.
//!
//! [`SolarCalculator`] turns a [`SolarEvent`] on a given date into a
//! wall-clock time at a [`Location`]. Without a location, or whenever the
//! astronomical calculation cannot produce an answer (unknown timezone,
//! invalid coordinates, polar day/night), the static fallback table is used
//! instead. The calculator never returns an error to its caller.
//!
//! Dawn and dusk are civil twilight (sun 6° below the horizon). Noon is the
//! midpoint between sunrise and sunset. Midnight has no astronomical
//! definition and is always 00:00.
//!
//! Each calculator owns its cache and its set of already-reported failures;
//! nothing is shared between instances. The interior mutability makes the
//! type `!Sync`, so concurrent use needs one calculator per thread.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use sunrise::{Coordinates, DawnType, SolarDay, SolarEvent as SunEvent};
use thiserror::Error;

use crate::geo::Location;
use crate::time::{SolarEvent, TimeSpec};

/// Why a solar calculation fell back to the static table.
#[derive(Error, Debug, Clone, PartialEq)]
enum SolarFailure {
    #[error("Invalid timezone '{0}' for solar calculations")]
    InvalidTimezone(String),

    #[error("Invalid coordinates ({latitude}, {longitude}) for solar calculations")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("No {event} at ({latitude:.4}, {longitude:.4}) on {date} (polar day or night)")]
    NoEvent {
        event: SolarEvent,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
    },
}

impl SolarFailure {
    /// Key identifying the underlying cause, so a cause is reported only once
    /// no matter how many events or dates run into it.
    fn cause_key(&self) -> String {
        match self {
            SolarFailure::InvalidTimezone(tz) => format!("timezone:{tz}"),
            SolarFailure::InvalidCoordinates {
                latitude,
                longitude,
            } => format!("coordinates:{latitude},{longitude}"),
            SolarFailure::NoEvent {
                event,
                latitude,
                longitude,
                ..
            } => format!("polar:{event}:{latitude},{longitude}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    event: SolarEvent,
    date: NaiveDate,
    latitude: u64,
    longitude: u64,
    timezone: String,
}

impl CacheKey {
    fn new(event: SolarEvent, date: NaiveDate, location: &Location) -> Self {
        Self {
            event,
            date,
            latitude: location.latitude.to_bits(),
            longitude: location.longitude.to_bits(),
            timezone: location.timezone.clone(),
        }
    }
}

/// Resolves solar events to concrete times.
#[derive(Debug, Default)]
pub struct SolarCalculator {
    cache: RefCell<HashMap<CacheKey, NaiveTime>>,
    reported: RefCell<HashSet<String>>,
}

impl SolarCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall-clock time of `event` on `date` at `location`.
    ///
    /// Successful calculations are cached per (event, date, coordinates,
    /// timezone); failures are not cached and fall back to
    /// [`SolarEvent::fallback_time`].
    pub fn resolve_time(
        &self,
        event: SolarEvent,
        date: NaiveDate,
        location: Option<&Location>,
    ) -> NaiveTime {
        let Some(location) = location else {
            return event.fallback_time();
        };

        if event == SolarEvent::Midnight {
            return NaiveTime::MIN;
        }

        let key = CacheKey::new(event, date, location);
        if let Some(time) = self.cache.borrow().get(&key) {
            return *time;
        }

        match compute_event_time(event, date, location) {
            Ok(time) => {
                self.cache.borrow_mut().insert(key, time);
                time
            }
            Err(failure) => {
                self.report_failure(&failure);
                event.fallback_time()
            }
        }
    }

    /// Concrete datetime of `spec` on `base_date`.
    ///
    /// Absolute specs ignore the location. Solar specs resolve the event and
    /// then apply the offset, which may move the result onto a neighbouring day.
    pub fn resolve_datetime(
        &self,
        spec: &TimeSpec,
        base_date: NaiveDate,
        location: Option<&Location>,
    ) -> NaiveDateTime {
        match spec {
            TimeSpec::Absolute(time) => base_date.and_time(*time),
            TimeSpec::Solar { event, offset } => {
                let time = self.resolve_time(*event, base_date, location);
                base_date.and_time(time) + Duration::minutes(i64::from(*offset))
            }
        }
    }

    /// Number of memoized results.
    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Number of distinct failure causes reported so far.
    pub fn reported_failures(&self) -> usize {
        self.reported.borrow().len()
    }

    fn report_failure(&self, failure: &SolarFailure) {
        if !self.reported.borrow_mut().insert(failure.cause_key()) {
            return;
        }

        log_pipe!();
        log_warning!("{failure}");
        if let SolarFailure::InvalidTimezone(_) = failure {
            log_indented!("Use an IANA timezone name such as \"Europe/London\" in [location]");
        }
        log_indented!("Using fallback solar times instead");
    }
}

fn compute_event_time(
    event: SolarEvent,
    date: NaiveDate,
    location: &Location,
) -> Result<NaiveTime, SolarFailure> {
    let tz = location
        .tz()
        .map_err(|_| SolarFailure::InvalidTimezone(location.timezone.clone()))?;

    let coordinates = Coordinates::new(location.latitude, location.longitude).ok_or(
        SolarFailure::InvalidCoordinates {
            latitude: location.latitude,
            longitude: location.longitude,
        },
    )?;

    let day = SolarDay::new(coordinates, date);
    let utc = match event {
        SolarEvent::Midnight => return Ok(NaiveTime::MIN),
        SolarEvent::Dawn => day.event_time(SunEvent::Dawn(DawnType::Civil)),
        SolarEvent::Sunrise => day.event_time(SunEvent::Sunrise),
        SolarEvent::Sunset => day.event_time(SunEvent::Sunset),
        SolarEvent::Dusk => day.event_time(SunEvent::Dusk(DawnType::Civil)),
        SolarEvent::Noon => {
            let rise = day.event_time(SunEvent::Sunrise);
            let set = day.event_time(SunEvent::Sunset);
            rise + (set - rise) / 2
        }
    };

    let local = utc.with_timezone(&tz);

    // When the sun never crosses the required elevation the underlying
    // arithmetic yields a timestamp nowhere near the requested date
    if (local.date_naive() - date).num_days().abs() > 1 {
        return Err(SolarFailure::NoEvent {
            event,
            date,
            latitude: location.latitude,
            longitude: location.longitude,
        });
    }

    let time = local.time();
    Ok(time.with_nanosecond(0).unwrap_or(time))
}
