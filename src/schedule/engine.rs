//! Current and next wallpaper resolution.
//!
//! Every lookup is a pure function of `(schedule, location, now)`. `now` is a
//! naive wall-clock datetime in the location's timezone (see
//! [`Location::wall_clock`]); the only state carried between calls is the
//! solar calculator's cache, which never changes a result.
//!
//! ## Time blocks
//!
//! A block is anchored to a calendar date by resolving its start and end on
//! that date. An end at or before the start pushes the end onto the next day,
//! so `22:00 → 06:00` anchored on Monday covers Monday 22:00 to Tuesday 06:00.
//! Lookups try the previous, current and next date anchors so that such a
//! block is still found at Tuesday 02:00.
//!
//! When several anchored blocks contain `now`, the one that started most
//! recently is current; equal starts go to the block defined first.
//!
//! A non-shuffled block splits its span into equal slices, one per image, in
//! order. A shuffled block always reports its first image for the whole span
//! with [`Wallpaper::shuffle`] set; picking a random image is left to the
//! caller.
//!
//! Every block window, current or next, is then fitted to the schedule: a
//! later block that starts inside it cuts it short, and a window that runs to
//! the end of its block stretches across any gap to the next block start.
//! Next inside a block is the following slice; from the last slice it is the
//! next block's first image.
//!
//! ## Days
//!
//! A non-shuffled day splits 24 hours evenly between its images. A shuffled
//! day reports its first image for the whole day.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

use super::{DaySchedule, Schedule, ScheduleType, TimeBlock, weekday_name};
use crate::common::constants::COVERAGE_TOLERANCE_MINUTES;
use crate::geo::{Location, SolarCalculator};

/// Which wallpaper a lookup asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The one that should be showing at `now`
    Current,
    /// The one that follows it
    Next,
}

/// Half-open `[start, end)` span of wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The `index`-th of `count` equal slices. The last slice always ends
    /// exactly at `end`.
    fn slice(&self, index: usize, count: usize) -> Interval {
        let count = count.max(1);
        let total = self.duration().num_milliseconds();
        let offset = |i: usize| Duration::milliseconds(total * i as i64 / count as i64);

        let start = self.start + offset(index);
        let end = if index + 1 >= count {
            self.end
        } else {
            self.start + offset(index + 1)
        };
        Interval { start, end }
    }

    /// Index of the slice containing `instant`, clamped to the valid range.
    fn slice_index(&self, instant: NaiveDateTime, count: usize) -> usize {
        let total = self.duration().num_milliseconds();
        if count == 0 || total <= 0 {
            return 0;
        }
        let elapsed = (instant - self.start).num_milliseconds().max(0);
        ((elapsed * count as i64 / total) as usize).min(count - 1)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            self.start.format("%Y-%m-%d %H:%M:%S"),
            self.end.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Where a resolved wallpaper came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WallpaperSource {
    Block(String),
    Day(Weekday),
}

impl fmt::Display for WallpaperSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WallpaperSource::Block(name) => write!(f, "timeblock '{name}'"),
            WallpaperSource::Day(day) => f.write_str(weekday_name(*day)),
        }
    }
}

fn serialize_source<S: Serializer>(source: &WallpaperSource, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(source)
}

/// A resolved image and the wall-clock window it is meant to be shown for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wallpaper {
    /// Image reference as written in the schedule, relative to the pack
    pub image: PathBuf,
    /// Position of `image` within its block or day
    pub index: usize,
    pub window: Interval,
    /// The owning block or day is shuffle-enabled; `image` is a placeholder
    pub shuffle: bool,
    #[serde(serialize_with = "serialize_source")]
    pub source: WallpaperSource,
}

impl Wallpaper {
    /// Image path joined onto the pack directory.
    pub fn resolve_path(&self, base: &Path) -> PathBuf {
        base.join(&self.image)
    }

    fn from_block(block: &TimeBlock, index: usize, window: Interval) -> Option<Self> {
        Some(Self {
            image: block.images.get(index)?.clone(),
            index,
            window,
            shuffle: block.shuffle,
            source: WallpaperSource::Block(block.name.clone()),
        })
    }

    fn from_day(day: Weekday, entry: &DaySchedule, index: usize, window: Interval) -> Option<Self> {
        Some(Self {
            image: entry.images.get(index)?.clone(),
            index,
            window,
            shuffle: entry.shuffle,
            source: WallpaperSource::Day(day),
        })
    }
}

/// Resolve `block` against `date`, rolling the end onto the next day when
/// the block crosses midnight.
pub fn anchor_block(
    solar: &SolarCalculator,
    block: &TimeBlock,
    date: NaiveDate,
    location: Option<&Location>,
) -> Interval {
    let start = solar.resolve_datetime(&block.start, date, location);
    let mut end = solar.resolve_datetime(&block.end, date, location);
    if end <= start {
        end += Duration::days(1);
    }
    Interval { start, end }
}

fn anchor_dates(now: NaiveDateTime) -> impl Iterator<Item = NaiveDate> {
    let today = now.date();
    [today.pred_opt(), Some(today), today.succ_opt()]
        .into_iter()
        .flatten()
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Full day used for sliced day schedules.
fn day_span(date: NaiveDate) -> Interval {
    Interval::new(midnight(date), midnight(date) + Duration::days(1))
}

/// Whole-day window reported for unsliced day entries, `00:00` to `23:59:59`.
fn whole_day(date: NaiveDate) -> Interval {
    Interval::new(
        midnight(date),
        midnight(date) + Duration::days(1) - Duration::seconds(1),
    )
}

/// Resolves schedules to blocks and wallpapers.
#[derive(Debug, Default)]
pub struct ScheduleEngine {
    solar: SolarCalculator,
}

impl ScheduleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solar(&self) -> &SolarCalculator {
        &self.solar
    }

    /// Anchored interval of `block` on `date`.
    pub fn block_interval(
        &self,
        block: &TimeBlock,
        date: NaiveDate,
        location: Option<&Location>,
    ) -> Interval {
        anchor_block(&self.solar, block, date, location)
    }

    /// Current or next time block. Always `None` for day-based schedules.
    pub fn get_block<'s>(
        &self,
        schedule: &'s Schedule,
        location: Option<&Location>,
        now: NaiveDateTime,
        lookup: Lookup,
    ) -> Option<&'s TimeBlock> {
        let found = match lookup {
            Lookup::Current => self.active_block(schedule, location, now),
            Lookup::Next => self.upcoming_block(schedule, location, now),
        };
        found.map(|(block, _)| block)
    }

    /// Current or next wallpaper with its display window.
    ///
    /// `None` when nothing applies: an empty schedule, a block or day without
    /// images, or an instant that falls in a gap between blocks.
    pub fn get_wallpaper(
        &self,
        schedule: &Schedule,
        location: Option<&Location>,
        now: NaiveDateTime,
        lookup: Lookup,
    ) -> Option<Wallpaper> {
        match schedule.meta.kind {
            ScheduleType::Timeblocks => self.block_wallpaper(schedule, location, now, lookup),
            ScheduleType::Days => day_wallpaper(schedule, now, lookup),
        }
    }

    fn blocks<'s>(&self, schedule: &'s Schedule) -> &'s [TimeBlock] {
        match schedule.meta.kind {
            ScheduleType::Timeblocks => schedule.timeblocks(),
            ScheduleType::Days => &[],
        }
    }

    /// Block whose anchored interval contains `now`, latest start first.
    fn active_block<'s>(
        &self,
        schedule: &'s Schedule,
        location: Option<&Location>,
        now: NaiveDateTime,
    ) -> Option<(&'s TimeBlock, Interval)> {
        let mut best: Option<(&TimeBlock, Interval)> = None;

        for block in self.blocks(schedule) {
            for date in anchor_dates(now) {
                let interval = self.block_interval(block, date, location);
                if interval.contains(now)
                    && best.is_none_or(|(_, current)| interval.start > current.start)
                {
                    best = Some((block, interval));
                }
            }
        }

        best
    }

    /// First block starting strictly after `now`, looking at today's anchors
    /// and then tomorrow's.
    fn upcoming_block<'s>(
        &self,
        schedule: &'s Schedule,
        location: Option<&Location>,
        now: NaiveDateTime,
    ) -> Option<(&'s TimeBlock, Interval)> {
        let blocks = self.blocks(schedule);
        let tomorrow = now.date().succ_opt()?;

        let earliest_after = |date: NaiveDate| {
            blocks
                .iter()
                .map(|block| (block, self.block_interval(block, date, location)))
                .filter(|(_, interval)| interval.start > now)
                .min_by_key(|(_, interval)| interval.start)
        };

        earliest_after(now.date())
            .or_else(|| earliest_after(tomorrow))
            .or_else(|| {
                blocks
                    .first()
                    .map(|block| (block, self.block_interval(block, tomorrow, location)))
            })
    }

    /// Earliest start of any anchored block strictly after `instant`.
    fn next_start_after(
        &self,
        schedule: &Schedule,
        location: Option<&Location>,
        instant: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        self.blocks(schedule)
            .iter()
            .flat_map(|block| {
                anchor_dates(instant).map(move |date| self.block_interval(block, date, location))
            })
            .map(|interval| interval.start)
            .filter(|start| *start > instant)
            .min()
    }

    fn block_wallpaper(
        &self,
        schedule: &Schedule,
        location: Option<&Location>,
        now: NaiveDateTime,
        lookup: Lookup,
    ) -> Option<Wallpaper> {
        let active = self.active_block(schedule, location, now);

        match lookup {
            Lookup::Current => {
                let (block, interval) = active?;
                self.current_in_block(schedule, location, block, interval, now)
            }
            Lookup::Next => {
                if let Some((block, interval)) = active
                    && let Some((index, window)) = next_in_block(block, interval, now)
                {
                    let window = self.fit_window(schedule, location, interval, window, window.start);
                    return Wallpaper::from_block(block, index, window);
                }

                let (block, interval) = self.upcoming_block(schedule, location, now)?;
                let window = self.fit_window(schedule, location, interval, interval, interval.start);
                Wallpaper::from_block(block, 0, window)
            }
        }
    }

    fn current_in_block(
        &self,
        schedule: &Schedule,
        location: Option<&Location>,
        block: &TimeBlock,
        interval: Interval,
        now: NaiveDateTime,
    ) -> Option<Wallpaper> {
        let count = block.images.len();
        if count == 0 {
            return None;
        }

        let (index, window) = if block.shuffle {
            (0, interval)
        } else {
            let index = interval.slice_index(now, count);
            (index, interval.slice(index, count))
        };

        let window = self.fit_window(schedule, location, interval, window, now);
        Wallpaper::from_block(block, index, window)
    }

    /// Adjust `window`, a span inside the anchored block `interval`, against
    /// the first block start after `from`: an overlapping block cuts it short,
    /// and a window that ends with its block stretches across a gap.
    fn fit_window(
        &self,
        schedule: &Schedule,
        location: Option<&Location>,
        interval: Interval,
        mut window: Interval,
        from: NaiveDateTime,
    ) -> Interval {
        if let Some(next_start) = self.next_start_after(schedule, location, from) {
            let tolerance = Duration::minutes(COVERAGE_TOLERANCE_MINUTES);
            if next_start < window.end {
                window.end = next_start;
            } else if window.end == interval.end && next_start - window.end > tolerance {
                window.end = next_start;
            }
        }
        window
    }
}

/// Index and window of the next image inside the current block.
///
/// `None` once less than one slice remains, or when `now` is already in the
/// last slice: the next block takes over from there.
fn next_in_block(
    block: &TimeBlock,
    interval: Interval,
    now: NaiveDateTime,
) -> Option<(usize, Interval)> {
    let count = block.images.len();
    if count == 0 {
        return None;
    }

    let per_image = interval.duration() / count as i32;
    if interval.end - now < per_image {
        return None;
    }

    if block.shuffle {
        return Some((0, Interval::new(now, interval.end)));
    }

    let index = interval.slice_index(now, count) + 1;
    (index < count).then(|| (index, interval.slice(index, count)))
}

fn day_wallpaper(schedule: &Schedule, now: NaiveDateTime, lookup: Lookup) -> Option<Wallpaper> {
    let today = now.date();
    let weekday = today.weekday();
    let entry = schedule
        .day(weekday)
        .filter(|entry| !entry.images.is_empty());

    match (lookup, entry) {
        (Lookup::Current, Some(entry)) => {
            if entry.shuffle {
                return Wallpaper::from_day(weekday, entry, 0, whole_day(today));
            }
            let span = day_span(today);
            let count = entry.images.len();
            let index = span.slice_index(now, count);
            Wallpaper::from_day(weekday, entry, index, span.slice(index, count))
        }
        (Lookup::Current, None) => {
            let (first_day, first) = schedule.days().first()?;
            Wallpaper::from_day(*first_day, first, 0, whole_day(today))
        }
        (Lookup::Next, Some(entry)) => {
            let remaining = whole_day(today);
            if entry.shuffle && now < remaining.end {
                return Wallpaper::from_day(weekday, entry, 0, Interval::new(now, remaining.end));
            }
            if !entry.shuffle {
                let span = day_span(today);
                let count = entry.images.len();
                let index = span.slice_index(now, count) + 1;
                if index < count {
                    return Wallpaper::from_day(weekday, entry, index, span.slice(index, count));
                }
            }
            following_day(schedule, today)
        }
        (Lookup::Next, None) => following_day(schedule, today),
    }
}

/// First image of the day after `today`, wrapping to the first defined day
/// when that weekday has no usable entry.
fn following_day(schedule: &Schedule, today: NaiveDate) -> Option<Wallpaper> {
    let tomorrow = today.succ_opt()?;
    let (day, entry) = match schedule
        .day(tomorrow.weekday())
        .filter(|entry| !entry.images.is_empty())
    {
        Some(entry) => (tomorrow.weekday(), entry),
        None => schedule.days().first().map(|(day, entry)| (*day, entry))?,
    };

    let window = if entry.shuffle {
        whole_day(tomorrow)
    } else {
        day_span(tomorrow).slice(0, entry.images.len())
    };
    Wallpaper::from_day(day, entry, 0, window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{DaySchedule, ScheduleEntries, ScheduleMeta};
    use crate::time::TimeSpec;

    fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn block(name: &str, start: &str, end: &str, images: &[&str]) -> TimeBlock {
        TimeBlock {
            name: name.to_string(),
            start: TimeSpec::parse(start).unwrap(),
            end: TimeSpec::parse(end).unwrap(),
            images: images.iter().map(PathBuf::from).collect(),
            shuffle: false,
        }
    }

    fn timeblocks(blocks: Vec<TimeBlock>) -> Schedule {
        Schedule {
            meta: ScheduleMeta {
                kind: ScheduleType::Timeblocks,
                name: "test".to_string(),
                author: None,
                description: None,
                version: "1.0".to_string(),
            },
            entries: ScheduleEntries::Timeblocks(blocks),
            location: None,
        }
    }

    fn days(entries: Vec<(Weekday, DaySchedule)>) -> Schedule {
        Schedule {
            meta: ScheduleMeta {
                kind: ScheduleType::Days,
                name: "week".to_string(),
                author: None,
                description: None,
                version: "1.0".to_string(),
            },
            entries: ScheduleEntries::Days(entries),
            location: None,
        }
    }

    fn day(images: &[&str], shuffle: bool) -> DaySchedule {
        DaySchedule {
            images: images.iter().map(PathBuf::from).collect(),
            shuffle,
        }
    }

    #[test]
    fn test_interval_slices_cover_span() {
        let span = Interval::new(at(2024, 1, 1, 0, 0), at(2024, 1, 2, 0, 0));
        assert_eq!(span.slice(0, 3).end, at(2024, 1, 1, 8, 0));
        assert_eq!(span.slice(1, 3).start, at(2024, 1, 1, 8, 0));
        assert_eq!(span.slice(2, 3).end, span.end);
        assert_eq!(span.slice_index(at(2024, 1, 1, 10, 0), 3), 1);
        assert_eq!(span.slice_index(at(2024, 1, 1, 23, 59), 3), 2);
        assert_eq!(span.slice_index(at(2024, 1, 3, 0, 0), 3), 2);
    }

    #[test]
    fn test_midnight_crossing_block() {
        let engine = ScheduleEngine::new();
        let schedule = timeblocks(vec![block("night", "22:00", "06:00", &["n1.jpg", "n2.jpg"])]);

        let late = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 23, 0), Lookup::Current)
            .unwrap();
        assert_eq!(late.image, PathBuf::from("n1.jpg"));
        assert_eq!(late.window.start, at(2024, 5, 6, 22, 0));
        assert_eq!(late.window.end, at(2024, 5, 7, 2, 0));

        let early = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 7, 2, 0), Lookup::Current)
            .unwrap();
        assert_eq!(early.image, PathBuf::from("n2.jpg"));
        assert_eq!(early.index, 1);
        assert_eq!(early.window.start, at(2024, 5, 7, 2, 0));
        // Final slice is stretched to the block's next start that evening
        assert_eq!(early.window.end, at(2024, 5, 7, 22, 0));

        assert_eq!(
            engine
                .get_block(&schedule, None, at(2024, 5, 7, 2, 0), Lookup::Current)
                .map(|b| b.name.as_str()),
            Some("night")
        );
    }

    #[test]
    fn test_instant_in_gap_has_no_wallpaper() {
        let engine = ScheduleEngine::new();
        let schedule = timeblocks(vec![
            block("morning", "08:00", "12:00", &["m.jpg"]),
            block("evening", "18:00", "22:00", &["e.jpg"]),
        ]);
        let now = at(2024, 5, 6, 14, 0);

        assert!(engine.get_block(&schedule, None, now, Lookup::Current).is_none());
        assert!(engine.get_wallpaper(&schedule, None, now, Lookup::Current).is_none());

        let next = engine
            .get_wallpaper(&schedule, None, now, Lookup::Next)
            .unwrap();
        assert_eq!(next.image, PathBuf::from("e.jpg"));
        // Stretched across the overnight gap to the next morning
        assert_eq!(next.window, Interval::new(at(2024, 5, 6, 18, 0), at(2024, 5, 7, 8, 0)));
    }

    #[test]
    fn test_gap_stretches_final_window() {
        let engine = ScheduleEngine::new();
        let schedule = timeblocks(vec![
            block("morning", "08:00", "12:00", &["m1.jpg", "m2.jpg"]),
            block("evening", "18:00", "22:00", &["e.jpg"]),
        ]);

        let first = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 9, 0), Lookup::Current)
            .unwrap();
        assert_eq!(first.window.end, at(2024, 5, 6, 10, 0));

        let last = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 11, 0), Lookup::Current)
            .unwrap();
        assert_eq!(last.image, PathBuf::from("m2.jpg"));
        assert_eq!(last.window.end, at(2024, 5, 6, 18, 0));
    }

    #[test]
    fn test_overlap_prefers_latest_start() {
        let engine = ScheduleEngine::new();
        let schedule = timeblocks(vec![
            block("a", "08:00", "12:00", &["a.jpg"]),
            block("b", "11:00", "15:00", &["b.jpg"]),
        ]);

        let before = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 10, 0), Lookup::Current)
            .unwrap();
        assert_eq!(before.source, WallpaperSource::Block("a".to_string()));
        // Window is clipped where the overlapping block takes over
        assert_eq!(before.window.end, at(2024, 5, 6, 11, 0));

        let during = engine
            .get_block(&schedule, None, at(2024, 5, 6, 11, 30), Lookup::Current)
            .unwrap();
        assert_eq!(during.name, "b");
    }

    #[test]
    fn test_equal_starts_use_definition_order() {
        let engine = ScheduleEngine::new();
        let schedule = timeblocks(vec![
            block("first", "08:00", "12:00", &["1.jpg"]),
            block("second", "08:00", "10:00", &["2.jpg"]),
        ]);
        let current = engine
            .get_block(&schedule, None, at(2024, 5, 6, 9, 0), Lookup::Current)
            .unwrap();
        assert_eq!(current.name, "first");
    }

    #[test]
    fn test_next_advances_within_block() {
        let engine = ScheduleEngine::new();
        let schedule = timeblocks(vec![
            block("day", "06:00", "18:00", &["d1.jpg", "d2.jpg", "d3.jpg"]),
            block("night", "18:00", "06:00", &["n.jpg"]),
        ]);

        let next = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 7, 0), Lookup::Next)
            .unwrap();
        assert_eq!(next.image, PathBuf::from("d2.jpg"));
        assert_eq!(next.window, Interval::new(at(2024, 5, 6, 10, 0), at(2024, 5, 6, 14, 0)));

        // Last slice: the next block takes over
        let next = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 15, 0), Lookup::Next)
            .unwrap();
        assert_eq!(next.image, PathBuf::from("n.jpg"));
        assert_eq!(next.window, Interval::new(at(2024, 5, 6, 18, 0), at(2024, 5, 7, 6, 0)));
    }

    #[test]
    fn test_next_from_last_slice_start_moves_on() {
        let engine = ScheduleEngine::new();
        let schedule = timeblocks(vec![block("night", "22:00", "06:00", &["n1.jpg", "n2.jpg"])]);

        // 02:00 opens the last slice, exactly one slice before the end
        let next = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 7, 2, 0), Lookup::Next)
            .unwrap();
        assert_eq!(next.image, PathBuf::from("n1.jpg"));
        assert_eq!(next.index, 0);
        assert!(next.window.start > at(2024, 5, 7, 2, 0));
        assert_eq!(next.window, Interval::new(at(2024, 5, 7, 22, 0), at(2024, 5, 8, 22, 0)));
    }

    #[test]
    fn test_next_in_block_keeps_inner_slices() {
        let engine = ScheduleEngine::new();
        let schedule = timeblocks(vec![
            block("morning", "08:00", "11:00", &["m1.jpg", "m2.jpg", "m3.jpg"]),
            block("evening", "18:00", "22:00", &["e.jpg"]),
        ]);

        let next = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 8, 30), Lookup::Next)
            .unwrap();
        assert_eq!(next.image, PathBuf::from("m2.jpg"));
        assert_eq!(next.window, Interval::new(at(2024, 5, 6, 9, 0), at(2024, 5, 6, 10, 0)));

        // The last slice runs to the end of the block and stretches to evening
        let next = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 9, 0), Lookup::Next)
            .unwrap();
        assert_eq!(next.image, PathBuf::from("m3.jpg"));
        assert_eq!(next.window, Interval::new(at(2024, 5, 6, 10, 0), at(2024, 5, 6, 18, 0)));
    }

    #[test]
    fn test_next_wraps_to_tomorrow() {
        let engine = ScheduleEngine::new();
        let schedule = timeblocks(vec![
            block("morning", "06:00", "12:00", &["m.jpg"]),
            block("late", "20:00", "23:00", &["l.jpg"]),
        ]);
        let next = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 22, 0), Lookup::Next)
            .unwrap();
        assert_eq!(next.image, PathBuf::from("m.jpg"));
        assert_eq!(next.window.start, at(2024, 5, 7, 6, 0));

        let next_block = engine
            .get_block(&schedule, None, at(2024, 5, 6, 22, 0), Lookup::Next)
            .unwrap();
        assert_eq!(next_block.name, "morning");
    }

    #[test]
    fn test_shuffled_block() {
        let engine = ScheduleEngine::new();
        let mut evening = block("evening", "16:00", "22:00", &["e1.jpg", "e2.jpg", "e3.jpg"]);
        evening.shuffle = true;
        let schedule = timeblocks(vec![evening, block("night", "22:00", "16:00", &["n.jpg"])]);

        let current = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 21, 0), Lookup::Current)
            .unwrap();
        assert!(current.shuffle);
        assert_eq!(current.index, 0);
        assert_eq!(current.image, PathBuf::from("e1.jpg"));
        assert_eq!(current.window, Interval::new(at(2024, 5, 6, 16, 0), at(2024, 5, 6, 22, 0)));

        // Two hours left is a full slice: stay in the block for the remaining span
        let next = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 17, 0), Lookup::Next)
            .unwrap();
        assert_eq!(next.image, PathBuf::from("e1.jpg"));
        assert_eq!(next.window, Interval::new(at(2024, 5, 6, 17, 0), at(2024, 5, 6, 22, 0)));

        let next = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 21, 0), Lookup::Next)
            .unwrap();
        assert_eq!(next.image, PathBuf::from("n.jpg"));
    }

    #[test]
    fn test_block_without_images() {
        let engine = ScheduleEngine::new();
        let schedule = timeblocks(vec![block("empty", "00:00", "23:59", &[])]);
        let now = at(2024, 5, 6, 12, 0);
        assert!(engine.get_block(&schedule, None, now, Lookup::Current).is_some());
        assert!(engine.get_wallpaper(&schedule, None, now, Lookup::Current).is_none());
    }

    #[test]
    fn test_day_rotation() {
        let schedule = days(vec![(Weekday::Mon, day(&["a.jpg", "b.jpg", "c.jpg"], false))]);
        // 2024-05-06 is a Monday
        let now = at(2024, 5, 6, 10, 0);

        let current = day_wallpaper(&schedule, now, Lookup::Current).unwrap();
        assert_eq!(current.image, PathBuf::from("b.jpg"));
        assert_eq!(current.window, Interval::new(at(2024, 5, 6, 8, 0), at(2024, 5, 6, 16, 0)));
        assert_eq!(current.source, WallpaperSource::Day(Weekday::Mon));

        let next = day_wallpaper(&schedule, now, Lookup::Next).unwrap();
        assert_eq!(next.image, PathBuf::from("c.jpg"));

        // Last image rolls over; Tuesday is undefined so wrap to the first day
        let next = day_wallpaper(&schedule, at(2024, 5, 6, 20, 0), Lookup::Next).unwrap();
        assert_eq!(next.image, PathBuf::from("a.jpg"));
        assert_eq!(next.window.start, at(2024, 5, 7, 0, 0));
    }

    #[test]
    fn test_shuffled_day_and_missing_day() {
        let schedule = days(vec![
            (Weekday::Wed, day(&["w.jpg"], false)),
            (Weekday::Mon, day(&["m1.jpg", "m2.jpg"], true)),
        ]);

        let monday = day_wallpaper(&schedule, at(2024, 5, 6, 15, 0), Lookup::Current).unwrap();
        assert!(monday.shuffle);
        assert_eq!(monday.image, PathBuf::from("m1.jpg"));
        assert_eq!(monday.window.end, at(2024, 5, 6, 23, 59) + Duration::seconds(59));

        // Tuesday has no entry: current falls back to the first defined day
        let tuesday = day_wallpaper(&schedule, at(2024, 5, 7, 9, 0), Lookup::Current).unwrap();
        assert_eq!(tuesday.image, PathBuf::from("w.jpg"));
        assert_eq!(tuesday.source, WallpaperSource::Day(Weekday::Wed));

        // Next from Tuesday is Wednesday's first image
        let next = day_wallpaper(&schedule, at(2024, 5, 7, 9, 0), Lookup::Next).unwrap();
        assert_eq!(next.image, PathBuf::from("w.jpg"));
        assert_eq!(next.window, Interval::new(at(2024, 5, 8, 0, 0), at(2024, 5, 9, 0, 0)));
    }

    #[test]
    fn test_shuffled_day_next() {
        let schedule = days(vec![
            (Weekday::Mon, day(&["m1.jpg", "m2.jpg"], true)),
            (Weekday::Thu, day(&["t1.jpg", "t2.jpg"], true)),
        ]);
        let end_of = |d: u32| at(2024, 5, d, 23, 59) + Duration::seconds(59);

        // Monday: the rest of today, first image as placeholder
        let next = day_wallpaper(&schedule, at(2024, 5, 6, 10, 0), Lookup::Next).unwrap();
        assert!(next.shuffle);
        assert_eq!(next.image, PathBuf::from("m1.jpg"));
        assert_eq!(next.source, WallpaperSource::Day(Weekday::Mon));
        assert_eq!(next.window, Interval::new(at(2024, 5, 6, 10, 0), end_of(6)));

        // Wednesday has no entry; Thursday is shuffled and gets the whole day
        let next = day_wallpaper(&schedule, at(2024, 5, 8, 10, 0), Lookup::Next).unwrap();
        assert_eq!(next.image, PathBuf::from("t1.jpg"));
        assert_eq!(next.source, WallpaperSource::Day(Weekday::Thu));
        assert_eq!(next.window, Interval::new(at(2024, 5, 9, 0, 0), end_of(9)));

        // Tuesday rolls into undefined Wednesday: first defined day, over Wednesday
        let next = day_wallpaper(&schedule, at(2024, 5, 7, 10, 0), Lookup::Next).unwrap();
        assert_eq!(next.image, PathBuf::from("m1.jpg"));
        assert_eq!(next.source, WallpaperSource::Day(Weekday::Mon));
        assert_eq!(next.window, Interval::new(at(2024, 5, 8, 0, 0), end_of(8)));
    }

    #[test]
    fn test_kind_mismatch_yields_nothing() {
        let engine = ScheduleEngine::new();
        let schedule = days(vec![(Weekday::Mon, day(&["a.jpg"], false))]);
        assert!(
            engine
                .get_block(&schedule, None, at(2024, 5, 6, 10, 0), Lookup::Current)
                .is_none()
        );
        assert!(
            engine
                .get_block(&schedule, None, at(2024, 5, 6, 10, 0), Lookup::Next)
                .is_none()
        );

        let empty = timeblocks(Vec::new());
        assert!(
            engine
                .get_wallpaper(&empty, None, at(2024, 5, 6, 10, 0), Lookup::Next)
                .is_none()
        );
    }

    #[test]
    fn test_resolve_path() {
        let engine = ScheduleEngine::new();
        let schedule = timeblocks(vec![block("all", "00:00", "00:00", &["img/a.jpg"])]);
        let wallpaper = engine
            .get_wallpaper(&schedule, None, at(2024, 5, 6, 10, 0), Lookup::Current)
            .unwrap();
        assert_eq!(
            wallpaper.resolve_path(Path::new("/packs/coastal")),
            PathBuf::from("/packs/coastal/img/a.jpg")
        );
    }
}
