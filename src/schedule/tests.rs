// End-to-end scenarios: TOML definition in, resolved wallpaper out
#[cfg(test)]
mod resolution_tests {
    use crate::geo::Location;
    use crate::schedule::{
        CoverageWarning, Lookup, Schedule, ScheduleEngine, WallpaperSource, analyze_coverage,
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use std::path::PathBuf;

    fn at(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").unwrap()
    }

    const NIGHT: &str = r#"
[meta]
type = "timeblocks"
name = "Night Owl"

[timeblocks.night]
start = "22:00"
end = "06:00"
images = ["n1.jpg", "n2.jpg"]
"#;

    /// Test the block that crosses midnight through both of its calendar days.
    #[test]
    fn test_night_block_crosses_midnight() {
        let schedule = Schedule::from_toml_str(NIGHT).unwrap();
        let engine = ScheduleEngine::new();

        let evening = engine
            .get_wallpaper(&schedule, None, at("2024-02-10 23:00"), Lookup::Current)
            .unwrap();
        assert_eq!(evening.image, PathBuf::from("n1.jpg"));

        let small_hours = engine
            .get_wallpaper(&schedule, None, at("2024-02-11 02:00"), Lookup::Current)
            .unwrap();
        assert_eq!(small_hours.image, PathBuf::from("n2.jpg"));
        assert_eq!(small_hours.source, WallpaperSource::Block("night".to_string()));

        // Past the end of the block and before it restarts
        assert!(
            engine
                .get_wallpaper(&schedule, None, at("2024-02-11 12:00"), Lookup::Current)
                .is_none()
        );
    }

    /// Test that repeated lookups with the same inputs agree.
    #[test]
    fn test_lookups_are_idempotent() {
        let schedule = Schedule::from_toml_str(
            r#"
[meta]
type = "timeblocks"
name = "Solar"

[timeblocks.day]
start = "sunrise"
end = "sunset"
images = ["d1.jpg", "d2.jpg", "d3.jpg"]

[timeblocks.night]
start = "sunset"
end = "sunrise"
images = ["n1.jpg"]
"#,
        )
        .unwrap();
        let location = Location::new(40.7128, -74.0060, "America/New_York");
        let engine = ScheduleEngine::new();
        let now = at("2024-07-01 13:15");

        for lookup in [Lookup::Current, Lookup::Next] {
            let first = engine.get_wallpaper(&schedule, Some(&location), now, lookup);
            let cached = engine.solar().cache_len();
            let second = engine.get_wallpaper(&schedule, Some(&location), now, lookup);
            assert!(first.is_some());
            assert_eq!(first, second);
            assert_eq!(engine.solar().cache_len(), cached);
        }

        // A fresh engine, without a warm cache, agrees as well
        let fresh = ScheduleEngine::new();
        assert_eq!(
            fresh.get_wallpaper(&schedule, Some(&location), now, Lookup::Current),
            engine.get_wallpaper(&schedule, Some(&location), now, Lookup::Current)
        );
    }

    /// Test overlapping blocks are reported and resolved deterministically.
    #[test]
    fn test_overlapping_blocks() {
        let schedule = Schedule::from_toml_str(
            r#"
[meta]
type = "timeblocks"
name = "Overlap"

[timeblocks.A]
start = "08:00"
end = "12:00"
images = ["a.jpg"]

[timeblocks.B]
start = "11:00"
end = "15:00"
images = ["b.jpg"]
"#,
        )
        .unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let engine = ScheduleEngine::new();
        let warnings = analyze_coverage(engine.solar(), &schedule, None, date);
        assert!(warnings.iter().any(|w| matches!(
            w,
            CoverageWarning::Overlap { first, second, .. } if first == "A" && second == "B"
        )));
        assert!(
            warnings
                .iter()
                .any(|w| matches!(w, CoverageWarning::IncompleteCoverage { .. }))
        );

        let block = engine
            .get_block(&schedule, None, at("2024-02-10 11:30"), Lookup::Current)
            .unwrap();
        assert_eq!(block.name, "B");
    }

    /// Test the three-image Monday rotation.
    #[test]
    fn test_monday_rotation() {
        let schedule = Schedule::from_toml_str(
            r#"
[meta]
type = "days"
name = "Weekly"

[days.monday]
images = ["first.jpg", "second.jpg", "third.jpg"]
"#,
        )
        .unwrap();
        let engine = ScheduleEngine::new();

        // 2024-02-12 is a Monday
        let wallpaper = engine
            .get_wallpaper(&schedule, None, at("2024-02-12 10:00"), Lookup::Current)
            .unwrap();
        assert_eq!(wallpaper.image, PathBuf::from("second.jpg"));
        assert_eq!(wallpaper.index, 1);
        assert!(
            engine
                .get_block(&schedule, None, at("2024-02-12 10:00"), Lookup::Current)
                .is_none()
        );
    }

    /// Test that a schedule's own location is preferred over the global one.
    #[test]
    fn test_schedule_location_overrides_global() {
        let schedule = Schedule::from_toml_str(&format!(
            "{NIGHT}\n[location]\nlatitude = 35.68\nlongitude = 139.69\ntimezone = \"Asia/Tokyo\"\n"
        ))
        .unwrap();
        let global = Location::new(51.5, -0.12, "Europe/London");

        let effective = schedule.location_or(Some(&global)).unwrap();
        assert_eq!(effective.timezone, "Asia/Tokyo");

        let plain = Schedule::from_toml_str(NIGHT).unwrap();
        assert_eq!(plain.location_or(Some(&global)), Some(&global));
        assert_eq!(plain.location_or(None), None);
    }

    /// Test display renderings of the data model.
    #[test]
    fn test_display_formats() {
        let schedule = Schedule::from_toml_str(
            r#"
[meta]
type = "timeblocks"
name = "Coastal"
author = "Jane"
version = "1.2"

[timeblocks.evening]
start = "sunset-30m"
end = "dusk+15"
images = ["e1.jpg", "e2.jpg"]
"#,
        )
        .unwrap();

        assert_eq!(schedule.to_string(), "Coastal: 1 timeblocks");
        assert_eq!(schedule.meta.to_string(), "Coastal v1.2 by Jane");
        assert_eq!(
            schedule.block("evening").unwrap().to_string(),
            "evening: sunset-30 to dusk+15 (2 images)"
        );

        let days = Schedule::from_toml_str(
            "[meta]\ntype = \"days\"\nname = \"W\"\n[days.sunday]\nimages = [\"a.jpg\", \"b.jpg\"]\nshuffle = true\n",
        )
        .unwrap();
        assert_eq!(days.to_string(), "W: 1 days");
        assert_eq!(days.days()[0].1.to_string(), "2 images (shuffled)");
        assert_eq!(days.days()[0].1.images.len(), 2);
    }
}
