//! Schedule inspector entry point.
//!
//! Loads one schedule definition, resolves it against the configured location
//! and prints the current (or next) wallpaper with its display window. With
//! `--validate` the pack is checked as well and a failed report exits
//! non-zero. This binary never changes the desktop background and never
//! loops; periodic invocation belongs to an external scheduler.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sunwall::args::{self, CliAction, ParsedArgs};
use sunwall::common::constants::EXIT_FAILURE;
use sunwall::config::Config;
use sunwall::geo::Location;
use sunwall::logger::Log;
use sunwall::schedule::{
    self, Lookup, Schedule, ScheduleEngine, ValidationResult, Wallpaper, validate_schedule,
};
use sunwall::time::source::{self, FixedTimeSource};
use sunwall::{
    log_block_start, log_debug, log_decorated, log_end, log_error, log_indented, log_pipe,
    log_version, log_warning,
};

/// Options for one inspector run.
struct Inspect {
    schedule: PathBuf,
    lookup: Lookup,
    at: Option<String>,
    config_path: Option<PathBuf>,
    validate: bool,
    json: bool,
    debug_enabled: bool,
}

fn main() -> Result<()> {
    let parsed_args = ParsedArgs::from_env();

    match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError { reason } => {
            log_version!();
            log_pipe!();
            log_error!("{reason}");
            log_indented!("Run 'sunwall --help' for usage");
            log_end!();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Inspect {
            schedule,
            next,
            at,
            config_path,
            validate,
            json,
            debug_enabled,
        } => {
            let options = Inspect {
                schedule,
                lookup: if next { Lookup::Next } else { Lookup::Current },
                at,
                config_path,
                validate,
                json,
                debug_enabled,
            };
            if !run_inspect(options)? {
                std::process::exit(EXIT_FAILURE);
            }
            Ok(())
        }
    }
}

/// Returns `false` when validation was requested and failed.
fn run_inspect(options: Inspect) -> Result<bool> {
    if options.json {
        Log::set_enabled(false);
    }

    if let Some(at) = &options.at {
        let instant = source::parse_datetime(at).map_err(anyhow::Error::msg)?;
        source::init_time_source(Arc::new(FixedTimeSource::new(instant)));
    }

    let config = match &options.config_path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Log::set_debug(options.debug_enabled || config.debug_enabled());

    log_version!();
    if Log::is_debug() {
        config.log_config();
    }

    let schedule = schedule::load_from_path(&options.schedule)?;
    let base_path = options
        .schedule
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    log_block_start!("Schedule: {schedule}");
    log_indented!("{}", schedule.meta);
    if let Some(description) = &schedule.meta.description {
        log_indented!("{description}");
    }

    let location = schedule.location_or(config.location.as_ref());
    log_location(&schedule, location);

    let now_local = source::now();
    let now = match location {
        Some(location) => location.wall_clock(now_local),
        None => now_local.naive_local(),
    };
    log_debug!("Resolving at {} (location time)", now.format("%Y-%m-%d %H:%M:%S"));

    let engine = ScheduleEngine::new();
    let wallpaper = engine.get_wallpaper(&schedule, location, now, options.lookup);

    let validation = options
        .validate
        .then(|| validate_schedule(engine.solar(), &schedule, base_path, location, now.date()));

    if options.json {
        print_json(
            &schedule,
            now,
            options.lookup,
            wallpaper.as_ref(),
            base_path,
            validation.as_ref(),
        )?;
    } else {
        log_wallpaper(options.lookup, wallpaper.as_ref(), base_path, now);
        if let Some(result) = &validation {
            log_validation(result);
        }
        log_end!();
    }

    Ok(validation.is_none_or(|result| result.passed()))
}

fn log_location(schedule: &Schedule, location: Option<&Location>) {
    match location {
        Some(location) => {
            let origin = if schedule.location.is_some() {
                "schedule"
            } else {
                "configuration"
            };
            log_decorated!("Location: {location} [{}] from {origin}", location.timezone);
        }
        None => log_decorated!("Location: none, solar events use fallback times"),
    }
}

fn log_wallpaper(
    lookup: Lookup,
    wallpaper: Option<&Wallpaper>,
    base_path: &Path,
    now: NaiveDateTime,
) {
    let label = match lookup {
        Lookup::Current => "Current",
        Lookup::Next => "Next",
    };

    let Some(wallpaper) = wallpaper else {
        log_block_start!(
            "{label} wallpaper: none scheduled at {}",
            now.format("%Y-%m-%d %H:%M:%S")
        );
        return;
    };

    log_block_start!(
        "{label} wallpaper: {}",
        wallpaper.resolve_path(base_path).display()
    );
    log_indented!("From: {}", wallpaper.source);
    log_indented!("Window: {}", wallpaper.window);
    if wallpaper.shuffle {
        log_indented!("Shuffle enabled: any image from {} may be shown", wallpaper.source);
    }
}

fn log_validation(result: &ValidationResult) {
    if result.passed() {
        log_block_start!("Validation passed");
    } else {
        log_block_start!("Validation failed");
    }

    for (check, messages) in result.errors() {
        for message in messages {
            log_error!("[{check}] {message}");
        }
    }
    for (check, messages) in result.warnings() {
        for message in messages {
            log_warning!("[{check}] {message}");
        }
    }
}

fn print_json(
    schedule: &Schedule,
    now: NaiveDateTime,
    lookup: Lookup,
    wallpaper: Option<&Wallpaper>,
    base_path: &Path,
    validation: Option<&ValidationResult>,
) -> Result<()> {
    let lookup_name = match lookup {
        Lookup::Current => "current",
        Lookup::Next => "next",
    };
    let output = serde_json::json!({
        "schedule": schedule.meta.name,
        "type": schedule.meta.kind,
        "now": now,
        "lookup": lookup_name,
        "path": wallpaper.map(|w| w.resolve_path(base_path)),
        "wallpaper": wallpaper,
        "validation": validation.map(|result| serde_json::json!({
            "passed": result.passed(),
            "messages": result.messages(),
        })),
    });

    let text = serde_json::to_string_pretty(&output).context("Failed to render JSON output")?;
    println!("{text}");
    Ok(())
}
