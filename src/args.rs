//! Command-line argument parsing and processing.
//!
//! The inspector takes one schedule definition plus a handful of flags. Help
//! and version flags win over everything else; any unknown flag, missing flag
//! value or extra positional argument turns into a help screen with an error.

use std::path::PathBuf;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Resolve a schedule and print the result
    Inspect {
        schedule: PathBuf,
        next: bool,
        /// Fixed "now" as `YYYY-MM-DD HH:MM:SS`
        at: Option<String>,
        config_path: Option<PathBuf>,
        validate: bool,
        json: bool,
        debug_enabled: bool,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to invalid arguments and exit
    ShowHelpDueToError { reason: String },
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first item is the program name and is skipped.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        if args_vec
            .iter()
            .any(|arg| arg == "--version" || arg == "-V" || arg == "-v")
        {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let error = |reason: String| ParsedArgs {
            action: CliAction::ShowHelpDueToError { reason },
        };

        let mut schedule: Option<PathBuf> = None;
        let mut next = false;
        let mut at: Option<String> = None;
        let mut config_path: Option<PathBuf> = None;
        let mut validate = false;
        let mut json = false;
        let mut debug_enabled = false;

        let mut iter = args_vec.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--next" | "-n" => next = true,
                "--validate" => validate = true,
                "--json" | "-j" => json = true,
                "--debug" | "-d" => debug_enabled = true,
                "--at" | "-a" => match iter.next() {
                    Some(value) => at = Some(value),
                    None => return error(format!("{arg} requires a value")),
                },
                "--config" | "-c" => match iter.next() {
                    Some(value) => config_path = Some(PathBuf::from(value)),
                    None => return error(format!("{arg} requires a value")),
                },
                flag if flag.starts_with('-') => {
                    return error(format!("Unknown option: {flag}"));
                }
                _ => {
                    if let Some(existing) = &schedule {
                        return error(format!(
                            "Unexpected argument '{arg}' (schedule already given as '{}')",
                            existing.display()
                        ));
                    }
                    schedule = Some(PathBuf::from(&arg));
                }
            }
        }

        let Some(schedule) = schedule else {
            return error("Missing schedule file".to_string());
        };

        ParsedArgs {
            action: CliAction::Inspect {
                schedule,
                next,
                at,
                config_path,
                validate,
                json,
                debug_enabled,
            },
        }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_decorated!(env!("CARGO_PKG_DESCRIPTION"));
    log_end!();
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("sunwall [OPTIONS] <schedule.toml>");
    log_block_start!("Options:");
    log_indented!("-a, --at <datetime>    Resolve at \"YYYY-MM-DD HH:MM:SS\" instead of now");
    log_indented!("-c, --config <file>    Use a custom configuration file");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-j, --json             Print the result as JSON");
    log_indented!("-n, --next             Show the next wallpaper instead of the current one");
    log_indented!("    --validate         Validate the schedule and its images");
    log_indented!("-V, --version          Print version information");
    log_end!();
}
