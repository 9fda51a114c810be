//! Structured logging with box-drawing output.
//!
//! Every diagnostic in sunwall goes through the macros exported here so that
//! schedule loading, solar fallbacks and resolution traces share one visual
//! style. Output can be silenced at runtime (tests, `--json` mode) and debug
//! lines are gated behind [`Log::set_debug`].

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Main logging interface.
///
/// ## Logging Conventions
///
/// - **`log_block_start!`**: opens a new conceptual block (`┃` spacer, then `┣ message`).
///   Follow-up lines use `log_decorated!` or `log_indented!`.
/// - **`log_decorated!`**: a line belonging to the current block (`┣ message`).
/// - **`log_indented!`**: nested detail under the previous line (`┃   message`).
/// - **`log_pipe!`**: a bare `┃` spacer, used before a semantic message that starts
///   a new block of its own.
/// - **`log_version!`** / **`log_end!`**: header and terminator, once per run.
/// - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`**: semantic messages with
///   a coloured `[LEVEL]` tag. `log_debug!` prints only when debug output is enabled.
pub struct Log;

impl Log {
    /// Enable or disable all logging output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable `log_debug!` output.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if debug output is enabled (and logging as a whole is on).
    pub fn is_debug() -> bool {
        Self::is_enabled() && DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Timestamp prefix shown while the clock is overridden.
    ///
    /// With a fixed time source every line is prefixed with `[HH:MM:SS] ` of the
    /// simulated instant so traces read against the time being resolved.
    /// Returns an empty string for the real clock.
    pub fn get_timestamp_prefix() -> String {
        if crate::time::source::is_initialized() && crate::time::source::is_simulated() {
            format!("[{}] ", crate::time::source::now().format("%H:%M:%S"))
        } else {
            String::new()
        }
    }
}

// Public function that routes output (needed by macros)
pub fn write_output(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

/// Format one line with the timestamp prefix and a leading marker, then write it.
pub fn emit(marker: &str, message: &str) {
    let prefix = Log::get_timestamp_prefix();
    write_output(&format!("{prefix}{marker}{message}\n"));
}

// # Logging Macros

/// Log a decorated message, typically as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┣ ", &format!($fmt $($arg)*));
        }
    }};
    ($expr:expr) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┣ ", &($expr).to_string());
        }
    }};
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┃   ", &format!($fmt $($arg)*));
        }
    }};
    ($expr:expr) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┃   ", &($expr).to_string());
        }
    }};
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┃", "");
        }
    }};
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┃", "");
            $crate::logger::emit("┣ ", &format!($fmt $($arg)*));
        }
    }};
    ($expr:expr) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┃", "");
            $crate::logger::emit("┣ ", &($expr).to_string());
        }
    }};
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {{
        if $crate::logger::Log::is_enabled() {
            let version = env!("CARGO_PKG_VERSION");
            $crate::logger::emit("┏ ", &format!("sunwall v{version} ━━╸"));
        }
    }};
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("╹", "");
        }
    }};
}

/// Log a warning message with pipe prefix and yellow-colored tag.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┣[\x1b[33mWARNING\x1b[0m] ", &format!($fmt $($arg)*));
        }
    }};
    ($expr:expr) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┣[\x1b[33mWARNING\x1b[0m] ", &($expr).to_string());
        }
    }};
}

/// Log an error message with pipe prefix and red-colored tag.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┣[\x1b[31mERROR\x1b[0m] ", &format!($fmt $($arg)*));
        }
    }};
    ($expr:expr) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┣[\x1b[31mERROR\x1b[0m] ", &($expr).to_string());
        }
    }};
}

/// Log an informational message with pipe prefix and green-colored tag.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┣[\x1b[32mINFO\x1b[0m] ", &format!($fmt $($arg)*));
        }
    }};
    ($expr:expr) => {{
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit("┣[\x1b[32mINFO\x1b[0m] ", &($expr).to_string());
        }
    }};
}

/// Log a debug message; only printed when debug output is enabled.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {{
        if $crate::logger::Log::is_debug() {
            $crate::logger::emit("┣[\x1b[32mDEBUG\x1b[0m] ", &format!($fmt $($arg)*));
        }
    }};
    ($expr:expr) => {{
        if $crate::logger::Log::is_debug() {
            $crate::logger::emit("┣[\x1b[32mDEBUG\x1b[0m] ", &($expr).to_string());
        }
    }};
}
