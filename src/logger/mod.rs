//! Structured logging for swaprelay
//!
//! Thin, tag-based logging API:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Dual output: colored console + file persistence
//!
//! ## Usage
//!
//! ```rust
//! use swaprelay::logger::{self, LogTag};
//!
//! logger::info(LogTag::Relay, "Selected jito/frankfurt");
//! logger::debug(LogTag::Cache, "Listing cache hit"); // Only if --debug-cache
//! logger::verbose(LogTag::Venue, "Raw pool account: ..."); // Only if --verbose
//! ```
//!
//! Call [`init`] once at startup, before any logging occurs.

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, init_from_args, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// Scans command-line arguments for debug flags and opens the log file.
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level
///
/// Only shown when the --debug-<module> flag for `tag` is present.
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (only with --verbose)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush pending log writes
pub fn flush() {
    file::flush_file_logging();
}
