/// Filtering rules and dispatch
use super::config::{get_logger_config, is_debug_enabled_for_tag, is_verbose_enabled_for_tag};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Check if a log message should be displayed
///
/// 1. Errors are always shown
/// 2. Anything above the minimum threshold is dropped
/// 3. Debug requires --debug-<module> for that tag
/// 4. Verbose requires --verbose or --verbose-<module>
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    let config = get_logger_config();

    if level == LogLevel::Error {
        return true;
    }

    if level > config.min_level {
        return false;
    }

    match level {
        LogLevel::Debug => is_debug_enabled_for_tag(&config, tag),
        LogLevel::Verbose => {
            (config.min_level == LogLevel::Verbose && config.verbose_tags.is_empty())
                || is_verbose_enabled_for_tag(&config, tag)
        }
        _ => true,
    }
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(&tag, level, message);
}
