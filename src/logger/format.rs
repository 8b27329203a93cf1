//! Log formatting and output with ANSI colors

use super::file::write_to_file;
use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

const TAG_WIDTH: usize = 9;
const LEVEL_WIDTH: usize = 7;

/// Format and output a log message
pub fn format_and_log(tag: &LogTag, level: LogLevel, message: &str) {
    let now = Local::now();
    let time = now.format("%H:%M:%S").to_string().dimmed();
    let tag_str = format_tag(tag);
    let level_str = format_level(level);

    let mut lines = message.split('\n');
    let first = lines.next().unwrap_or_default();
    print_stdout_safe(&format!("{} [{}] [{}] {}", time, tag_str, level_str, first));

    let timestamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let tag_clean = tag.to_plain_string();
    write_to_file(&format!("{} [{}] [{}] {}", timestamp, tag_clean, level, first));

    let continuation = " ".repeat(8 + TAG_WIDTH + LEVEL_WIDTH + 6);
    for line in lines {
        print_stdout_safe(&format!("{}{}", continuation, line));
        write_to_file(&format!("{} [{}] [{}] {}", timestamp, tag_clean, level, line));
    }
}

fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Cache => label.bright_cyan().bold(),
        LogTag::Pool => label.bright_blue().bold(),
        LogTag::Venue => label.bright_green().bold(),
        LogTag::Compiler => label.bright_magenta().bold(),
        LogTag::Relay => label.bright_purple().bold(),
        LogTag::Rpc => label.cyan().bold(),
        LogTag::Swap => label.magenta().bold(),
        LogTag::Other(_) => label.white().bold(),
    }
}

fn format_level(level: LogLevel) -> ColoredString {
    let label = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => label.bright_red().bold(),
        LogLevel::Warning => label.yellow().bold(),
        LogLevel::Info => label.white().bold(),
        LogLevel::Debug | LogLevel::Verbose => label.dimmed(),
    }
}

/// Print to stdout but ignore broken pipe errors
fn print_stdout_safe(message: &str) {
    if let Err(e) = writeln!(stdout(), "{}", message) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        let _ = writeln!(std::io::stderr(), "Logger stdout error: {}", e);
    }
}
