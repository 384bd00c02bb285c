//! Run-log line format.

use chrono::{DateTime, TimeZone};

/// Timestamp layout of every log line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity of a log record; selects the console stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Status line, echoed to stdout.
    Normal,
    /// Completed step, echoed to stdout.
    Success,
    /// Failure line, echoed to stderr.
    Error,
}

/// Render `[YYYY-MM-DD HH:MM:SS] message`.
#[must_use]
pub fn format_line<Tz: TimeZone>(at: &DateTime<Tz>, message: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("[{}] {message}", at.format(TIMESTAMP_FORMAT))
}
