use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use colored::Colorize;

/// Display pattern for log line timestamps: `YYYY-MM-DD HH:mm:ss.mmm`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
    Other,
}

impl LogStream {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "stderr:" => LogStream::Stderr,
            "stdout:" => LogStream::Stdout,
            _ => LogStream::Other,
        }
    }
}

/// Borrowed view of one raw activation log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    pub timestamp: &'a str,
    pub stream: LogStream,
    pub message: &'a str,
}

impl<'a> LogLine<'a> {
    /// Split `<timestamp> <stream> <message...>`. Missing parts are empty.
    pub fn parse(raw: &'a str) -> Self {
        let mut parts = raw.splitn(3, ' ');
        let timestamp = parts.next().unwrap_or("");
        let tag = parts.next().unwrap_or("");
        let message = parts.next().unwrap_or("");
        Self {
            timestamp,
            stream: LogStream::from_tag(tag),
            message,
        }
    }
}

/// Renders raw log lines for the terminal, with timestamps shown in `Tz`.
#[derive(Debug, Clone)]
pub struct LogLineFormatter<Tz: TimeZone = Local> {
    tz: Tz,
}

impl LogLineFormatter<Local> {
    pub fn new() -> Self {
        Self::with_timezone(Local)
    }
}

impl Default for LogLineFormatter<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tz: TimeZone> LogLineFormatter<Tz>
where
    Tz::Offset: Display,
{
    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz }
    }

    /// Format one raw line as `<timestamp> <message>`. Stderr messages are
    /// shown in red; the timestamp is never affected by the stream.
    pub fn format(&self, raw: &str) -> String {
        let line = LogLine::parse(raw);
        let timestamp = self.format_timestamp(line.timestamp);
        let message = match line.stream {
            LogStream::Stderr => line.message.red().to_string(),
            LogStream::Stdout | LogStream::Other => line.message.to_string(),
        };
        format!("{} {}", timestamp.green(), message)
    }

    /// Reformat a timestamp token, passing it through unchanged if it does
    /// not parse.
    pub fn format_timestamp(&self, token: &str) -> String {
        match parse_timestamp(token) {
            Some(ts) => ts
                .with_timezone(&self.tz)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
            None => token.to_string(),
        }
    }
}

fn parse_timestamp(token: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(token) {
        return Some(ts.with_timezone(&Utc));
    }
    // Zone-less timestamps are taken as UTC
    NaiveDateTime::parse_from_str(token, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ts| ts.and_utc())
}

/// Header line introducing an activation's log lines.
pub fn format_activation_header(activation_id: &str) -> String {
    format!("{} ({}):", "activation".blue(), activation_id.yellow())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc() -> LogLineFormatter<Utc> {
        LogLineFormatter::with_timezone(Utc)
    }

    #[test]
    fn test_parse_line() {
        let line = LogLine::parse("2017-05-09T15:50:00.123Z stderr: something  went wrong");
        assert_eq!(line.timestamp, "2017-05-09T15:50:00.123Z");
        assert_eq!(line.stream, LogStream::Stderr);
        assert_eq!(line.message, "something  went wrong");
    }

    #[test]
    fn test_parse_short_line() {
        let line = LogLine::parse("2017-05-09T15:50:00.123Z");
        assert_eq!(line.stream, LogStream::Other);
        assert_eq!(line.message, "");

        let line = LogLine::parse("");
        assert_eq!(line.timestamp, "");
        assert_eq!(line.message, "");
    }

    #[test]
    fn test_format_stdout_line() {
        let out = utc().format("2017-05-09T15:50:00.123456789Z stdout: hello world");
        assert_eq!(
            out,
            format!("{} {}", "2017-05-09 15:50:00.123".green(), "hello world")
        );
    }

    #[test]
    fn test_format_stderr_line_is_marked() {
        let out = utc().format("2017-05-09T15:50:00.123Z stderr: boom");
        assert_eq!(
            out,
            format!("{} {}", "2017-05-09 15:50:00.123".green(), "boom".red())
        );
    }

    #[test]
    fn test_unknown_stream_tag_is_plain() {
        let out = utc().format("2017-05-09T15:50:00.123Z console: note");
        assert_eq!(out, format!("{} {}", "2017-05-09 15:50:00.123".green(), "note"));
    }

    #[test]
    fn test_unparseable_timestamp_passes_through() {
        let out = utc().format("yesterday stdout: still shown");
        assert_eq!(out, format!("{} {}", "yesterday".green(), "still shown"));
    }

    #[test]
    fn test_missing_parts_do_not_fail() {
        let out = utc().format("garbage");
        assert_eq!(out, format!("{} ", "garbage".green()));
    }

    #[test]
    fn test_timestamp_rendered_in_display_timezone() {
        let cet = FixedOffset::east_opt(3600).unwrap();
        let formatter = LogLineFormatter::with_timezone(cet);
        assert_eq!(
            formatter.format_timestamp("2017-05-09T23:30:00.5Z"),
            "2017-05-10 00:30:00.500"
        );
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        assert_eq!(
            utc().format_timestamp("2017-05-09T15:50:00.123"),
            "2017-05-09 15:50:00.123"
        );
    }
}
