use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use memchr::memrchr3_iter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::core::constants::{fields, timezones};
use crate::core::error::{LogSiftError, Result};
use crate::core::types::{Level, LogEvent};

const TIMESTAMP_PREFIX_PATTERN: &str = r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})";
const LEVEL_TAG_PATTERN: &str = r"\[(ERROR|WARN|INFO|DEBUG)\]";

const PREFIX_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const PAYLOAD_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

static TIMESTAMP_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(TIMESTAMP_PREFIX_PATTERN).expect("Failed to compile timestamp prefix pattern")
});

static LEVEL_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(LEVEL_TAG_PATTERN).expect("Failed to compile level tag pattern"));

/// Zone used for timestamps written without an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixZone {
    #[default]
    Local,
    Utc,
}

impl PrefixZone {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            timezones::LOCAL => Ok(PrefixZone::Local),
            timezones::UTC => Ok(PrefixZone::Utc),
            other => Err(LogSiftError::Config(format!(
                "Invalid timezone '{other}'. Expected one of: {}.",
                timezones::ALL.join(", ")
            ))),
        }
    }

    /// Pin a zone-less timestamp to an instant. Local times that fall into a
    /// DST gap have no instant and yield `None`.
    pub fn resolve(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            PrefixZone::Utc => Some(naive.and_utc()),
            PrefixZone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// Turns raw log lines into [`LogEvent`]s.
///
/// A line is expected to look like
/// `2024-05-01 12:00:00 [ERROR] free text {"json": "payload"}`: an optional
/// timestamp prefix, an optional bracketed level and a trailing JSON object.
/// Only the JSON object is mandatory.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineParser {
    zone: PrefixZone,
}

impl LineParser {
    pub fn new(zone: PrefixZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> PrefixZone {
        self.zone
    }

    /// Parse one line. Returns `None` for blank lines, banners, stack trace
    /// continuations and anything else without a well-formed trailing JSON
    /// object.
    pub fn parse_line(&self, line: &str) -> Option<LogEvent> {
        let payload = extract_payload(line)?;

        let timestamp = self
            .prefix_timestamp(line)
            .or_else(|| self.payload_timestamp(&payload));
        let level = level_tag(line)
            .or_else(|| payload_level(&payload))
            .unwrap_or_default();

        Some(LogEvent::new(timestamp, level, payload))
    }

    /// Parse every line of a text block, skipping lines that do not parse.
    pub fn parse_lines(&self, text: &str) -> Vec<LogEvent> {
        text.lines()
            .filter_map(|line| self.parse_line(line))
            .collect()
    }

    fn prefix_timestamp(&self, line: &str) -> Option<DateTime<Utc>> {
        let captures = TIMESTAMP_PREFIX.captures(line)?;
        let naive = NaiveDateTime::parse_from_str(&captures[1], PREFIX_FORMAT).ok()?;
        self.zone.resolve(naive)
    }

    fn payload_timestamp(&self, payload: &Map<String, Value>) -> Option<DateTime<Utc>> {
        match payload.get(fields::TIMESTAMP)? {
            Value::String(text) => {
                let text = text.trim();
                if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                    return Some(dt.with_timezone(&Utc));
                }
                PAYLOAD_FORMATS
                    .iter()
                    .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                    .and_then(|naive| self.zone.resolve(naive))
            }
            Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
            _ => None,
        }
    }
}

fn level_tag(line: &str) -> Option<Level> {
    let captures = LEVEL_TAG.captures(line)?;
    Level::from_name(&captures[1])
}

fn payload_level(payload: &Map<String, Value>) -> Option<Level> {
    payload
        .get(fields::LEVEL)
        .and_then(Value::as_str)
        .and_then(Level::from_name)
}

/// Find and decode the trailing JSON object of a line.
///
/// The final `}` is matched with its opening brace in one right-to-left pass
/// that skips braces inside JSON strings, so braces in free text or inside
/// string values do not cut the payload short.
pub fn extract_payload(line: &str) -> Option<Map<String, Value>> {
    let trimmed = line.trim_end();
    let bytes = trimmed.as_bytes();
    if bytes.last() != Some(&b'}') {
        return None;
    }

    let start = matching_open_brace(bytes)?;
    serde_json::from_str(&trimmed[start..]).ok()
}

/// Position of the `{` that the last byte of `bytes` (a `}`) closes.
fn matching_open_brace(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;

    for pos in memrchr3_iter(b'{', b'}', b'"', bytes) {
        match bytes[pos] {
            b'"' if !is_escaped(bytes, pos) => in_string = !in_string,
            _ if in_string => {}
            b'}' => depth += 1,
            b'{' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
    }

    None
}

/// A quote is escaped when an odd number of backslashes precedes it.
fn is_escaped(bytes: &[u8], pos: usize) -> bool {
    bytes[..pos]
        .iter()
        .rev()
        .take_while(|&&byte| byte == b'\\')
        .count()
        % 2
        == 1
}
