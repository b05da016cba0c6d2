use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use std::cmp::Ordering;
use std::fmt;

use crate::core::constants::fields;
use crate::parsing::duration::parse_duration_ms;

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl Level {
    /// All levels, most severe first
    pub const ALL: [Level; 4] = [Level::Error, Level::Warn, Level::Info, Level::Debug];

    /// Look up a level by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Level> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured record reconstructed from a raw log line.
///
/// Events are immutable: the typed fields are extracted once from the JSON
/// payload when the event is built, and the payload itself is kept verbatim
/// in [`LogEvent::fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    timestamp: Option<DateTime<Utc>>,
    level: Level,
    method: Option<String>,
    url: Option<String>,
    status: Option<u16>,
    duration_ms: Option<u64>,
    user_id: Option<String>,
    error_category: Option<String>,
    security_event: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
    fields: Map<String, Value>,
}

impl LogEvent {
    /// Build an event from a resolved timestamp and level plus the JSON payload
    /// of the line.
    ///
    /// # Examples
    /// ```
    /// use logsift::core::types::{Level, LogEvent};
    /// use serde_json::json;
    ///
    /// let payload = json!({"method": "GET", "url": "/products", "duration": "42ms"});
    /// let event = LogEvent::new(None, Level::Info, payload.as_object().unwrap().clone());
    ///
    /// assert_eq!(event.endpoint().as_deref(), Some("GET /products"));
    /// assert_eq!(event.duration_ms(), Some(42));
    /// ```
    pub fn new(timestamp: Option<DateTime<Utc>>, level: Level, fields: Map<String, Value>) -> Self {
        Self {
            timestamp,
            level,
            method: text_field(&fields, fields::METHOD),
            url: text_field(&fields, fields::URL),
            status: fields.get(fields::STATUS).and_then(status_value),
            duration_ms: fields.get(fields::DURATION).and_then(parse_duration_ms),
            user_id: fields.get(fields::USER_ID).and_then(identifier_value),
            error_category: text_field(&fields, fields::ERROR_CATEGORY),
            security_event: fields.get(fields::SECURITY_EVENT).and_then(marker_value),
            message: text_field(&fields, fields::MESSAGE),
            request_id: fields.get(fields::REQUEST_ID).and_then(identifier_value),
            fields,
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Elapsed time normalized to milliseconds
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn error_category(&self) -> Option<&str> {
        self.error_category.as_deref()
    }

    /// Explicit security marker, present only when the source value was truthy
    pub fn security_event(&self) -> Option<&str> {
        self.security_event.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Every field of the JSON payload, as written
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up an arbitrary payload field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Events carrying both a method and a url describe a handled request.
    pub fn is_request(&self) -> bool {
        self.method.is_some() && self.url.is_some()
    }

    /// `"METHOD url"` for request events
    pub fn endpoint(&self) -> Option<String> {
        match (&self.method, &self.url) {
            (Some(method), Some(url)) => Some(format!("{method} {url}")),
            _ => None,
        }
    }

    /// Presentation order: newest first. Events without a timestamp sort last.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        other.timestamp.cmp(&self.timestamp)
    }
}

impl Serialize for LogEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = self
            .fields
            .keys()
            .filter(|key| *key != fields::TIMESTAMP && *key != fields::LEVEL)
            .count();
        let mut map = serializer.serialize_map(Some(extra + 2))?;

        match self.timestamp {
            Some(ts) => map.serialize_entry(
                fields::TIMESTAMP,
                &ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )?,
            None => map.serialize_entry(
                fields::TIMESTAMP,
                self.fields.get(fields::TIMESTAMP).unwrap_or(&Value::Null),
            )?,
        }
        map.serialize_entry(fields::LEVEL, &self.level)?;

        for (key, value) in &self.fields {
            if key != fields::TIMESTAMP && key != fields::LEVEL {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

fn text_field(payload: &Map<String, Value>, name: &str) -> Option<String> {
    match payload.get(name) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn status_value(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn identifier_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn marker_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
