use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::Serialize;

use crate::core::constants::window::{DEFAULT_HOURS, MILLIS_PER_HOUR};
use crate::core::types::LogEvent;

/// Normalize a lookback in hours. Non-positive and non-finite values fall
/// back to the default window.
pub fn normalize_hours(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 {
        hours
    } else {
        DEFAULT_HOURS
    }
}

/// Parse a lookback typed by an operator. Anything that is not a positive
/// number falls back to the default window.
pub fn parse_hours_lenient(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours > 0.0 => hours,
        _ => {
            warn!("Ignoring invalid window '{text}', using {DEFAULT_HOURS} hours");
            DEFAULT_HOURS
        }
    }
}

/// The trailing time span a report covers: everything strictly after
/// `now - hours`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    hours: f64,
    now: DateTime<Utc>,
    cutoff: DateTime<Utc>,
}

impl TimeWindow {
    /// A window ending at `now`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use logsift::analysis::TimeWindow;
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
    /// let window = TimeWindow::ending_at(24.0, now);
    /// assert_eq!(window.cutoff(), Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    ///
    /// // Non-positive input falls back to 24 hours
    /// assert_eq!(TimeWindow::ending_at(-3.0, now).hours(), 24.0);
    /// ```
    pub fn ending_at(hours: f64, now: DateTime<Utc>) -> Self {
        let hours = normalize_hours(hours);
        let span = Duration::milliseconds((hours * MILLIS_PER_HOUR).round() as i64);
        let cutoff = now.checked_sub_signed(span).unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { hours, now, cutoff }
    }

    /// A window ending at the current instant, read fresh on every call.
    pub fn ending_now(hours: f64) -> Self {
        Self::ending_at(hours, Utc::now())
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    /// Events without a timestamp can not be compared to the cutoff and are
    /// never contained.
    pub fn contains(&self, event: &LogEvent) -> bool {
        event.timestamp().is_some_and(|ts| ts > self.cutoff)
    }

    /// Keep only the events inside the window, preserving their order.
    pub fn retain(&self, events: Vec<LogEvent>) -> Vec<LogEvent> {
        events
            .into_iter()
            .filter(|event| self.contains(event))
            .collect()
    }

    /// Human readable description, e.g. "Last 24 hours".
    pub fn describe(&self) -> String {
        if self.hours == 1.0 {
            "Last 1 hour".to_string()
        } else {
            format!("Last {} hours", self.hours)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Level;
    use chrono::TimeZone;
    use serde_json::Map;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap()
    }

    fn event_hours_ago(hours: i64) -> LogEvent {
        LogEvent::new(
            Some(now() - Duration::hours(hours)),
            Level::Info,
            Map::new(),
        )
    }

    #[test]
    fn test_normalize_hours() {
        assert_eq!(normalize_hours(48.0), 48.0);
        assert_eq!(normalize_hours(0.5), 0.5);
        assert_eq!(normalize_hours(0.0), DEFAULT_HOURS);
        assert_eq!(normalize_hours(-1.0), DEFAULT_HOURS);
        assert_eq!(normalize_hours(f64::NAN), DEFAULT_HOURS);
        assert_eq!(normalize_hours(f64::INFINITY), DEFAULT_HOURS);
    }

    #[test]
    fn test_parse_hours_lenient() {
        assert_eq!(parse_hours_lenient("12"), 12.0);
        assert_eq!(parse_hours_lenient(" 1.5 "), 1.5);
        assert_eq!(parse_hours_lenient("abc"), DEFAULT_HOURS);
        assert_eq!(parse_hours_lenient("-4"), DEFAULT_HOURS);
        assert_eq!(parse_hours_lenient("0"), DEFAULT_HOURS);
        assert_eq!(parse_hours_lenient(""), DEFAULT_HOURS);
    }

    #[test]
    fn test_cutoff_is_exclusive() {
        let window = TimeWindow::ending_at(24.0, now());
        let at_cutoff = event_hours_ago(24);
        let inside = LogEvent::new(
            Some(window.cutoff() + Duration::seconds(1)),
            Level::Info,
            Map::new(),
        );

        assert!(!window.contains(&at_cutoff));
        assert!(window.contains(&inside));
    }

    #[test]
    fn test_thirty_hour_old_event() {
        let event = event_hours_ago(30);
        assert!(!TimeWindow::ending_at(24.0, now()).contains(&event));
        assert!(TimeWindow::ending_at(48.0, now()).contains(&event));
    }

    #[test]
    fn test_event_without_timestamp_is_excluded() {
        let event = LogEvent::new(None, Level::Error, Map::new());
        assert!(!TimeWindow::ending_at(10_000.0, now()).contains(&event));
    }

    #[test]
    fn test_fractional_hours() {
        let window = TimeWindow::ending_at(0.5, now());
        assert_eq!(window.cutoff(), now() - Duration::minutes(30));
    }

    #[test]
    fn test_retain_keeps_order() {
        let events = vec![event_hours_ago(1), event_hours_ago(50), event_hours_ago(2)];
        let kept = TimeWindow::ending_at(24.0, now()).retain(events.clone());
        assert_eq!(kept, vec![events[0].clone(), events[2].clone()]);
    }

    #[test]
    fn test_describe() {
        assert_eq!(TimeWindow::ending_at(24.0, now()).describe(), "Last 24 hours");
        assert_eq!(TimeWindow::ending_at(1.0, now()).describe(), "Last 1 hour");
        assert_eq!(TimeWindow::ending_at(1.5, now()).describe(), "Last 1.5 hours");
    }

    #[test]
    fn test_huge_window_does_not_overflow() {
        let window = TimeWindow::ending_at(1e12, now());
        assert!(window.contains(&event_hours_ago(100_000)));
    }
}
