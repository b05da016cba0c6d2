//! Error report generation

use crate::analysis::window::TimeWindow;
use crate::core::types::LogEvent;

/// Events of the error log inside the window, newest first.
pub fn recent_errors(events: Vec<LogEvent>, window: &TimeWindow) -> Vec<LogEvent> {
    let mut errors = window.retain(events);
    errors.sort_by(LogEvent::cmp_newest_first);
    errors
}
