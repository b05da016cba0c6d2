//! Security event detection
//!
//! An event is security relevant when it carries an explicit `securityEvent`
//! marker, or when its message contains the literal, case-sensitive word
//! `Security`. The two checks are kept apart so each can be reasoned about on
//! its own; the detector is their OR. Messages that express security relevance
//! in other words are not detected.

use crate::analysis::window::TimeWindow;
use crate::core::constants::fields::SECURITY_KEYWORD;
use crate::core::types::LogEvent;

/// The event carries a truthy `securityEvent` field.
pub fn has_security_marker(event: &LogEvent) -> bool {
    event.security_event().is_some()
}

/// The event message contains `Security`.
pub fn mentions_security(event: &LogEvent) -> bool {
    event
        .message()
        .is_some_and(|message| message.contains(SECURITY_KEYWORD))
}

pub fn is_security_event(event: &LogEvent) -> bool {
    has_security_marker(event) || mentions_security(event)
}

/// Security relevant events inside the window, newest first.
pub fn security_events(events: Vec<LogEvent>, window: &TimeWindow) -> Vec<LogEvent> {
    let mut flagged: Vec<LogEvent> = window
        .retain(events)
        .into_iter()
        .filter(is_security_event)
        .collect();
    flagged.sort_by(LogEvent::cmp_newest_first);
    flagged
}
