//! Output formatting and display logic for logsift reports
//!
//! Every renderer returns the finished text so callers decide where it goes.

use chrono::{DateTime, Utc};

use crate::analysis::api_stats::{ApiUsageStats, CountEntry, SlowRequest};
use crate::analysis::summary::SummaryReport;
use crate::analysis::window::TimeWindow;
use crate::core::constants::{display, output_formats};
use crate::core::error::Result;
use crate::core::types::LogEvent;
use crate::ui::color::{Colors, colorize, emphasize, level_color, rate_color};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Users and error categories listed in the stats report
const STATS_LIST_LIMIT: usize = 10;

/// Which report a set of events belongs to, for headings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventReport {
    Errors,
    Security,
}

impl EventReport {
    fn title(&self) -> &'static str {
        match self {
            EventReport::Errors => "Recent errors",
            EventReport::Security => "Security events",
        }
    }

    fn emoji(&self) -> &'static str {
        match self {
            EventReport::Errors => display::ERROR_EMOJI,
            EventReport::Security => display::SECURITY_EMOJI,
        }
    }

    fn empty_message(&self) -> &'static str {
        match self {
            EventReport::Errors => "No errors",
            EventReport::Security => "No security events",
        }
    }
}

/// Render the summary report
pub fn render_summary(report: &SummaryReport, format: &str) -> Result<String> {
    match format {
        output_formats::JSON => Ok(serde_json::to_string_pretty(report)?),
        output_formats::MINIMAL => Ok(summary_minimal(report)),
        _ => Ok(summary_text(report)),
    }
}

/// Render a list of error or security events. `limit` caps how many are shown.
pub fn render_events(
    kind: EventReport,
    events: &[LogEvent],
    window: &TimeWindow,
    format: &str,
    limit: Option<usize>,
) -> Result<String> {
    let shown = &events[..limit.unwrap_or(events.len()).min(events.len())];

    if format == output_formats::JSON {
        return Ok(serde_json::to_string_pretty(shown)?);
    }

    let rich = format == output_formats::TEXT;
    let mut out = String::new();
    out.push_str(&heading(
        &format!(
            "{} ({}): {}",
            kind.title(),
            window.describe(),
            events.len()
        ),
        kind.emoji(),
        rich,
    ));

    if events.is_empty() {
        if rich {
            out.push_str(&format!("{} {}\n", display::SUCCESS_EMOJI, kind.empty_message()));
        } else {
            out.push_str(&format!("{}\n", kind.empty_message()));
        }
        return Ok(out);
    }

    for (i, event) in shown.iter().enumerate() {
        out.push_str(&format!("{:4}. {}\n", i + 1, event_line(event, rich)));
    }
    if shown.len() < events.len() {
        out.push_str(&format!("      ... {} more\n", events.len() - shown.len()));
    }
    Ok(out)
}

/// Render the API usage statistics
pub fn render_stats(stats: &ApiUsageStats, window: &TimeWindow, format: &str) -> Result<String> {
    if format == output_formats::JSON {
        return Ok(serde_json::to_string_pretty(stats)?);
    }

    let rich = format == output_formats::TEXT;
    let mut out = heading(
        &format!("API usage ({})", window.describe()),
        display::STATS_EMOJI,
        rich,
    );

    out.push_str(&key_value("Total requests", stats.total_requests, rich));
    out.push_str(&key_value("Successful", stats.successful_requests, rich));
    out.push_str(&key_value("Errors", stats.error_requests, rich));
    out.push_str(&key_value("Success rate", format!("{}%", stats.success_rate()), rich));
    out.push_str(&key_value(
        "Average response time",
        format!("{}ms", stats.average_response_time),
        rich,
    ));

    out.push_str(&section("Methods", rich));
    for (method, count) in &stats.methods {
        out.push_str(&format!("  {method:<8} {count}\n"));
    }

    out.push_str(&section("Status codes", rich));
    for (status, count) in &stats.status_codes {
        out.push_str(&format!("  {status:<8} {count}\n"));
    }

    out.push_str(&section("Endpoints", rich));
    out.push_str(&ranked_lines(&stats.top_endpoints(stats.endpoints.len())));

    out.push_str(&section("Slowest requests", rich));
    out.push_str(&slow_lines(&stats.slowest_requests));

    out.push_str(&section("Most active users", rich));
    out.push_str(&ranked_lines(&stats.top_users(STATS_LIST_LIMIT)));

    out.push_str(&section("Errors by type", rich));
    out.push_str(&ranked_lines(&stats.top_error_types(STATS_LIST_LIMIT)));

    Ok(out)
}

fn summary_text(report: &SummaryReport) -> String {
    let counts = &report.summary;
    let mut out = heading(
        &format!("Log summary ({})", report.period),
        display::STATS_EMOJI,
        true,
    );
    out.push_str(&key_value(
        "Generated at",
        format_time(report.generated_at),
        true,
    ));
    out.push_str(&key_value("Total requests", counts.total_requests, true));

    let rate = format!("{}%", counts.success_rate);
    out.push_str(&format!(
        "{}: {}\n",
        label("Success rate", true),
        colorize(&rate, rate_color(counts.success_rate, counts.total_requests))
    ));
    out.push_str(&key_value("Errors", counts.error_count, true));
    out.push_str(&key_value("Security events", counts.security_events, true));
    out.push_str(&key_value(
        "Average response time",
        format!("{}ms", counts.average_response_time),
        true,
    ));

    out.push_str(&section("Top endpoints", true));
    out.push_str(&ranked_lines(&report.top_endpoints));

    out.push_str(&section(
        &format!("{} Recent errors", display::ERROR_EMOJI),
        true,
    ));
    out.push_str(&event_lines(&report.recent_errors, true));

    out.push_str(&section(
        &format!("{} Security events", display::SECURITY_EMOJI),
        true,
    ));
    out.push_str(&event_lines(&report.security_events, true));

    out.push_str(&section(
        &format!("{} Slowest requests", display::SLOW_EMOJI),
        true,
    ));
    out.push_str(&slow_lines(&report.slowest_requests));

    out
}

fn summary_minimal(report: &SummaryReport) -> String {
    let counts = &report.summary;
    let mut out = format!("Log summary ({})\n", report.period);
    out.push_str(&format!("Generated at: {}\n", format_time(report.generated_at)));
    out.push_str(&format!("Total requests: {}\n", counts.total_requests));
    out.push_str(&format!("Success rate: {}%\n", counts.success_rate));
    out.push_str(&format!("Errors: {}\n", counts.error_count));
    out.push_str(&format!("Security events: {}\n", counts.security_events));
    out.push_str(&format!(
        "Average response time: {}ms\n",
        counts.average_response_time
    ));
    out.push_str("\nTop endpoints\n");
    out.push_str(&ranked_lines(&report.top_endpoints));
    out.push_str("\nRecent errors\n");
    out.push_str(&event_lines(&report.recent_errors, false));
    out.push_str("\nSecurity events\n");
    out.push_str(&event_lines(&report.security_events, false));
    out.push_str("\nSlowest requests\n");
    out.push_str(&slow_lines(&report.slowest_requests));
    out
}

/// One event on one line: time, level, request, message
pub fn event_line(event: &LogEvent, rich: bool) -> String {
    let time = event
        .timestamp()
        .map(format_time)
        .unwrap_or_else(|| "-".to_string());

    let level = format!("[{}]", event.level());
    let level = if rich {
        colorize(&level, level_color(event.level()))
    } else {
        level
    };

    let mut line = format!("{time} {level}");
    if let Some(endpoint) = event.endpoint() {
        line.push(' ');
        line.push_str(&endpoint);
        if let Some(status) = event.status() {
            line.push_str(&format!(" {status}"));
        }
    }
    if let Some(message) = event.message() {
        line.push_str(" - ");
        line.push_str(message);
    }
    if let Some(marker) = event.security_event() {
        line.push_str(&format!(" (security: {marker})"));
    }
    if let Some(request_id) = event.request_id() {
        line.push_str(&format!(" req={request_id}"));
    }
    line
}

fn event_lines(events: &[LogEvent], rich: bool) -> String {
    if events.is_empty() {
        return "  none\n".to_string();
    }
    events
        .iter()
        .enumerate()
        .map(|(i, event)| format!("{:4}. {}\n", i + 1, event_line(event, rich)))
        .collect()
}

fn ranked_lines(entries: &[CountEntry]) -> String {
    if entries.is_empty() {
        return "  none\n".to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{:4}. {} ({})\n", i + 1, entry.name, entry.count))
        .collect()
}

fn slow_lines(requests: &[SlowRequest]) -> String {
    if requests.is_empty() {
        return "  none\n".to_string();
    }
    requests
        .iter()
        .enumerate()
        .map(|(i, request)| {
            let mut line = format!("{:4}. {}ms {}", i + 1, request.duration, request.endpoint);
            if let Some(ts) = request.timestamp {
                line.push_str(&format!(" at {}", format_time(ts)));
            }
            if let Some(ref request_id) = request.request_id {
                line.push_str(&format!(" req={request_id}"));
            }
            line.push('\n');
            line
        })
        .collect()
}

fn format_time(ts: DateTime<Utc>) -> String {
    ts.format(TIME_FORMAT).to_string()
}

fn heading(title: &str, emoji: &str, rich: bool) -> String {
    if rich {
        format!("{} {}\n\n", emoji, emphasize(title, Colors::BRIGHT_WHITE))
    } else {
        format!("{title}\n\n")
    }
}

fn section(title: &str, rich: bool) -> String {
    if rich {
        format!("\n{}\n", colorize(title, Colors::BRIGHT_CYAN))
    } else {
        format!("\n{title}\n")
    }
}

fn label(text: &str, rich: bool) -> String {
    if rich {
        emphasize(text, Colors::BRIGHT_CYAN)
    } else {
        text.to_string()
    }
}

fn key_value<V: std::fmt::Display>(key: &str, value: V, rich: bool) -> String {
    let value = value.to_string();
    let value = if rich {
        colorize(&value, Colors::BRIGHT_WHITE)
    } else {
        value
    };
    format!("{}: {}\n", label(key, rich), value)
}
