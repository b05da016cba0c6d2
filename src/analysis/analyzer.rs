use crate::analysis::api_stats::ApiUsageStats;
use crate::analysis::errors::recent_errors;
use crate::analysis::security::security_events;
use crate::analysis::source::{EventSource, LogDirectory, LogKind};
use crate::analysis::summary::{ReportLimits, SummaryReport};
use crate::analysis::window::{TimeWindow, normalize_hours};
use crate::config::Config;
use crate::core::constants::{fields, window};
use crate::core::error::Result;
use crate::core::types::LogEvent;
use crate::parsing::LineParser;
use crate::reporting::logging;

/// Entry point for every report.
///
/// Each call reads its log sources fresh, so repeated calls never share
/// state. Reading trouble never escapes a report: it is logged and the report
/// degrades to "no data".
#[derive(Debug, Clone)]
pub struct LogAnalyzer<S = LogDirectory> {
    source: S,
    parser: LineParser,
    limits: ReportLimits,
    anonymous_user: String,
    default_hours: f64,
}

impl LogAnalyzer<LogDirectory> {
    /// Analyzer over the log files described by a validated config.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(LogAnalyzer::new(config.log_directory())
            .with_parser(LineParser::new(config.prefix_zone()?))
            .with_limits(config.report_limits())
            .with_anonymous_user(config.anonymous_user())
            .with_default_hours(config.default_hours()))
    }
}

impl<S: EventSource> LogAnalyzer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            parser: LineParser::default(),
            limits: ReportLimits::default(),
            anonymous_user: fields::ANONYMOUS_USER.to_string(),
            default_hours: window::DEFAULT_HOURS,
        }
    }

    pub fn with_parser(mut self, parser: LineParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_limits(mut self, limits: ReportLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_anonymous_user(mut self, anonymous_user: impl Into<String>) -> Self {
        self.anonymous_user = anonymous_user.into();
        self
    }

    pub fn with_default_hours(mut self, hours: f64) -> Self {
        self.default_hours = normalize_hours(hours);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn limits(&self) -> &ReportLimits {
        &self.limits
    }

    /// A window ending now. `None` uses the configured default.
    pub fn window(&self, hours: Option<f64>) -> TimeWindow {
        TimeWindow::ending_now(hours.unwrap_or(self.default_hours))
    }

    /// Error log entries inside the window, newest first.
    pub fn recent_errors(&self, hours: Option<f64>) -> Vec<LogEvent> {
        self.recent_errors_in(&self.window(hours))
    }

    /// API usage statistics for the window.
    pub fn api_usage_stats(&self, hours: Option<f64>) -> ApiUsageStats {
        self.api_usage_stats_in(&self.window(hours))
    }

    /// Security relevant entries of the combined log, newest first.
    pub fn security_events(&self, hours: Option<f64>) -> Vec<LogEvent> {
        self.security_events_in(&self.window(hours))
    }

    /// Errors, API usage and security events for one window and one "now".
    pub fn summary_report(&self, hours: Option<f64>) -> SummaryReport {
        self.summary_report_in(&self.window(hours))
    }

    pub fn recent_errors_in(&self, window: &TimeWindow) -> Vec<LogEvent> {
        self.try_load(LogKind::Error)
            .map(|events| recent_errors(events, window))
            .unwrap_or_default()
    }

    pub fn api_usage_stats_in(&self, window: &TimeWindow) -> ApiUsageStats {
        self.try_load(LogKind::Api)
            .map(|events| {
                ApiUsageStats::from_events(
                    &window.retain(events),
                    &self.anonymous_user,
                    self.limits.slowest_requests,
                )
            })
            .unwrap_or_default()
    }

    pub fn security_events_in(&self, window: &TimeWindow) -> Vec<LogEvent> {
        self.try_load(LogKind::Combined)
            .map(|events| security_events(events, window))
            .unwrap_or_default()
    }

    pub fn summary_report_in(&self, window: &TimeWindow) -> SummaryReport {
        SummaryReport::compose(
            window,
            self.recent_errors_in(window),
            self.api_usage_stats_in(window),
            self.security_events_in(window),
            &self.limits,
        )
    }

    /// Load a source, logging any failure. `None` means the load failed and
    /// the caller should fall back to its empty result.
    fn try_load(&self, kind: LogKind) -> Option<Vec<LogEvent>> {
        match self.source.load(kind, &self.parser) {
            Ok(events) => Some(events),
            Err(err) => {
                logging::log_error(&format!("Could not read {kind} log"), Some(&err));
                None
            }
        }
    }
}
