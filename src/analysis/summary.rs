//! Summary report composition

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::api_stats::{ApiUsageStats, CountEntry, SlowRequest};
use crate::analysis::window::TimeWindow;
use crate::core::constants::limits;
use crate::core::types::LogEvent;

/// How many entries each report list keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLimits {
    pub slowest_requests: usize,
    pub top_endpoints: usize,
    pub recent_errors: usize,
    pub recent_security_events: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            slowest_requests: limits::SLOWEST_REQUESTS,
            top_endpoints: limits::TOP_ENDPOINTS,
            recent_errors: limits::RECENT_ERRORS,
            recent_security_events: limits::RECENT_SECURITY_EVENTS,
        }
    }
}

/// Headline numbers of a summary report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounts {
    pub total_requests: u64,
    /// Rounded percentage
    pub success_rate: u64,
    pub error_count: u64,
    pub security_events: u64,
    /// Milliseconds
    pub average_response_time: u64,
}

/// One consistent snapshot of errors, API usage and security events for a
/// single window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub period: String,
    pub generated_at: DateTime<Utc>,
    pub summary: SummaryCounts,
    pub top_endpoints: Vec<CountEntry>,
    pub recent_errors: Vec<LogEvent>,
    pub security_events: Vec<LogEvent>,
    pub slowest_requests: Vec<SlowRequest>,
}

impl SummaryReport {
    /// Assemble a report from sub-reports computed for `window`. `errors` and
    /// `security` must already be sorted newest first.
    pub fn compose(
        window: &TimeWindow,
        mut errors: Vec<LogEvent>,
        stats: ApiUsageStats,
        mut security: Vec<LogEvent>,
        limits: &ReportLimits,
    ) -> Self {
        let summary = SummaryCounts {
            total_requests: stats.total_requests,
            success_rate: stats.success_rate(),
            error_count: errors.len() as u64,
            security_events: security.len() as u64,
            average_response_time: stats.average_response_time,
        };

        errors.truncate(limits.recent_errors);
        security.truncate(limits.recent_security_events);

        Self {
            period: window.describe(),
            generated_at: window.now(),
            summary,
            top_endpoints: stats.top_endpoints(limits.top_endpoints),
            recent_errors: errors,
            security_events: security,
            slowest_requests: stats.slowest_requests,
        }
    }
}
