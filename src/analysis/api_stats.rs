//! API usage aggregation
//!
//! All statistics are computed in one pass over the windowed events of the
//! API log. Only events carrying both a method and a url count as requests.

use chrono::{DateTime, Utc};
use serde::Serialize;

use std::collections::BTreeMap;

use crate::core::constants::http_status::{SUCCESS_END, SUCCESS_MIN};
use crate::core::types::LogEvent;

/// One entry of the slowest request list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlowRequest {
    pub endpoint: String,
    /// Milliseconds
    pub duration: u64,
    pub timestamp: Option<DateTime<Utc>>,
    pub request_id: Option<String>,
}

/// A key with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUsageStats {
    pub total_requests: u64,
    /// Status in [200, 400)
    pub successful_requests: u64,
    /// Every other request, including requests without a status
    pub error_requests: u64,
    /// `"METHOD url"` -> count
    pub endpoints: BTreeMap<String, u64>,
    pub methods: BTreeMap<String, u64>,
    pub status_codes: BTreeMap<u16, u64>,
    /// Rounded mean in milliseconds over requests that carry a duration
    pub average_response_time: u64,
    pub slowest_requests: Vec<SlowRequest>,
    pub most_active_users: BTreeMap<String, u64>,
    pub errors_by_type: BTreeMap<String, u64>,
}

impl ApiUsageStats {
    /// Aggregate already windowed events.
    ///
    /// `anonymous_user` is the user id meaning "no authenticated user"; it is
    /// left out of `most_active_users`. At most `slowest_limit` entries are
    /// kept in `slowest_requests`.
    pub fn from_events(events: &[LogEvent], anonymous_user: &str, slowest_limit: usize) -> Self {
        let mut stats = Self::default();
        let mut duration_sum: u128 = 0;
        let mut duration_count: u128 = 0;
        let mut timed: Vec<SlowRequest> = Vec::new();

        for event in events {
            if let Some(user) = event.user_id()
                && user != anonymous_user
            {
                *stats.most_active_users.entry(user.to_string()).or_insert(0) += 1;
            }
            if let Some(category) = event.error_category() {
                *stats.errors_by_type.entry(category.to_string()).or_insert(0) += 1;
            }

            let (Some(method), Some(endpoint)) = (event.method(), event.endpoint()) else {
                continue;
            };

            stats.total_requests += 1;
            match event.status() {
                Some(status) if (SUCCESS_MIN..SUCCESS_END).contains(&status) => {
                    stats.successful_requests += 1;
                }
                _ => stats.error_requests += 1,
            }
            if let Some(status) = event.status() {
                *stats.status_codes.entry(status).or_insert(0) += 1;
            }
            *stats.methods.entry(method.to_string()).or_insert(0) += 1;
            *stats.endpoints.entry(endpoint.clone()).or_insert(0) += 1;

            if let Some(duration) = event.duration_ms() {
                duration_sum += u128::from(duration);
                duration_count += 1;
                timed.push(SlowRequest {
                    endpoint,
                    duration,
                    timestamp: event.timestamp(),
                    request_id: event.request_id().map(str::to_string),
                });
            }
        }

        if duration_count > 0 {
            let rounded = (duration_sum + duration_count / 2) / duration_count;
            stats.average_response_time = u64::try_from(rounded).unwrap_or(u64::MAX);
        }

        // Stable: equal durations keep the order they were logged in
        timed.sort_by(|a, b| b.duration.cmp(&a.duration));
        timed.truncate(slowest_limit);
        stats.slowest_requests = timed;

        stats
    }

    /// Rounded percentage of successful requests, 0 when there were none.
    pub fn success_rate(&self) -> u64 {
        if self.total_requests == 0 {
            return 0;
        }
        (self.successful_requests * 100 + self.total_requests / 2) / self.total_requests
    }

    /// The `n` most requested endpoints.
    pub fn top_endpoints(&self, n: usize) -> Vec<CountEntry> {
        ranked(&self.endpoints, n)
    }

    /// The `n` users with the most requests.
    pub fn top_users(&self, n: usize) -> Vec<CountEntry> {
        ranked(&self.most_active_users, n)
    }

    /// The `n` most frequent error categories.
    pub fn top_error_types(&self, n: usize) -> Vec<CountEntry> {
        ranked(&self.errors_by_type, n)
    }
}

/// Count descending, name ascending for ties.
fn ranked(counts: &BTreeMap<String, u64>, n: usize) -> Vec<CountEntry> {
    let mut entries: Vec<CountEntry> = counts
        .iter()
        .map(|(name, &count)| CountEntry {
            name: name.clone(),
            count,
        })
        .collect();
    // BTreeMap iteration is already name-ascending and the sort is stable
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(n);
    entries
}
