//! Log analysis
//!
//! This module reads the log sources, applies the time window and
//! computes the error, API usage, security and summary reports.

pub mod analyzer;
pub mod api_stats;
pub mod errors;
pub mod security;
pub mod source;
pub mod summary;
pub mod window;

// Re-export commonly used items
pub use analyzer::LogAnalyzer;
pub use api_stats::{ApiUsageStats, CountEntry, SlowRequest};
pub use source::{EventSource, LogDirectory, LogKind};
pub use summary::{ReportLimits, SummaryCounts, SummaryReport};
pub use window::TimeWindow;
