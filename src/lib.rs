//! logsift: reports over storefront application logs
//!
//! Log lines look like `2024-05-01 12:00:00 [ERROR] Payment failed {"orderId": 42}`.
//! Each line is turned into a [`LogEvent`] and the analyzer builds error,
//! API usage, security and summary reports over a trailing window of hours.

pub mod analysis;
pub mod config;
pub mod core;
pub mod parsing;
pub mod reporting;
pub mod ui;

// Re-export commonly used items
pub use analysis::{
    ApiUsageStats, EventSource, LogAnalyzer, LogDirectory, LogKind, SummaryReport, TimeWindow,
};
pub use config::{CliConfig, Config};
pub use core::{Level, LogEvent, LogSiftError, Result};
pub use parsing::{LineParser, PrefixZone};
