//! Reporting
//!
//! This module renders analysis results for the terminal and handles
//! structured logging for the application.

pub mod logging;
pub mod output;

// Re-export commonly used items
pub use output::{EventReport, render_events, render_stats, render_summary};
