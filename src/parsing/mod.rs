//! Log line parsing
//!
//! This module turns raw log lines into structured events and
//! normalizes the numeric fields they carry.

pub mod duration;
pub mod parser;

// Re-export commonly used items
pub use duration::parse_duration_ms;
pub use parser::{LineParser, PrefixZone, extract_payload};
