//! User interface
//!
//! This module contains CLI parsing, terminal color handling
//! and shell completion generation.

pub mod cli;
pub mod color;
pub mod completion;

// Re-export commonly used items
pub use cli::{Cli, Commands, cli_to_config};
pub use completion::print_completions;
