//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analysis::source::LogDirectory;
use crate::analysis::window::parse_hours_lenient;
use crate::analysis::summary::ReportLimits;
use crate::core::constants::{fields, limits, output_formats, sources, timezones, window};
use crate::core::error::{LogSiftError, Result};
use crate::parsing::PrefixZone;

/// Name of the config file looked up in the working directory and its parents
pub const CONFIG_FILE_NAME: &str = ".logsift.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the log files
    pub logs_dir: Option<String>,

    /// File name of the error-level log
    pub error_log: Option<String>,

    /// File name of the API access log
    pub api_log: Option<String>,

    /// File name of the combined log
    pub combined_log: Option<String>,

    /// Default lookback window in hours
    pub hours: Option<f64>,

    /// Output format (text, json, minimal)
    pub output_format: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,

    /// User id meaning "no authenticated user"
    pub anonymous_user: Option<String>,

    /// Zone of timestamps written without an offset (local, utc)
    pub timezone: Option<String>,

    /// Entries kept in the slowest request list
    pub slowest_limit: Option<usize>,

    /// Endpoints listed in the summary
    pub top_endpoints: Option<usize>,

    /// Errors listed in the summary
    pub recent_errors: Option<usize>,

    /// Security events listed in the summary
    pub recent_security_events: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logs_dir: Some(sources::DEFAULT_LOGS_DIR.to_string()),
            error_log: Some(sources::ERROR_LOG.to_string()),
            api_log: Some(sources::API_LOG.to_string()),
            combined_log: Some(sources::COMBINED_LOG.to_string()),
            hours: Some(window::DEFAULT_HOURS),
            output_format: Some(output_formats::DEFAULT.to_string()),
            verbose: Some(false),
            anonymous_user: Some(fields::ANONYMOUS_USER.to_string()),
            timezone: Some(timezones::DEFAULT.to_string()),
            slowest_limit: Some(limits::SLOWEST_REQUESTS),
            top_endpoints: Some(limits::TOP_ENDPOINTS),
            recent_errors: Some(limits::RECENT_ERRORS),
            recent_security_events: Some(limits::RECENT_SECURITY_EVENTS),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LogSiftError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Result<Self> {
        Self::load_from_dir(&std::env::current_dir()?)
    }

    /// Load the first config file found in `dir` or up to 3 of its parents.
    /// Only a missing file is skipped; one that fails to load is an error.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let found = dir
            .ancestors()
            .take(4)
            .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
            .find(|path| path.exists());

        match found {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        if let Some(ref hours) = cli_config.hours {
            self.hours = Some(parse_hours_lenient(hours));
        }
        if let Some(ref logs_dir) = cli_config.logs_dir {
            self.logs_dir = Some(logs_dir.clone());
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
        if cli_config.verbose {
            self.verbose = Some(true);
        }
        if cli_config.utc {
            self.timezone = Some(timezones::UTC.to_string());
        }
    }

    /// Log files as configured
    pub fn log_directory(&self) -> LogDirectory {
        LogDirectory::new(self.logs_dir.as_deref().unwrap_or(sources::DEFAULT_LOGS_DIR))
            .with_file_names(
                self.error_log.as_deref().unwrap_or(sources::ERROR_LOG),
                self.api_log.as_deref().unwrap_or(sources::API_LOG),
                self.combined_log.as_deref().unwrap_or(sources::COMBINED_LOG),
            )
    }

    pub fn report_limits(&self) -> ReportLimits {
        ReportLimits {
            slowest_requests: self.slowest_limit.unwrap_or(limits::SLOWEST_REQUESTS),
            top_endpoints: self.top_endpoints.unwrap_or(limits::TOP_ENDPOINTS),
            recent_errors: self.recent_errors.unwrap_or(limits::RECENT_ERRORS),
            recent_security_events: self
                .recent_security_events
                .unwrap_or(limits::RECENT_SECURITY_EVENTS),
        }
    }

    pub fn prefix_zone(&self) -> Result<PrefixZone> {
        PrefixZone::from_name(self.timezone.as_deref().unwrap_or(timezones::DEFAULT))
    }

    pub fn default_hours(&self) -> f64 {
        self.hours.unwrap_or(window::DEFAULT_HOURS)
    }

    pub fn anonymous_user(&self) -> &str {
        self.anonymous_user
            .as_deref()
            .unwrap_or(fields::ANONYMOUS_USER)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(hours) = self.hours
            && (!hours.is_finite() || hours <= 0.0)
        {
            return Err(LogSiftError::Config(format!(
                "Window of {hours} hours is invalid. Expected a positive number of hours."
            )));
        }

        for (name, value) in [
            ("logs_dir", &self.logs_dir),
            ("error_log", &self.error_log),
            ("api_log", &self.api_log),
            ("combined_log", &self.combined_log),
            ("anonymous_user", &self.anonymous_user),
        ] {
            if let Some(value) = value
                && value.trim().is_empty()
            {
                return Err(LogSiftError::Config(format!(
                    "Setting '{name}' cannot be empty."
                )));
            }
        }

        for (name, value) in [
            ("slowest_limit", self.slowest_limit),
            ("top_endpoints", self.top_endpoints),
            ("recent_errors", self.recent_errors),
            ("recent_security_events", self.recent_security_events),
        ] {
            if value == Some(0) {
                return Err(LogSiftError::Config(format!(
                    "Setting '{name}' cannot be 0. Expected a positive integer."
                )));
            }
        }

        if let Some(ref format) = self.output_format
            && !output_formats::ALL.contains(&format.as_str())
        {
            return Err(LogSiftError::Config(format!(
                "Invalid output format '{format}'. Expected one of: {}.",
                output_formats::ALL.join(", ")
            )));
        }

        self.prefix_zone()?;

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    pub hours: Option<String>,         // --hours, as typed
    pub logs_dir: Option<String>,      // --logs-dir
    pub output_format: Option<String>, // --format
    pub limit: Option<usize>,          // --limit
    pub utc: bool,                     // --utc
    pub quiet: bool,                   // --quiet
    pub verbose: bool,                 // --verbose
    pub config_file: Option<String>,   // --config
    pub no_config: bool,               // --no-config
}
