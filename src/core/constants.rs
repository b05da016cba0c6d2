/// Application-wide constants to avoid magic values throughout the codebase.
///
/// This module centralizes the log file names, report limits and other literal
/// values shared by the parser, the analyzers and the CLI.
/// Output format constants
pub mod output_formats {
    /// Text output format - colorful, emoji-enhanced report
    pub const TEXT: &str = "text";
    /// JSON output format - structured output for automation
    pub const JSON: &str = "json";
    /// Minimal output format - plain text without colors or emojis
    pub const MINIMAL: &str = "minimal";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 3] = [TEXT, JSON, MINIMAL];
}

/// Log source locations
pub mod sources {
    /// Directory holding the log files, relative to the working directory
    pub const DEFAULT_LOGS_DIR: &str = "logs";
    /// Error-level log written by the request-logging middleware
    pub const ERROR_LOG: &str = "error.log";
    /// One line per handled API request
    pub const API_LOG: &str = "api.log";
    /// All severities
    pub const COMBINED_LOG: &str = "combined.log";
}

/// Time window constants
pub mod window {
    /// Default lookback window in hours
    pub const DEFAULT_HOURS: f64 = 24.0;
    /// Milliseconds per hour
    pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;
}

/// Timezone used to interpret zone-less line prefixes
pub mod timezones {
    pub const LOCAL: &str = "local";
    pub const UTC: &str = "utc";

    pub const DEFAULT: &str = LOCAL;

    pub const ALL: [&str; 2] = [LOCAL, UTC];
}

/// Report size limits
pub mod limits {
    /// Entries kept in the slowest request list
    pub const SLOWEST_REQUESTS: usize = 10;
    /// Endpoints listed in the summary
    pub const TOP_ENDPOINTS: usize = 10;
    /// Errors listed in the summary
    pub const RECENT_ERRORS: usize = 10;
    /// Security events listed in the summary
    pub const RECENT_SECURITY_EVENTS: usize = 5;
}

/// Field names and reserved values found in the JSON payload of a log line
pub mod fields {
    pub const TIMESTAMP: &str = "timestamp";
    pub const LEVEL: &str = "level";
    pub const METHOD: &str = "method";
    pub const URL: &str = "url";
    pub const STATUS: &str = "status";
    pub const DURATION: &str = "duration";
    pub const USER_ID: &str = "userId";
    pub const ERROR_CATEGORY: &str = "errorCategory";
    pub const SECURITY_EVENT: &str = "securityEvent";
    pub const MESSAGE: &str = "message";
    pub const REQUEST_ID: &str = "requestId";

    /// User id written for requests without an authenticated user
    pub const ANONYMOUS_USER: &str = "anonymous";
    /// Substring that marks a message as security relevant
    pub const SECURITY_KEYWORD: &str = "Security";
}

/// HTTP status ranges
pub mod http_status {
    /// First status counted as a successful request
    pub const SUCCESS_MIN: u16 = 200;
    /// First status no longer counted as successful (exclusive bound)
    pub const SUCCESS_END: u16 = 400;
}

/// Display and formatting constants
pub mod display {
    /// Emoji for success status
    pub const SUCCESS_EMOJI: &str = "✅";
    /// Emoji for error status
    pub const ERROR_EMOJI: &str = "❌";
    /// Emoji for security events
    pub const SECURITY_EMOJI: &str = "🔒";
    /// Emoji for request statistics
    pub const STATS_EMOJI: &str = "📊";
    /// Emoji for slow requests
    pub const SLOW_EMOJI: &str = "🐢";
}
