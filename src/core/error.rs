use std::fmt;

/// Error types for logsift operations
#[derive(Debug)]
pub enum LogSiftError {
    /// IO error while reading a log source or config file
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// JSON serialization error
    Json(serde_json::Error),
}

impl fmt::Display for LogSiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSiftError::Io(err) => write!(f, "IO error: {err}"),
            LogSiftError::Config(msg) => write!(f, "Configuration error: {msg}"),
            LogSiftError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            LogSiftError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for LogSiftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogSiftError::Io(err) => Some(err),
            LogSiftError::TomlParsing(err) => Some(err),
            LogSiftError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LogSiftError {
    fn from(err: std::io::Error) -> Self {
        LogSiftError::Io(err)
    }
}

impl From<toml::de::Error> for LogSiftError {
    fn from(err: toml::de::Error) -> Self {
        LogSiftError::TomlParsing(err)
    }
}

impl From<serde_json::Error> for LogSiftError {
    fn from(err: serde_json::Error) -> Self {
        LogSiftError::Json(err)
    }
}

/// Type alias for Results using LogSiftError
pub type Result<T> = std::result::Result<T, LogSiftError>;
