use grep::regex::RegexMatcher;
use grep::searcher::Searcher;
use grep::searcher::sinks::Lossy;
use log::{debug, trace};
use once_cell::sync::Lazy;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::constants::sources;
use crate::core::error::Result;
use crate::core::types::LogEvent;
use crate::parsing::LineParser;

// Every parseable line ends with a JSON object, so lines without a closing
// brace are dropped by the searcher before they reach the parser.
static PAYLOAD_MATCHER: Lazy<RegexMatcher> =
    Lazy::new(|| RegexMatcher::new(r"\}").expect("Failed to compile payload line pattern"));

/// The logical log files written by the request-logging middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// Error-level entries only
    Error,
    /// One entry per handled API request
    Api,
    /// Every severity
    Combined,
}

impl LogKind {
    pub const ALL: [LogKind; 3] = [LogKind::Error, LogKind::Api, LogKind::Combined];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Error => "error",
            LogKind::Api => "api",
            LogKind::Combined => "combined",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supplies the parsed events of one log source.
pub trait EventSource {
    /// All parseable events of the source, in file order. A source that does
    /// not exist yet yields no events; other I/O failures are errors.
    fn load(&self, kind: LogKind, parser: &LineParser) -> Result<Vec<LogEvent>>;
}

/// Log files addressed by fixed names inside one logs directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirectory {
    root: PathBuf,
    error_log: String,
    api_log: String,
    combined_log: String,
}

impl Default for LogDirectory {
    fn default() -> Self {
        Self::new(sources::DEFAULT_LOGS_DIR)
    }
}

impl LogDirectory {
    /// A logs directory using the default file names.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            error_log: sources::ERROR_LOG.to_string(),
            api_log: sources::API_LOG.to_string(),
            combined_log: sources::COMBINED_LOG.to_string(),
        }
    }

    /// Override the file names used for each source.
    pub fn with_file_names(
        mut self,
        error_log: impl Into<String>,
        api_log: impl Into<String>,
        combined_log: impl Into<String>,
    ) -> Self {
        self.error_log = error_log.into();
        self.api_log = api_log.into();
        self.combined_log = combined_log.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, kind: LogKind) -> PathBuf {
        let name = match kind {
            LogKind::Error => &self.error_log,
            LogKind::Api => &self.api_log,
            LogKind::Combined => &self.combined_log,
        };
        self.root.join(name)
    }

    fn read_events(path: &Path, parser: &LineParser) -> io::Result<Vec<LogEvent>> {
        let mut events = Vec::new();
        let mut skipped = 0usize;

        Searcher::new().search_path(
            &*PAYLOAD_MATCHER,
            path,
            Lossy(|_line_number, line| {
                match parser.parse_line(line) {
                    Some(event) => events.push(event),
                    None => skipped += 1,
                }
                Ok(true)
            }),
        )?;

        trace!(
            "Skipped {skipped} unparseable line(s) in {}",
            path.display()
        );
        Ok(events)
    }
}

impl EventSource for LogDirectory {
    fn load(&self, kind: LogKind, parser: &LineParser) -> Result<Vec<LogEvent>> {
        let path = self.path_of(kind);

        match Self::read_events(&path, parser) {
            Ok(events) => {
                debug!(
                    "Read {} event(s) from {} log {}",
                    events.len(),
                    kind,
                    path.display()
                );
                Ok(events)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("No {kind} log at {} yet", path.display());
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LogSiftError;
    use crate::parsing::PrefixZone;
    use std::fs;
    use tempfile::TempDir;

    fn parser() -> LineParser {
        LineParser::new(PrefixZone::Utc)
    }

    #[test]
    fn test_path_of_default_names() {
        let dir = LogDirectory::new("/var/log/shop");
        assert_eq!(
            dir.path_of(LogKind::Error),
            PathBuf::from("/var/log/shop/error.log")
        );
        assert_eq!(
            dir.path_of(LogKind::Api),
            PathBuf::from("/var/log/shop/api.log")
        );
        assert_eq!(
            dir.path_of(LogKind::Combined),
            PathBuf::from("/var/log/shop/combined.log")
        );
    }

    #[test]
    fn test_path_of_custom_names() {
        let dir = LogDirectory::new("logs").with_file_names("e.txt", "a.txt", "all.txt");
        assert_eq!(dir.path_of(LogKind::Api), PathBuf::from("logs/a.txt"));
        assert_eq!(dir.root(), Path::new("logs"));
    }

    #[test]
    fn test_missing_file_is_empty() -> Result<()> {
        let tmp = TempDir::new()?;
        let dir = LogDirectory::new(tmp.path());

        for kind in LogKind::ALL {
            assert!(dir.load(kind, &parser())?.is_empty());
        }
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_empty() -> Result<()> {
        let dir = LogDirectory::new("/definitely/not/a/logs/dir/12345");
        assert!(dir.load(LogKind::Error, &parser())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_parses_and_skips_noise() -> Result<()> {
        let tmp = TempDir::new()?;
        fs::write(
            tmp.path().join("error.log"),
            "Server starting...\n\
             2024-05-01 12:00:00 [ERROR] {\"message\":\"db down\"}\n\
             \x20   at Connection.connect (db.js:10)\n\
             2024-05-01 12:00:05 [ERROR] {\"message\":\"db still down\"}\n\
             2024-05-01 12:00:06 [ERROR] {broken json}\n",
        )?;

        let events = LogDirectory::new(tmp.path()).load(LogKind::Error, &parser())?;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message(), Some("db down"));
        assert_eq!(events[1].message(), Some("db still down"));
        Ok(())
    }

    #[test]
    fn test_load_tolerates_invalid_utf8() -> Result<()> {
        let tmp = TempDir::new()?;
        let mut content = b"2024-05-01 12:00:00 [INFO] {\"message\":\"caf\xe9\"}\n".to_vec();
        content.extend_from_slice(b"2024-05-01 12:00:01 [INFO] {\"message\":\"ok\"}\n");
        fs::write(tmp.path().join("combined.log"), content)?;

        let events = LogDirectory::new(tmp.path()).load(LogKind::Combined, &parser())?;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].message(), Some("ok"));
        Ok(())
    }

    #[test]
    fn test_unreadable_source_is_an_error() -> Result<()> {
        let tmp = TempDir::new()?;
        // A directory where the file should be can not be read as a log
        fs::create_dir(tmp.path().join("api.log"))?;

        let result = LogDirectory::new(tmp.path()).load(LogKind::Api, &parser());
        assert!(matches!(result, Err(LogSiftError::Io(_))));
        Ok(())
    }

    #[test]
    fn test_log_kind_display() {
        assert_eq!(LogKind::Error.to_string(), "error");
        assert_eq!(LogKind::Api.to_string(), "api");
        assert_eq!(LogKind::Combined.to_string(), "combined");
    }
}
