use crate::analysis::source::{LogDirectory, LogKind};
use crate::config::Config;
use log::{debug, error, info, warn};

/// Initialize the logger with appropriate level based on verbosity.
///
/// Warnings and errors are shown by default. `RUST_LOG` replaces the
/// default level when set; `--quiet` silences everything.
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = logger_level(verbose, quiet);

    let mut builder = env_logger::Builder::from_default_env();
    if quiet || std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_none() {
        builder.filter_level(level);
    }
    builder
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logger initialized with level: {level:?}");
}

fn logger_level(verbose: bool, quiet: bool) -> log::LevelFilter {
    if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    }
}

/// Log configuration information
pub fn log_config_info(config: &Config) {
    let hours = config.default_hours();
    let timezone = config.timezone.as_deref().unwrap_or("local");
    let limits = config.report_limits();

    info!(
        "Configuration: window={hours}h, timezone={timezone}, anonymous_user={}",
        config.anonymous_user()
    );
    info!(
        "Limits: slowest={}, endpoints={}, errors={}, security={}",
        limits.slowest_requests,
        limits.top_endpoints,
        limits.recent_errors,
        limits.recent_security_events
    );
}

/// Log which files a report reads
pub fn log_sources(directory: &LogDirectory) {
    info!("Reading logs from {}", directory.root().display());
    for kind in LogKind::ALL {
        debug!("  {kind}: {}", directory.path_of(kind).display());
    }
}

/// Log report completion
pub fn log_report_complete(report: &str, entries: usize, duration_ms: u128) {
    info!("Built {report} report with {entries} entries ({duration_ms}ms)");
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}
