use clap::{CommandFactory, Parser};
use logsift::analysis::LogAnalyzer;
use logsift::config::{CliConfig, Config};
use logsift::core::constants::output_formats;
use logsift::reporting::logging;
use logsift::reporting::output::{self, EventReport};
use logsift::ui::completion::print_completions;
use logsift::ui::{Cli, Commands, cli_to_config};

use std::time::Instant;

fn main() {
    let cli = Cli::parse();

    // Handle completion commands first
    if let Some(exit_code) = handle_completion_commands(&cli) {
        std::process::exit(exit_code);
    }

    match run_logsift(&cli) {
        Ok(report) => {
            print!("{report}");
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle completion commands and return exit code if a completion command was processed
pub fn handle_completion_commands(cli: &Cli) -> Option<i32> {
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut app = Cli::command();
            print_completions(shell, &mut app);
            Some(0)
        }
        _ => None,
    }
}

/// Build the requested report and return it rendered
pub fn run_logsift(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let report = Report::from_command(cli.command.as_ref())
        .ok_or("completions do not produce a report")?;

    let cli_config = cli_to_config(cli);
    let mut config = load_config(&cli_config)?;

    // The logger has to exist before merging, which may warn about --hours
    logging::init_logger(
        cli_config.verbose || config.verbose.unwrap_or(false),
        cli_config.quiet,
    );
    config.merge_with_cli(&cli_config);

    let settings = setup_output_settings(&cli_config, &config);
    logging::log_config_info(&config);

    let analyzer = LogAnalyzer::from_config(&config).inspect_err(|e| {
        logging::log_error("Invalid configuration", Some(e));
    })?;
    logging::log_sources(analyzer.source());

    Ok(render_command(&analyzer, report, &settings)?)
}

/// The reports the analyzer can render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Summary,
    Errors,
    Stats,
    Security,
}

impl Report {
    /// Report for a subcommand; no subcommand means the summary.
    /// Completions are not a report.
    pub fn from_command(command: Option<&Commands>) -> Option<Report> {
        match command {
            None | Some(Commands::Summary) => Some(Report::Summary),
            Some(Commands::Errors) => Some(Report::Errors),
            Some(Commands::Stats) => Some(Report::Stats),
            Some(Commands::Security) => Some(Report::Security),
            Some(Commands::Completions { .. }) => None,
        }
    }
}

/// Run one report against the analyzer
pub fn render_command(
    analyzer: &LogAnalyzer,
    report: Report,
    settings: &OutputSettings,
) -> logsift::Result<String> {
    let started = Instant::now();
    let window = analyzer.window(None);
    let format = settings.output_format.as_str();

    let (name, entries, rendered) = match report {
        Report::Errors => {
            let events = analyzer.recent_errors_in(&window);
            let text =
                output::render_events(EventReport::Errors, &events, &window, format, settings.limit)?;
            ("errors", events.len(), text)
        }
        Report::Security => {
            let events = analyzer.security_events_in(&window);
            let text = output::render_events(
                EventReport::Security,
                &events,
                &window,
                format,
                settings.limit,
            )?;
            ("security", events.len(), text)
        }
        Report::Stats => {
            let stats = analyzer.api_usage_stats_in(&window);
            let text = output::render_stats(&stats, &window, format)?;
            ("stats", stats.total_requests as usize, text)
        }
        Report::Summary => {
            let report = analyzer.summary_report_in(&window);
            let text = output::render_summary(&report, format)?;
            ("summary", report.summary.total_requests as usize, text)
        }
    };

    logging::log_report_complete(name, entries, started.elapsed().as_millis());
    Ok(with_trailing_newline(rendered))
}

fn with_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Load configuration from the given file or from standard locations
pub fn load_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file)
            .map_err(|e| format!("Could not load config file '{config_file}': {e}"))?
    } else {
        Config::load_from_standard_locations()?
    };
    Ok(config)
}

/// Load configuration and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = load_config(cli_config)?;

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    Ok(config)
}

/// Settings for output formatting and display
pub struct OutputSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub limit: Option<usize>,
}

/// Setup output settings based on CLI and config
pub fn setup_output_settings(cli_config: &CliConfig, config: &Config) -> OutputSettings {
    OutputSettings {
        quiet: cli_config.quiet,
        verbose: config.verbose.unwrap_or(false),
        output_format: config
            .output_format
            .as_deref()
            .unwrap_or(output_formats::DEFAULT)
            .to_string(),
        limit: cli_config.limit,
    }
}

#[cfg(test)]
#[allow(clippy::field_reassign_with_default)] // Test code for clarity
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_cli() -> Cli {
        Cli {
            command: None,
            hours: None,
            utc: false,
            logs_dir: None,
            format: None,
            limit: None,
            quiet: false,
            verbose: false,
            config: None,
            no_config: true,
        }
    }

    fn settings(format: &str, limit: Option<usize>) -> OutputSettings {
        OutputSettings {
            quiet: true,
            verbose: false,
            output_format: format.to_string(),
            limit,
        }
    }

    fn logs_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S");
        fs::write(
            dir.path().join("error.log"),
            format!(
                "{now} [ERROR] Payment failed {{\"message\":\"card declined\",\"orderId\":7}}\n\
                 {now} [ERROR] Stock sync failed {{\"message\":\"timeout\"}}\n\
                 {now} [ERROR] Cart lost {{\"message\":\"redis down\"}}\n"
            ),
        )
        .unwrap();
        fs::write(
            dir.path().join("api.log"),
            format!(
                "{now} [INFO] request {{\"method\":\"GET\",\"url\":\"/products\",\"status\":200,\"duration\":\"120ms\"}}\n\
                 {now} [INFO] request {{\"method\":\"POST\",\"url\":\"/orders\",\"status\":201,\"duration\":80}}\n"
            ),
        )
        .unwrap();
        fs::write(
            dir.path().join("combined.log"),
            format!("{now} [WARN] Security alert {{\"message\":\"Security: brute force\",\"ip\":\"10.0.0.9\"}}\n"),
        )
        .unwrap();
        dir
    }

    fn analyzer_for(dir: &TempDir) -> LogAnalyzer {
        let config = Config {
            logs_dir: Some(dir.path().to_string_lossy().into_owned()),
            timezone: Some("utc".to_string()),
            ..Default::default()
        };
        LogAnalyzer::from_config(&config).unwrap()
    }

    #[test]
    fn test_handle_completion_commands_none() {
        let cli = create_test_cli();
        assert_eq!(handle_completion_commands(&cli), None);

        let mut cli = create_test_cli();
        cli.command = Some(Commands::Stats);
        assert_eq!(handle_completion_commands(&cli), None);
    }

    #[test]
    fn test_report_from_command() {
        assert_eq!(Report::from_command(None), Some(Report::Summary));
        assert_eq!(
            Report::from_command(Some(&Commands::Security)),
            Some(Report::Security)
        );
        assert_eq!(
            Report::from_command(Some(&Commands::Completions {
                shell: clap_complete::Shell::Bash
            })),
            None
        );
    }

    #[test]
    fn test_load_and_merge_config_no_config_flag() {
        let mut cli_config = CliConfig::default();
        cli_config.no_config = true;
        cli_config.hours = Some("6".to_string());
        cli_config.utc = true;

        let config = load_and_merge_config(&cli_config).unwrap();
        assert_eq!(config.hours, Some(6.0));
        assert_eq!(config.timezone.as_deref(), Some("utc"));
        assert_eq!(config.logs_dir.as_deref(), Some("logs"));
    }

    #[test]
    fn test_load_and_merge_config_with_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("logsift.toml");
        fs::write(&config_path, "hours = 48.0\nlogs_dir = \"/srv/shop/logs\"\n").unwrap();

        let mut cli_config = CliConfig::default();
        cli_config.config_file = Some(config_path.to_string_lossy().into_owned());

        let config = load_and_merge_config(&cli_config).unwrap();
        assert_eq!(config.hours, Some(48.0));
        assert_eq!(config.logs_dir.as_deref(), Some("/srv/shop/logs"));

        // CLI takes precedence
        cli_config.logs_dir = Some("other".to_string());
        let config = load_and_merge_config(&cli_config).unwrap();
        assert_eq!(config.logs_dir.as_deref(), Some("other"));
    }

    #[test]
    fn test_load_and_merge_config_invalid_file() {
        let mut cli_config = CliConfig::default();
        cli_config.config_file = Some("/nonexistent/logsift.toml".to_string());
        assert!(load_and_merge_config(&cli_config).is_err());
    }

    #[test]
    fn test_setup_output_settings() {
        let mut cli_config = CliConfig::default();
        let mut config = Config::default();
        let settings = setup_output_settings(&cli_config, &config);
        assert!(!settings.quiet);
        assert!(!settings.verbose);
        assert_eq!(settings.output_format, output_formats::DEFAULT);
        assert_eq!(settings.limit, None);

        cli_config.quiet = true;
        cli_config.limit = Some(5);
        config.verbose = Some(true);
        config.output_format = Some(output_formats::JSON.to_string());
        let settings = setup_output_settings(&cli_config, &config);
        assert!(settings.quiet);
        assert!(settings.verbose);
        assert_eq!(settings.output_format, output_formats::JSON);
        assert_eq!(settings.limit, Some(5));
    }

    #[test]
    fn test_render_errors_json_respects_limit() {
        let dir = logs_dir();
        let analyzer = analyzer_for(&dir);

        let text = render_command(&analyzer, Report::Errors, &settings("json", Some(2))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_render_stats_minimal() {
        let dir = logs_dir();
        let analyzer = analyzer_for(&dir);

        let text = render_command(&analyzer, Report::Stats, &settings("minimal", None)).unwrap();
        assert!(text.contains("Total requests: 2"));
        assert!(text.contains("Average response time: 100ms"));
    }

    #[test]
    fn test_render_security_and_summary() {
        let dir = logs_dir();
        let analyzer = analyzer_for(&dir);

        let text =
            render_command(&analyzer, Report::Security, &settings("minimal", None)).unwrap();
        assert!(text.contains("Security events (Last 24 hours): 1"));

        let text = render_command(&analyzer, Report::Summary, &settings("json", None)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["errorCount"], 3);
        assert_eq!(value["summary"]["securityEvents"], 1);
        assert_eq!(value["summary"]["totalRequests"], 2);
    }

    #[test]
    fn test_run_with_missing_logs_dir_is_empty_report() {
        let temp_dir = TempDir::new().unwrap();
        let mut cli = create_test_cli();
        cli.command = Some(Commands::Summary);
        cli.quiet = true;
        cli.format = Some("json".to_string());
        cli.logs_dir = Some(temp_dir.path().join("missing").to_string_lossy().into_owned());

        let text = run_logsift(&cli).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["totalRequests"], 0);
        assert_eq!(value["recentErrors"], serde_json::json!([]));
    }

    #[test]
    fn test_with_trailing_newline() {
        assert_eq!(with_trailing_newline("[]".to_string()), "[]\n");
        assert_eq!(with_trailing_newline("done\n".to_string()), "done\n");
    }
}
