// Command-line interface definitions and parsing for logsift

use crate::config::CliConfig;
use crate::core::constants::output_formats;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Report to produce (default: summary)
    #[command(subcommand)]
    pub command: Option<Commands>,

    // Time Window
    /// Trailing window in hours; invalid values fall back to 24
    #[arg(
        long,
        value_name = "HOURS",
        allow_hyphen_values = true,
        global = true,
        help_heading = "Time Window"
    )]
    pub hours: Option<String>,

    /// Read timestamps without a zone as UTC instead of local time
    #[arg(long, global = true, help_heading = "Time Window")]
    pub utc: bool,

    // Sources
    /// Directory holding error.log, api.log and combined.log (default: logs)
    #[arg(long, value_name = "DIR", global = true, help_heading = "Sources")]
    pub logs_dir: Option<String>,

    // Output & Verbosity
    /// Output format
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, global = true, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Maximum number of events printed by errors and security
    #[arg(long, value_name = "COUNT", global = true, help_heading = "Output & Verbosity")]
    pub limit: Option<usize>,

    /// Suppress diagnostics
    #[arg(short = 'q', long, global = true, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", global = true, help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, global = true, help_heading = "Configuration")]
    pub no_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Overview of requests, errors, security events and slow requests
    Summary,
    /// Error-log entries inside the window, newest first
    Errors,
    /// API usage statistics
    Stats,
    /// Security events from the combined log, newest first
    Security,
    /// Generate shell completions
    #[command(arg_required_else_help = true)]
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Convert parsed CLI arguments into CliConfig structure
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    CliConfig {
        hours: cli.hours.clone(),
        logs_dir: cli.logs_dir.clone(),
        output_format: cli.format.clone(),
        limit: cli.limit,
        utc: cli.utc,
        quiet: cli.quiet,
        verbose: cli.verbose,
        config_file: cli.config.clone(),
        no_config: cli.no_config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("logsift").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());

        let config = cli_to_config(&cli);
        assert_eq!(config.hours, None);
        assert_eq!(config.output_format, None);
        assert!(!config.utc);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = parse(&["errors", "--hours", "48", "--format", "json", "--limit", "3"]);
        assert_eq!(cli.command, Some(Commands::Errors));

        let config = cli_to_config(&cli);
        assert_eq!(config.hours.as_deref(), Some("48"));
        assert_eq!(config.output_format.as_deref(), Some("json"));
        assert_eq!(config.limit, Some(3));
    }

    #[test]
    fn test_hours_kept_as_typed() {
        let hours = |args: &[&str]| cli_to_config(&parse(args)).hours;
        assert_eq!(hours(&["--hours", "abc"]).as_deref(), Some("abc"));
        assert_eq!(hours(&["--hours", "-5"]).as_deref(), Some("-5"));
        assert_eq!(hours(&["stats", "--hours", "0.5"]).as_deref(), Some("0.5"));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Cli::try_parse_from(["logsift", "summary", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags() {
        let cli = parse(&[
            "security",
            "--utc",
            "-v",
            "--logs-dir",
            "/var/log/shop",
            "--config",
            "custom.toml",
            "--no-config",
        ]);
        let config = cli_to_config(&cli);

        assert_eq!(cli.command, Some(Commands::Security));
        assert!(config.utc);
        assert!(config.verbose);
        assert!(!config.quiet);
        assert!(config.no_config);
        assert_eq!(config.logs_dir.as_deref(), Some("/var/log/shop"));
        assert_eq!(config.config_file.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn test_completions_subcommand() {
        let cli = parse(&["completions", "bash"]);
        assert_eq!(
            cli.command,
            Some(Commands::Completions {
                shell: clap_complete::Shell::Bash
            })
        );
    }
}
