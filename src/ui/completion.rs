//! Shell completion generation for logsift

use clap::{Command, CommandFactory};
use clap_complete::{Generator, Shell, generate};
use std::io::Write;

use crate::ui::cli::Cli;

/// Name completions are registered under
pub const BIN_NAME: &str = "logsift";

/// Generate shell completions for the given shell
pub fn print_completions<G: Generator>(generator: G, app: &mut Command) {
    write_completions(generator, app, &mut std::io::stdout());
}

/// Write completions for `app` into any writer
pub fn write_completions<G: Generator>(generator: G, app: &mut Command, out: &mut dyn Write) {
    generate(generator, app, BIN_NAME, out);
}

/// Completion script for the logsift command line, as text
pub fn completion_script(shell: Shell) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    write_completions(shell, &mut cmd, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_scripts_mention_binary() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            let script = completion_script(shell);
            assert!(!script.is_empty(), "{shell:?} completion should generate output");
            assert!(script.contains(BIN_NAME), "{shell:?} script should name the binary");
        }
    }

    #[test]
    fn test_completion_scripts_list_subcommands() {
        let script = completion_script(Shell::Bash);
        for subcommand in ["summary", "errors", "stats", "security", "completions"] {
            assert!(script.contains(subcommand), "missing {subcommand}");
        }
    }

    #[test]
    fn test_completion_scripts_list_options() {
        let script = completion_script(Shell::Zsh);
        assert!(script.contains("--hours"));
        assert!(script.contains("--logs-dir"));
        assert!(script.contains("--no-config"));
    }
}
