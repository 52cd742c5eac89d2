// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `minish`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "minish",
    version,
    about = "A small interactive shell with pipes, redirections and background jobs.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a config file (TOML).
    ///
    /// Default: `Minish.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MINISH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Time background jobs get between SIGTERM and SIGKILL at exit
    /// (e.g. `500ms`, `2s`). Overrides `[jobs].grace_period`.
    #[arg(long, value_name = "DURATION")]
    pub grace_period: Option<String>,

    /// Run this line instead of reading stdin. May be repeated.
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub commands: Vec<String>,

    /// No prompt and no per-command timing reports.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_commands_keep_order() {
        let args = CliArgs::parse_from([
            "minish",
            "-c",
            "echo one",
            "--command",
            "echo two",
            "--grace-period",
            "250ms",
            "-q",
        ]);
        assert_eq!(args.commands, vec!["echo one", "echo two"]);
        assert_eq!(args.grace_period.as_deref(), Some("250ms"));
        assert!(args.quiet);
        assert!(args.config.is_none());
    }
}
