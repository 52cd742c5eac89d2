// src/logging.rs

//! Diagnostics for the shell itself, kept apart from what the user sees.
//!
//! Everything here goes to stderr through a `tracing` fmt subscriber; the
//! prompt, command output and `[bg]` status lines own stdout. The level is
//! taken from `--log-level`, then `MINISH_LOG`, and is `warn` otherwise so
//! that an interactive session shows nothing unless something went wrong.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Install the global subscriber. Called once from `main` before the
/// input loop starts.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = match cli_level {
        Some(lvl) => Level::from(lvl),
        None => std::env::var("MINISH_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(Level::WARN),
    };

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
