// src/errors.rs

//! Crate-wide error type.
//!
//! Every variant is recoverable from the shell's point of view: the command
//! that produced it is reported and counted as failed, and the loop carries on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::ExitOutcome;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("pipeline error: {0}")]
    Pipeline(String),

    #[error("{context}: {source}")]
    Resource {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{program}: {}", exec_reason(.source))]
    Exec {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Builtin(String),

    #[error("wait failed: {0}")]
    Wait(#[source] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShellError {
    pub fn syntax(msg: impl Into<String>) -> Self {
        ShellError::Syntax(msg.into())
    }

    pub fn builtin(msg: impl Into<String>) -> Self {
        ShellError::Builtin(msg.into())
    }

    pub fn resource(context: impl Into<String>, source: io::Error) -> Self {
        ShellError::Resource {
            context: context.into(),
            source,
        }
    }

    /// The outcome recorded for a command that failed with this error.
    ///
    /// Exec failures follow the usual shell convention (127 for a missing
    /// program, 126 for one that cannot be executed); everything else is 1.
    pub fn exit_outcome(&self) -> ExitOutcome {
        match self {
            ShellError::Exec { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => ExitOutcome::Exited(127),
                io::ErrorKind::PermissionDenied => ExitOutcome::Exited(126),
                _ => ExitOutcome::Exited(126),
            },
            _ => ExitOutcome::Exited(1),
        }
    }
}

fn exec_reason(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "command not found".to_string(),
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => err.to_string(),
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_errors_map_to_conventional_codes() {
        let missing = ShellError::Exec {
            program: "nope".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(missing.exit_outcome(), ExitOutcome::Exited(127));
        assert_eq!(missing.to_string(), "nope: command not found");

        let denied = ShellError::Exec {
            program: "./x".into(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(denied.exit_outcome(), ExitOutcome::Exited(126));
    }

    #[test]
    fn other_errors_fail_with_status_one() {
        assert_eq!(
            ShellError::syntax("missing filename").exit_outcome(),
            ExitOutcome::Exited(1)
        );
        assert_eq!(
            ShellError::builtin("malformed assignment").to_string(),
            "malformed assignment"
        );
    }
}
