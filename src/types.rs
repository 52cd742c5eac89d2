// src/types.rs

//! Small value types shared between the parser, the executor and the job
//! tracker.

use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::ExitStatus;

use nix::sys::signal::Signal;

/// How a process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Normal exit with the given status code.
    Exited(i32),
    /// Terminated by the given signal number.
    Signaled(i32),
}

impl ExitOutcome {
    pub const SUCCESS: ExitOutcome = ExitOutcome::Exited(0);
    pub const FAILURE: ExitOutcome = ExitOutcome::Exited(1);

    /// Numeric status as scripts see it: the exit code, or `128 + signal`.
    pub fn code(self) -> i32 {
        match self {
            ExitOutcome::Exited(code) => code,
            ExitOutcome::Signaled(sig) => 128 + sig,
        }
    }

    pub fn success(self) -> bool {
        self.code() == 0
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => ExitOutcome::Exited(code),
            (None, Some(sig)) => ExitOutcome::Signaled(sig),
            // Stopped/continued statuses never reach us without WUNTRACED.
            (None, None) => ExitOutcome::Exited(-1),
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ExitOutcome::Exited(code) => write!(f, "{code}"),
            ExitOutcome::Signaled(sig) => write!(
                f,
                "{} (terminated by signal {} ({sig}))",
                self.code(),
                signal_name(sig)
            ),
        }
    }
}

/// `SIGTERM`-style name for a signal number, or `SIG<n>` if unknown.
pub fn signal_name(sig: i32) -> String {
    Signal::try_from(sig)
        .map(|s| s.as_str().to_string())
        .unwrap_or_else(|_| format!("SIG{sig}"))
}

/// Kind of a file redirection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// `< path`
    Read,
    /// `> path`
    Write,
    /// `>> path`
    Append,
}

impl RedirectKind {
    pub fn from_operator(token: &str) -> Option<Self> {
        match token {
            "<" => Some(RedirectKind::Read),
            ">" => Some(RedirectKind::Write),
            ">>" => Some(RedirectKind::Append),
            _ => None,
        }
    }
}

/// One `<`, `>` or `>>` with its target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub kind: RedirectKind,
    pub target: PathBuf,
}

impl Redirection {
    pub fn new(kind: RedirectKind, target: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            target: target.into(),
        }
    }
}
