// src/exec/launcher.rs

//! Creating one child process for one command segment.

use std::fs::{File, OpenOptions};
use std::io;
use std::process::Stdio;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::env::EnvStore;
use crate::errors::{Result, ShellError};
use crate::parse::SimpleCommand;
use crate::types::{ExitOutcome, RedirectKind, Redirection};

use super::wait::{try_reap, wait_for_exit};

/// Descriptor wiring decided by the caller (pipeline topology, `/dev/null`
/// for background jobs). Applied before the command's own redirections.
#[derive(Debug, Default)]
pub struct Wiring {
    pub stdin: Option<Stdio>,
    pub stdout: Option<Stdio>,
}

impl Wiring {
    pub fn inherit() -> Self {
        Self::default()
    }

    pub fn with_stdin(mut self, stdin: impl Into<Stdio>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    pub fn with_stdout(mut self, stdout: impl Into<Stdio>) -> Self {
        self.stdout = Some(stdout.into());
        self
    }
}

/// An owned, not yet reaped child process.
///
/// Dropping a handle whose process is still running kills it, so a handle can
/// never silently leak a process.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: u32,
    command: String,
    child: Child,
}

impl ProcessHandle {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// The command line this process was started for.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub async fn wait(&mut self) -> Result<ExitOutcome> {
        wait_for_exit(&mut self.child).await
    }

    pub fn try_reap(&mut self) -> Result<Option<ExitOutcome>> {
        try_reap(&mut self.child)
    }

    /// Deliver `signal` to the process.
    pub fn signal(&self, signal: Signal) -> Result<()> {
        let pid = i32::try_from(self.pid)
            .map_err(|_| ShellError::resource("signalling process", io::Error::other("pid out of range")))?;
        kill(Pid::from_raw(pid), signal)
            .map_err(|errno| ShellError::resource(format!("sending {} to {}", signal.as_str(), self.pid), errno.into()))
    }

    /// SIGKILL the process and wait until it is gone.
    pub async fn kill(&mut self) -> Result<ExitOutcome> {
        if let Err(e) = self.child.start_kill() {
            // Already exited; the wait below still collects the status.
            debug!(pid = self.pid, error = %e, "SIGKILL not delivered");
        }
        self.wait().await
    }
}

/// Start `cmd` without waiting for it.
///
/// Order of descriptor setup in the child: `wiring` first, then the
/// command's redirections in encounter order, so a redirection of the same
/// stream wins over the wiring. Every descriptor opened here is owned by the
/// `Command` and closed in the parent when it goes out of scope.
pub fn launch(cmd: &SimpleCommand, wiring: Wiring, env: &dyn EnvStore) -> Result<ProcessHandle> {
    let mut command = Command::new(cmd.program());
    command.args(cmd.args()).kill_on_drop(true);
    env.apply(&mut command);

    if let Some(stdin) = wiring.stdin {
        command.stdin(stdin);
    }
    if let Some(stdout) = wiring.stdout {
        command.stdout(stdout);
    }

    for redirection in &cmd.redirections {
        let file = open_target(redirection).map_err(|source| ShellError::Redirect {
            path: redirection.target.clone(),
            source,
        })?;
        match redirection.kind {
            RedirectKind::Read => command.stdin(file),
            RedirectKind::Write | RedirectKind::Append => command.stdout(file),
        };
    }

    let child = command
        .spawn()
        .map_err(|source| spawn_error(cmd.program(), source))?;
    let pid = child
        .id()
        .ok_or_else(|| ShellError::resource("spawning process", io::Error::other("child has no pid")))?;

    info!(pid, cmd = %cmd, "started process");

    Ok(ProcessHandle {
        pid,
        command: cmd.to_string(),
        child,
    })
}

fn open_target(redirection: &Redirection) -> io::Result<File> {
    let path = &redirection.target;
    match redirection.kind {
        RedirectKind::Read => File::open(path),
        RedirectKind::Write => OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path),
        RedirectKind::Append => OpenOptions::new().append(true).create(true).open(path),
    }
}

/// Missing or non-executable programs fail inside the child after the
/// fork; anything else is the parent running out of resources.
fn spawn_error(program: &str, source: io::Error) -> ShellError {
    match source.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => ShellError::Exec {
            program: program.to_string(),
            source,
        },
        _ => {
            warn!(program, error = %source, "process creation failed");
            ShellError::resource(format!("spawning {program}"), source)
        }
    }
}
