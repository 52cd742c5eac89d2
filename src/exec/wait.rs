// src/exec/wait.rs

//! Waiting on child processes.
//!
//! This is the only place that deals with interrupted system calls: a wait
//! that returns `EINTR` is retried here, so callers only ever see a real
//! outcome or a real failure.

use std::io;

use tokio::process::Child;
use tracing::{debug, trace};

use crate::errors::{Result, ShellError};
use crate::types::ExitOutcome;

/// Run `f` until it returns something other than `ErrorKind::Interrupted`.
pub fn retry_interrupted<T, F>(mut f: F) -> io::Result<T>
where
    F: FnMut() -> io::Result<T>,
{
    loop {
        match f() {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                trace!("syscall interrupted; retrying");
            }
            result => return result,
        }
    }
}

/// Block (asynchronously) until the child terminates.
pub async fn wait_for_exit(child: &mut Child) -> Result<ExitOutcome> {
    loop {
        match child.wait().await {
            Ok(status) => return Ok(ExitOutcome::from(status)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                debug!("wait interrupted by a signal; retrying");
            }
            Err(e) => return Err(ShellError::Wait(e)),
        }
    }
}

/// Non-blocking check: `Some(outcome)` once the child has terminated.
pub fn try_reap(child: &mut Child) -> Result<Option<ExitOutcome>> {
    retry_interrupted(|| child.try_wait())
        .map(|status| status.map(ExitOutcome::from))
        .map_err(ShellError::Wait)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_only_on_interrupt() {
        let mut calls = 0;
        let value = retry_interrupted(|| {
            calls += 1;
            if calls < 3 {
                Err(io::Error::from(io::ErrorKind::Interrupted))
            } else {
                Ok(calls)
            }
        })
        .unwrap();
        assert_eq!(value, 3);

        let mut calls = 0;
        let err = retry_interrupted::<(), _>(|| {
            calls += 1;
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        })
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(calls, 1);
    }
}
