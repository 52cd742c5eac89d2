// src/jobs/tracker.rs

//! Background job bookkeeping.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use nix::sys::signal::Signal;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::exec::ProcessHandle;
use crate::types::ExitOutcome;

/// How often the grace period checks whether every job has already exited.
const GRACE_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A background job that has been reaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub pid: u32,
    pub command: String,
    pub outcome: ExitOutcome,
    /// True if the job survived the grace period and was SIGKILLed.
    pub forced: bool,
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.forced { "killed" } else { "done" };
        write!(
            f,
            "[bg] {} {verb} ({}): exit code {}",
            self.pid, self.command, self.outcome
        )
    }
}

/// Owns every backgrounded process until it has been reaped.
#[derive(Debug)]
pub struct JobTracker {
    jobs: BTreeMap<u32, ProcessHandle>,
    grace_period: Duration,
}

impl JobTracker {
    pub fn new(grace_period: Duration) -> Self {
        Self {
            jobs: BTreeMap::new(),
            grace_period,
        }
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Take ownership of a running process; returns its pid.
    pub fn track(&mut self, handle: ProcessHandle) -> u32 {
        let pid = handle.pid();
        debug!(pid, cmd = handle.command(), "tracking background job");
        self.jobs.insert(pid, handle);
        pid
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.jobs.contains_key(&pid)
    }

    /// Pids of all tracked jobs, ascending.
    pub fn pids(&self) -> Vec<u32> {
        self.jobs.keys().copied().collect()
    }

    /// Non-blocking: remove and report every job that has terminated.
    pub fn reap_finished(&mut self) -> Vec<JobReport> {
        let mut finished = Vec::new();

        self.jobs.retain(|&pid, handle| match handle.try_reap() {
            Ok(None) => true,
            Ok(Some(outcome)) => {
                debug!(pid, exit_code = outcome.code(), "background job finished");
                finished.push(JobReport {
                    pid,
                    command: handle.command().to_string(),
                    outcome,
                    forced: false,
                });
                false
            }
            Err(err) => {
                // A job we cannot wait on is dropped from the table; its
                // handle kills it if it is somehow still around.
                warn!(pid, error = %err, "could not poll background job; dropping it");
                finished.push(JobReport {
                    pid,
                    command: handle.command().to_string(),
                    outcome: err.exit_outcome(),
                    forced: false,
                });
                false
            }
        });

        finished
    }

    /// Terminate everything still running.
    ///
    /// SIGTERM, then up to one grace period for jobs to exit on their own,
    /// then SIGKILL and a blocking wait for whatever is left. The table is
    /// empty afterwards.
    pub async fn shutdown(&mut self) -> Vec<JobReport> {
        let mut reports = self.reap_finished();
        if self.jobs.is_empty() {
            return reports;
        }

        info!(jobs = self.jobs.len(), "terminating background jobs");
        for (pid, handle) in &self.jobs {
            if let Err(err) = handle.signal(Signal::SIGTERM) {
                warn!(pid, error = %err, "failed to send SIGTERM");
            }
        }

        let deadline = Instant::now() + self.grace_period;
        loop {
            reports.extend(self.reap_finished());
            let now = Instant::now();
            if self.jobs.is_empty() || now >= deadline {
                break;
            }
            sleep(GRACE_POLL_INTERVAL.min(deadline - now)).await;
        }

        for (pid, mut handle) in std::mem::take(&mut self.jobs) {
            warn!(pid, cmd = handle.command(), "job survived grace period; sending SIGKILL");
            let outcome = match handle.kill().await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(pid, error = %err, "waiting for killed job failed");
                    err.exit_outcome()
                }
            };
            reports.push(JobReport {
                pid,
                command: handle.command().to_string(),
                outcome,
                forced: true,
            });
        }

        reports
    }
}
