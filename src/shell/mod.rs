// src/shell/mod.rs

//! The sequencer: one classified line in, one execution path out.
//!
//! `Shell` owns everything that has to survive between lines: the
//! environment store, the job tracker and the last exit status.

pub mod report;

use std::process::Stdio;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::builtins::{Builtin, BuiltinFlow};
use crate::env::{EnvStore, ShellEnv};
use crate::errors::{Result, ShellError};
use crate::exec::{launch, run_pipeline, Wiring};
use crate::jobs::JobTracker;
use crate::parse::{parse_line, Clause, CommandLine, SimpleCommand};
use crate::types::ExitOutcome;

pub use report::Reporter;

/// Default time background jobs get between SIGTERM and SIGKILL.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy)]
pub struct ShellOptions {
    pub grace_period: Duration,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}

/// What the input loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Leave the loop and exit with this status.
    Exit(i32),
}

/// Result of running one clause to completion.
enum Step {
    Done(ExitOutcome),
    Exit(Option<i32>),
}

#[derive(Debug)]
pub struct Shell<E: EnvStore = ShellEnv> {
    env: E,
    jobs: JobTracker,
    reporter: Reporter,
    last_status: i32,
}

impl<E: EnvStore> Shell<E> {
    pub fn new(env: E, options: ShellOptions, reporter: Reporter) -> Self {
        Self {
            env,
            jobs: JobTracker::new(options.grace_period),
            reporter,
            last_status: 0,
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn jobs(&self) -> &JobTracker {
        &self.jobs
    }

    /// Status of the most recent foreground command, as `$?` would show it.
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    /// Parse and run one input line.
    pub async fn execute_line(&mut self, line: &str) -> Flow {
        let parsed = match parse_line(line) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.fail(&err);
                return Flow::Continue;
            }
        };
        debug!(?parsed, "classified line");

        match parsed {
            CommandLine::Empty => Flow::Continue,
            CommandLine::Builtin(builtin) => match self.run_builtin(&builtin) {
                Step::Done(outcome) => self.finish(outcome),
                Step::Exit(code) => self.exit(code),
            },
            CommandLine::Simple(cmd) => {
                let started = Instant::now();
                let outcome = self.run_foreground(&cmd).await;
                self.reporter.outcome(None, started.elapsed(), outcome);
                self.finish(outcome)
            }
            CommandLine::Background(cmd) => {
                self.spawn_background(&cmd);
                Flow::Continue
            }
            CommandLine::Pipeline(stages) => {
                let started = Instant::now();
                let outcome = self.run_pipeline(&stages).await;
                self.reporter.outcome(None, started.elapsed(), outcome);
                self.finish(outcome)
            }
            CommandLine::Conditional(clauses) => self.run_conditional(&clauses).await,
        }
    }

    /// Report background jobs that finished since the last call.
    pub fn reap_background(&mut self) {
        for report in self.jobs.reap_finished() {
            self.reporter.job(&report);
        }
    }

    /// Drain the job table: SIGTERM, grace period, SIGKILL.
    pub async fn shutdown(&mut self) {
        if !self.jobs.is_empty() {
            info!(jobs = self.jobs.len(), "shell shutting down with background jobs");
        }
        for report in self.jobs.shutdown().await {
            self.reporter.job(&report);
        }
    }

    fn finish(&mut self, outcome: ExitOutcome) -> Flow {
        self.last_status = outcome.code();
        Flow::Continue
    }

    fn exit(&mut self, code: Option<i32>) -> Flow {
        Flow::Exit(code.unwrap_or(self.last_status))
    }

    fn fail(&mut self, err: &ShellError) -> ExitOutcome {
        self.reporter.error(err);
        let outcome = err.exit_outcome();
        self.last_status = outcome.code();
        outcome
    }

    fn run_builtin(&mut self, builtin: &Builtin) -> Step {
        match builtin.run(&mut self.env) {
            Ok(BuiltinFlow::Continue) => Step::Done(ExitOutcome::SUCCESS),
            Ok(BuiltinFlow::Exit(code)) => Step::Exit(code),
            Err(err) => Step::Done(self.fail(&err)),
        }
    }

    async fn run_foreground(&mut self, cmd: &SimpleCommand) -> ExitOutcome {
        let result = self.wait_foreground(cmd).await;
        match result {
            Ok(outcome) => outcome,
            Err(err) => self.fail(&err),
        }
    }

    async fn wait_foreground(&self, cmd: &SimpleCommand) -> Result<ExitOutcome> {
        let mut handle = launch(cmd, Wiring::inherit(), &self.env)?;
        let outcome = handle.wait().await?;
        debug!(pid = handle.pid(), exit_code = outcome.code(), "foreground command finished");
        Ok(outcome)
    }

    async fn run_pipeline(&mut self, stages: &[SimpleCommand]) -> ExitOutcome {
        let result = run_pipeline(stages, &self.env).await;
        match result {
            Ok(report) => {
                for err in &report.errors {
                    self.reporter.error(err);
                }
                report.outcome
            }
            Err(err) => self.fail(&err),
        }
    }

    fn spawn_background(&mut self, cmd: &SimpleCommand) {
        // Without job control a background job must not compete for the
        // terminal, so its stdin is /dev/null unless redirected.
        let wiring = Wiring::inherit().with_stdin(Stdio::null());
        match launch(cmd, wiring, &self.env) {
            Ok(handle) => {
                let command = handle.command().to_string();
                let pid = self.jobs.track(handle);
                self.reporter.info(&format!("[bg] {pid} {command}"));
                self.last_status = 0;
            }
            Err(err) => {
                self.fail(&err);
            }
        }
    }

    async fn run_clause(&mut self, clause: &Clause) -> Step {
        match clause {
            Clause::Builtin(builtin) => self.run_builtin(builtin),
            Clause::Simple(cmd) => Step::Done(self.run_foreground(cmd).await),
            Clause::Pipeline(stages) => Step::Done(self.run_pipeline(stages).await),
        }
    }

    /// `c1 || c2 || ...`: run each clause only if the previous one failed.
    async fn run_conditional(&mut self, clauses: &[Clause]) -> Flow {
        for (i, clause) in clauses.iter().enumerate() {
            let label = format!("Command {}", i + 1);
            let started = Instant::now();
            let outcome = match self.run_clause(clause).await {
                Step::Done(outcome) => outcome,
                Step::Exit(code) => return self.exit(code),
            };
            self.reporter.outcome(Some(&label), started.elapsed(), outcome);
            self.last_status = outcome.code();

            if outcome.success() {
                if i + 1 < clauses.len() {
                    self.reporter
                        .chain_step(&format!("{label} succeeded, skipping the rest"));
                }
                break;
            }
            if i + 1 < clauses.len() {
                self.reporter
                    .chain_step(&format!("{label} failed, running command {}", i + 2));
            }
        }
        Flow::Continue
    }
}
