// src/shell/report.rs

//! User-facing status lines.
//!
//! Tracing goes to stderr for operators; this is what the person at the
//! prompt sees. Write failures are ignored: a closed stdout must not take the
//! shell down.

use std::io::{self, Write};
use std::time::Duration;

use crate::errors::ShellError;
use crate::jobs::JobReport;
use crate::types::ExitOutcome;

pub struct Reporter {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
    report_timing: bool,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("report_timing", &self.report_timing)
            .finish_non_exhaustive()
    }
}

impl Reporter {
    pub fn new(
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
        report_timing: bool,
    ) -> Self {
        Self {
            out,
            err,
            report_timing,
        }
    }

    /// Report to the process's own stdout/stderr.
    pub fn stdio(report_timing: bool) -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()), report_timing)
    }

    /// Elapsed time and exit code of one foreground command. `label` names
    /// the clause inside a `||` chain.
    pub fn outcome(&mut self, label: Option<&str>, elapsed: Duration, outcome: ExitOutcome) {
        if !self.report_timing {
            return;
        }
        let ms = elapsed.as_millis();
        let _ = match label {
            Some(label) => writeln!(
                self.out,
                "{label} elapsed time: {ms} ms\n{label} exit code: {outcome}"
            ),
            None => writeln!(self.out, "Elapsed time: {ms} ms\nExit code: {outcome}"),
        };
        let _ = self.out.flush();
    }

    pub fn info(&mut self, msg: &str) {
        let _ = writeln!(self.out, "{msg}");
        let _ = self.out.flush();
    }

    /// Progress of a `||` chain; only shown together with timing reports.
    pub fn chain_step(&mut self, msg: &str) {
        if self.report_timing {
            self.info(msg);
        }
    }

    pub fn job(&mut self, report: &JobReport) {
        self.info(&report.to_string());
    }

    pub fn error(&mut self, err: &ShellError) {
        let _ = writeln!(self.err, "minish: {err}");
        let _ = self.err.flush();
    }
}
