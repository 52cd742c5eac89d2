#![allow(dead_code)]

use std::time::Duration;

use minish::env::ShellEnv;
use minish::parse::SimpleCommand;
use minish::shell::{Reporter, Shell, ShellOptions};

use crate::SharedBuffer;

/// A shell under test together with the buffers its reporter writes to.
pub struct TestShell {
    pub shell: Shell<ShellEnv>,
    pub out: SharedBuffer,
    pub err: SharedBuffer,
}

/// Builder for a `Shell` whose status output is captured.
pub struct ShellBuilder {
    grace_period: Duration,
    report_timing: bool,
}

impl ShellBuilder {
    pub fn new() -> Self {
        Self {
            grace_period: Duration::from_millis(300),
            report_timing: true,
        }
    }

    pub fn grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    pub fn report_timing(mut self, val: bool) -> Self {
        self.report_timing = val;
        self
    }

    pub fn build(self) -> TestShell {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let reporter = Reporter::new(
            Box::new(out.clone()),
            Box::new(err.clone()),
            self.report_timing,
        );
        let options = ShellOptions {
            grace_period: self.grace_period,
        };
        TestShell {
            shell: Shell::new(ShellEnv::new(), options, reporter),
            out,
            err,
        }
    }
}

impl Default for ShellBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `SimpleCommand` from explicit argv, for arguments the tokenizer cannot
/// express (e.g. a `sh -c` script with spaces).
pub fn command<S: AsRef<str>>(argv: &[S]) -> SimpleCommand {
    SimpleCommand {
        argv: argv.iter().map(|s| s.as_ref().to_string()).collect(),
        redirections: vec![],
    }
}
