#![allow(dead_code)]

use std::error::Error;
use std::path::Path;
use std::time::Duration;

pub use minish_test_utils::builders::{command, ShellBuilder, TestShell};
pub use minish_test_utils::{init_tracing, with_timeout, SharedBuffer};

pub type TestResult = Result<(), Box<dyn Error>>;

/// Path as a shell word. Temp dirs never contain whitespace.
pub fn word(path: &Path) -> String {
    path.display().to_string()
}

/// Call `reap_background` until the job table is empty or `limit` passes.
pub async fn reap_until_empty(t: &mut TestShell, limit: Duration) {
    let deadline = tokio::time::Instant::now() + limit;
    while !t.shell.jobs().is_empty() && tokio::time::Instant::now() < deadline {
        t.shell.reap_background();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
