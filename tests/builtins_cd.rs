// tests/builtins_cd.rs
//
// `cd` changes the working directory of the whole test process, so it lives
// in its own test binary with a single test.
mod common;
use crate::common::{init_tracing, word, ShellBuilder, TestResult};

use std::fs;

use minish::env::EnvStore;

#[tokio::test]
async fn cd_changes_the_shell_directory_and_children_follow() -> TestResult {
    init_tracing();
    let first = tempfile::tempdir()?;
    let home = tempfile::tempdir()?;
    let first_path = fs::canonicalize(first.path())?;
    let home_path = fs::canonicalize(home.path())?;
    let mut t = ShellBuilder::new().build();

    t.shell.execute_line(&format!("cd {}", word(&first_path))).await;
    assert_eq!(t.shell.last_status(), 0);
    assert_eq!(std::env::current_dir()?, first_path);
    assert_eq!(t.shell.env().get("PWD"), Some(word(&first_path)));

    // A relative redirection now lands in the new directory.
    t.shell.execute_line("pwd > where").await;
    assert_eq!(
        fs::read_to_string(first_path.join("where"))?.trim(),
        word(&first_path)
    );

    // Bare `cd` goes to $HOME as seen by the shell's own environment.
    t.shell.execute_line(&format!("export HOME={}", word(&home_path))).await;
    t.shell.execute_line("cd").await;
    assert_eq!(std::env::current_dir()?, home_path);

    // A rejected cd leaves the directory alone and reports the error.
    t.shell.execute_line("cd /definitely/not/here").await;
    assert_eq!(t.shell.last_status(), 1);
    assert!(t.err.contents().contains("no such directory"));
    assert_eq!(std::env::current_dir()?, home_path);

    std::env::set_current_dir(env!("CARGO_MANIFEST_DIR"))?;
    Ok(())
}
