// tests/stdin_session.rs
mod common;
use crate::common::{init_tracing, with_timeout, TestResult};

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

type SessionResult = Result<(Option<i32>, String), Box<dyn std::error::Error>>;

/// Run the `minish` binary in a fresh directory with `input` on stdin,
/// closing stdin afterwards. Returns (exit code, stdout).
async fn run_session(input: &[u8], extra_args: &[&str]) -> SessionResult {
    let dir = tempfile::tempdir()?;
    let mut child = Command::new(env!("CARGO_BIN_EXE_minish"))
        .arg("--quiet")
        .args(extra_args)
        .current_dir(dir.path())
        .env_remove("MINISH_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let mut stdin = child.stdin.take().ok_or("stdin not captured")?;
    stdin.write_all(input).await?;
    drop(stdin);

    let output = child.wait_with_output().await?;
    Ok((output.status.code(), String::from_utf8_lossy(&output.stdout).into_owned()))
}

#[tokio::test]
async fn end_of_input_drains_background_jobs() -> TestResult {
    init_tracing();
    let started = Instant::now();
    let (code, stdout) =
        with_timeout(run_session(b"sleep 5 &\n", &["--grace-period", "1s"])).await?;

    assert_eq!(code, Some(0));
    assert!(stdout.contains("sleep 5"), "stdout: {stdout:?}");
    assert!(
        stdout.contains("done (sleep 5): exit code 143"),
        "stdout: {stdout:?}"
    );
    assert!(started.elapsed() < Duration::from_secs(4));
    Ok(())
}

#[tokio::test]
async fn invalid_utf8_line_keeps_the_session_alive() -> TestResult {
    init_tracing();
    let (code, stdout) =
        with_timeout(run_session(b"echo \xff\xfe\necho after\n", &[])).await?;

    assert_eq!(code, Some(0));
    assert!(stdout.contains("after"), "stdout: {stdout:?}");
    Ok(())
}

#[tokio::test]
async fn drain_runs_after_an_undecodable_line() -> TestResult {
    init_tracing();
    let (code, stdout) =
        with_timeout(run_session(b"sleep 5 &\necho \xff\n", &["--grace-period", "1s"])).await?;

    assert_eq!(code, Some(0));
    assert!(
        stdout.contains("done (sleep 5): exit code 143"),
        "stdout: {stdout:?}"
    );
    Ok(())
}

#[tokio::test]
async fn exit_code_comes_from_exit_builtin() -> TestResult {
    init_tracing();
    let (code, _) = with_timeout(run_session(b"false\nexit 7\necho unreachable\n", &[])).await?;
    assert_eq!(code, Some(7));

    let (code, _) = with_timeout(run_session(b"false\n", &[])).await?;
    assert_eq!(code, Some(1));
    Ok(())
}
