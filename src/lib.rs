// src/lib.rs

pub mod builtins;
pub mod cli;
pub mod config;
pub mod env;
pub mod errors;
pub mod exec;
pub mod jobs;
pub mod logging;
pub mod parse;
pub mod shell;
pub mod types;

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_config, parse_grace_period, ConfigFile};
use crate::env::{EnvStore, ShellEnv};
use crate::shell::{Flow, Reporter, Shell, ShellOptions};

/// High-level entry point used by `main.rs`; returns the process exit code.
///
/// This wires together:
/// - config loading (+ CLI overrides)
/// - SIGINT / SIGQUIT handling
/// - the input loop (stdin, or `-c` lines)
/// - the background job drain at exit
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_config(args.config.as_deref()).context("loading configuration")?;

    let grace_period = match args.grace_period.as_deref() {
        Some(s) => parse_grace_period(s)?,
        None => cfg.jobs.grace_period,
    };
    let options = ShellOptions { grace_period };

    install_signal_handlers()?;

    let report_timing = cfg.shell.report_timing && !args.quiet;
    let mut shell = Shell::new(ShellEnv::new(), options, Reporter::stdio(report_timing));

    let result = if args.commands.is_empty() {
        interactive_loop(&mut shell, &cfg, !args.quiet).await
    } else {
        Ok(run_lines(&mut shell, &args.commands).await)
    };

    // Background jobs are drained even when reading input failed.
    shell.shutdown().await;
    let code = result?;
    info!(code, "shell exiting");
    Ok(code)
}

/// Run a fixed list of lines, stopping early at `exit`.
pub async fn run_lines<E: EnvStore>(shell: &mut Shell<E>, lines: &[String]) -> i32 {
    for line in lines {
        shell.reap_background();
        if let Flow::Exit(code) = shell.execute_line(line).await {
            return code;
        }
    }
    shell.last_status()
}

async fn interactive_loop<E: EnvStore>(
    shell: &mut Shell<E>,
    cfg: &ConfigFile,
    show_prompt: bool,
) -> Result<i32> {
    let mut input = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();

    loop {
        shell.reap_background();
        if show_prompt {
            print_prompt(cfg);
        }

        let Some(line) = read_line(&mut input, &mut buf)
            .await
            .context("reading input")?
        else {
            debug!("end of input");
            return Ok(shell.last_status());
        };

        if let Flow::Exit(code) = shell.execute_line(&line).await {
            return Ok(code);
        }
    }
}

/// Read one line as raw bytes. Bytes that are not valid UTF-8 become
/// U+FFFD instead of failing the whole session. `None` at end of input.
async fn read_line<R>(input: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if input.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

fn print_prompt(cfg: &ConfigFile) {
    let mut out = std::io::stdout().lock();
    if cfg.shell.show_cwd {
        if let Ok(cwd) = std::env::current_dir() {
            let _ = writeln!(out, "\n{}", cwd.display());
        }
    }
    let _ = write!(out, "{}", cfg.shell.prompt);
    let _ = out.flush();
}

/// SIGINT is caught and ignored so only the foreground child dies on Ctrl-C;
/// SIGQUIT ends the shell at once.
fn install_signal_handlers() -> Result<()> {
    let mut interrupt = signal(SignalKind::interrupt()).context("installing SIGINT handler")?;
    let mut quit = signal(SignalKind::quit()).context("installing SIGQUIT handler")?;

    tokio::spawn(async move {
        while interrupt.recv().await.is_some() {
            debug!("SIGINT received; ignored by the shell");
        }
    });

    tokio::spawn(async move {
        if quit.recv().await.is_some() {
            info!("SIGQUIT received; exiting");
            std::process::exit(0);
        }
    });

    Ok(())
}
