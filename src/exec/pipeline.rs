// src/exec/pipeline.rs

//! Running `a | b | c`.

use std::io::{self, PipeReader, PipeWriter};

use tracing::{debug, info, warn};

use crate::builtins::Builtin;
use crate::env::EnvStore;
use crate::errors::{Result, ShellError};
use crate::parse::SimpleCommand;
use crate::types::ExitOutcome;

use super::launcher::{launch, ProcessHandle, Wiring};
use super::wait::retry_interrupted;

/// What happened to a pipeline.
#[derive(Debug)]
pub struct PipelineReport {
    /// Outcome of the last stage.
    pub outcome: ExitOutcome,
    /// One outcome per stage, in pipeline order.
    pub stage_outcomes: Vec<ExitOutcome>,
    /// Number of processes actually created.
    pub processes: usize,
    /// Number of pipes allocated.
    pub pipes: usize,
    /// Per-stage failures (exec, redirection, wait), already folded into
    /// `stage_outcomes`.
    pub errors: Vec<ShellError>,
}

enum Stage {
    Running(ProcessHandle),
    Failed(ShellError),
}

/// Run `stages` connected by pipes and wait for all of them.
///
/// A stage that cannot be started counts as failed; the stages that did start
/// are still waited for.
pub async fn run_pipeline(stages: &[SimpleCommand], env: &dyn EnvStore) -> Result<PipelineReport> {
    if stages.len() < 2 {
        return Err(ShellError::Pipeline(
            "a pipeline needs at least two stages".to_string(),
        ));
    }
    if stages.iter().any(|s| Builtin::is_builtin_name(s.program())) {
        return Err(ShellError::Pipeline("builtin in pipeline".to_string()));
    }

    let pipes = allocate_pipes(stages.len() - 1)?;
    let pipe_count = pipes.len();
    let (mut readers, mut writers): (Vec<Option<PipeReader>>, Vec<Option<PipeWriter>>) = pipes
        .into_iter()
        .map(|(r, w)| (Some(r), Some(w)))
        .unzip();

    let last = stages.len() - 1;
    let mut running = Vec::with_capacity(stages.len());
    for (i, segment) in stages.iter().enumerate() {
        let mut wiring = Wiring::inherit();
        if i > 0 {
            if let Some(reader) = readers[i - 1].take() {
                wiring = wiring.with_stdin(reader);
            }
        }
        if i < last {
            if let Some(writer) = writers[i].take() {
                wiring = wiring.with_stdout(writer);
            }
        }

        // The wiring is consumed by `launch`; the parent's copies of this
        // stage's pipe ends are closed by the time it returns.
        match launch(segment, wiring, env) {
            Ok(handle) => {
                debug!(stage = i, pid = handle.pid(), "pipeline stage started");
                running.push(Stage::Running(handle));
            }
            Err(err) => {
                warn!(stage = i, cmd = %segment, error = %err, "pipeline stage failed to start");
                running.push(Stage::Failed(err));
            }
        }
    }
    debug_assert!(readers.iter().all(Option::is_none) && writers.iter().all(Option::is_none));
    drop(readers);
    drop(writers);

    let processes = running
        .iter()
        .filter(|s| matches!(s, Stage::Running(_)))
        .count();

    let mut stage_outcomes = Vec::with_capacity(running.len());
    let mut errors = Vec::new();
    for stage in running {
        let outcome = match stage {
            Stage::Running(mut handle) => match handle.wait().await {
                Ok(outcome) => outcome,
                Err(err) => {
                    let outcome = err.exit_outcome();
                    errors.push(err);
                    outcome
                }
            },
            Stage::Failed(err) => {
                let outcome = err.exit_outcome();
                errors.push(err);
                outcome
            }
        };
        stage_outcomes.push(outcome);
    }

    let outcome = stage_outcomes[last];
    info!(stages = stages.len(), exit_code = outcome.code(), "pipeline finished");

    Ok(PipelineReport {
        outcome,
        stage_outcomes,
        processes,
        pipes: pipe_count,
        errors,
    })
}

/// Allocate `count` close-on-exec pipes, or none at all.
fn allocate_pipes(count: usize) -> Result<Vec<(PipeReader, PipeWriter)>> {
    (0..count)
        .map(|_| retry_interrupted(io::pipe))
        .collect::<io::Result<Vec<_>>>()
        .map_err(|e| ShellError::resource("creating pipe", e))
}
