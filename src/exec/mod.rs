// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`launcher`] creates one child per command segment, applying pipe
//!   wiring and redirections, and hands back an owned [`ProcessHandle`].
//! - [`pipeline`] connects N segments with N-1 pipes and waits for all of
//!   them.
//! - [`wait`] is the wait primitive; interrupted waits are retried there and
//!   nowhere else.

pub mod launcher;
pub mod pipeline;
pub mod wait;

pub use launcher::{launch, ProcessHandle, Wiring};
pub use pipeline::{run_pipeline, PipelineReport};
pub use wait::{retry_interrupted, try_reap, wait_for_exit};
